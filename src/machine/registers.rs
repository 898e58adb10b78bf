//! Register file of the reference machine.
//!
//! 32 general-purpose registers named by their RISC-V ABI names, plus the
//! program counter. Register 0 always reads as zero.

use std::io::{self, Write};

use crate::emulator::{PAddr, Word};

/// ABI register names, indexed by register number.
pub const GPR_NAMES: [&str; 32] = [
    "$0", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Index of `a0`, which holds the halt code at a trap.
pub const A0: usize = 10;

/// The register file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    gpr: [Word; 32],
    /// Program counter.
    pub pc: PAddr,
}

impl Registers {
    /// Zeroed registers with `pc` at the reset vector.
    pub fn new(reset_vector: PAddr) -> Self {
        Self { gpr: [0; 32], pc: reset_vector }
    }

    /// Read a general-purpose register.
    ///
    /// # Panics
    /// Panics if `index` is 32 or more.
    pub fn gpr(&self, index: usize) -> Word {
        self.gpr[index]
    }

    /// Write a general-purpose register. Writes to `$0` are dropped.
    pub fn set_gpr(&mut self, index: usize, value: Word) {
        if index != 0 {
            self.gpr[index] = value;
        }
    }

    /// Print one line per register: name, hex value, decimal value.
    pub fn display(&self, out: &mut dyn Write) -> io::Result<()> {
        for (name, value) in GPR_NAMES.iter().zip(self.gpr.iter()) {
            writeln!(out, "{:<4} 0x{:08x} {:>11}", name, value, value)?;
        }
        writeln!(out, "{:<4} 0x{:08x} {:>11}", "pc", self.pc, self.pc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_register_is_hardwired() {
        let mut regs = Registers::new(0);
        regs.set_gpr(0, 42);
        regs.set_gpr(1, 42);
        assert_eq!(regs.gpr(0), 0);
        assert_eq!(regs.gpr(1), 42);
    }

    #[test]
    fn test_display_format() {
        let mut regs = Registers::new(0x8000_0004);
        regs.set_gpr(2, 0xffff_ffff);
        let mut out = Vec::new();
        regs.display(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 33);
        assert_eq!(lines[0], "$0   0x00000000           0");
        assert_eq!(lines[2], "sp   0xffffffff  4294967295");
        assert_eq!(lines[32], "pc   0x80000004  2147483652");
    }
}
