//! The emulator interface the monitor drives.
//!
//! The monitor never executes instructions or touches memory itself. Every
//! side effect on the emulated machine goes through this trait.

use std::fmt;
use std::io::{self, Write};

/// A physical address.
pub type PAddr = u32;

/// A 32-bit memory word.
pub type Word = u32;

/// How many instructions the execution engine should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecCount {
    /// Run exactly this many instructions, unless the engine halts first.
    Steps(u64),
    /// Run until the engine halts on its own.
    Unbounded,
}

impl ExecCount {
    /// Convert a signed count as typed by the operator.
    ///
    /// The engine counts in unsigned steps, so a negative count wraps to a
    /// value no run ever reaches and is treated as unbounded.
    pub fn from_signed(n: i64) -> Self {
        match u64::try_from(n) {
            Ok(steps) => ExecCount::Steps(steps),
            Err(_) => ExecCount::Unbounded,
        }
    }
}

impl fmt::Display for ExecCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecCount::Steps(n) => write!(f, "{}", n),
            ExecCount::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Collaborators consumed by the monitor.
pub trait Emulator {
    /// Errors reported by the emulator.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Compile the expression token rules. Must run before the first dispatch.
    fn init_pattern_engine(&mut self) -> Result<(), Self::Error>;

    /// Set up the watchpoint pool. Must run before the first dispatch.
    fn init_watchpoint_pool(&mut self) -> Result<(), Self::Error>;

    /// Run instructions. Blocks until the count is exhausted or the engine halts.
    fn execute(&mut self, count: ExecCount);

    /// Print every architectural register.
    fn display_registers(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Read `len` bytes of physical memory as one little-endian word.
    ///
    /// Takes `&mut self` since a read may land on a device register.
    fn read_physical(&mut self, addr: PAddr, len: usize) -> Result<Word, Self::Error>;

    /// Drop pending display events. Emulators without a display do nothing.
    fn clear_event_queue(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_count_from_signed() {
        assert_eq!(ExecCount::from_signed(1), ExecCount::Steps(1));
        assert_eq!(ExecCount::from_signed(0), ExecCount::Steps(0));
        assert_eq!(ExecCount::from_signed(-1), ExecCount::Unbounded);
        assert_eq!(ExecCount::from_signed(i64::MIN), ExecCount::Unbounded);
    }

    #[test]
    fn test_exec_count_display() {
        assert_eq!(ExecCount::Steps(10).to_string(), "10");
        assert_eq!(ExecCount::Unbounded.to_string(), "unbounded");
    }
}
