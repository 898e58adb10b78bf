//! Execution engine of the reference machine.
//!
//! Fetches one 32-bit word per step. The trap word ends the program with the
//! halt code in `a0`; a fetch outside RAM aborts it; anything else is a no-op
//! that moves `pc` to the next word. The engine carries no instruction set.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::emulator::{ExecCount, PAddr, Word};
use crate::machine::memory::{MemoryError, PhysicalMemory};
use crate::machine::registers::{Registers, A0};

/// The trap instruction (`ebreak`).
pub const TRAP_INSTR: Word = 0x0010_0073;

/// Engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// Executing.
    Running,
    /// Paused, ready to run again.
    Stopped,
    /// The program reached the trap instruction.
    Ended { halt_pc: PAddr, halt_ret: Word },
    /// The program faulted.
    Aborted { pc: PAddr },
}

impl ExecState {
    /// Has the program finished for good?
    pub fn is_finished(&self) -> bool {
        matches!(self, ExecState::Ended { .. } | ExecState::Aborted { .. })
    }
}

/// What a call to [`Cpu::execute`] has to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecEvent {
    /// Nothing ran: the program had already finished.
    AlreadyFinished,
    /// The trap was hit with halt code 0.
    GoodTrap { pc: PAddr },
    /// The trap was hit with a nonzero halt code.
    BadTrap { pc: PAddr, code: Word },
    /// Execution faulted.
    Abort { pc: PAddr, error: CpuError },
}

impl fmt::Display for ExecEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecEvent::AlreadyFinished => write!(
                f,
                "Program execution has ended. To restart the program, exit and run again."
            ),
            ExecEvent::GoodTrap { pc } => write!(f, "HIT GOOD TRAP at pc = 0x{:08x}", pc),
            ExecEvent::BadTrap { pc, code } => {
                write!(f, "HIT BAD TRAP at pc = 0x{:08x} (halt code {})", pc, code)
            }
            ExecEvent::Abort { pc, error } => write!(f, "ABORT at pc = 0x{:08x}: {}", pc, error),
        }
    }
}

/// The reference CPU.
#[derive(Debug, Clone)]
pub struct Cpu {
    /// Registers.
    pub regs: Registers,
    /// Guest RAM.
    pub mem: PhysicalMemory,
    /// Current execution state.
    pub state: ExecState,
    /// Instructions executed since power-on.
    pub cycles: u64,
    /// Host time spent executing.
    pub elapsed: Duration,
}

impl Cpu {
    /// Create a CPU with `pc` at the start of RAM.
    pub fn new(mem: PhysicalMemory) -> Self {
        Self {
            regs: Registers::new(mem.base()),
            mem,
            state: ExecState::Stopped,
            cycles: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Execute a single instruction.
    pub fn step(&mut self) -> Result<(), CpuError> {
        if self.state != ExecState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        let pc = self.regs.pc;
        let instr = self.mem.read(pc, 4)?;
        self.cycles += 1;

        if instr == TRAP_INSTR {
            self.state = ExecState::Ended {
                halt_pc: pc,
                halt_ret: self.regs.gpr(A0),
            };
        } else {
            self.regs.pc = pc.wrapping_add(4);
        }
        Ok(())
    }

    /// Run for `count` instructions or until the program finishes.
    ///
    /// Returns an event when there is something to tell the operator.
    pub fn execute(&mut self, count: ExecCount) -> Option<ExecEvent> {
        if self.state.is_finished() {
            return Some(ExecEvent::AlreadyFinished);
        }
        self.state = ExecState::Running;

        let start = Instant::now();
        let start_cycles = self.cycles;
        let limit = match count {
            ExecCount::Steps(n) => Some(n),
            ExecCount::Unbounded => None,
        };

        let mut fault = None;
        let mut executed: u64 = 0;
        while self.state == ExecState::Running && limit.map_or(true, |l| executed < l) {
            if let Err(e) = self.step() {
                self.state = ExecState::Aborted { pc: self.regs.pc };
                fault = Some(e);
                break;
            }
            executed += 1;
        }
        self.elapsed += start.elapsed();
        debug!(executed = self.cycles - start_cycles, %count, "execution paused");

        match self.state {
            ExecState::Running => {
                self.state = ExecState::Stopped;
                None
            }
            ExecState::Stopped => None,
            ExecState::Ended { halt_pc, halt_ret } => {
                self.log_statistics();
                Some(if halt_ret == 0 {
                    ExecEvent::GoodTrap { pc: halt_pc }
                } else {
                    ExecEvent::BadTrap { pc: halt_pc, code: halt_ret }
                })
            }
            ExecState::Aborted { pc } => {
                self.log_statistics();
                let error = fault.unwrap_or(CpuError::NotRunning(self.state));
                Some(ExecEvent::Abort { pc, error })
            }
        }
    }

    fn log_statistics(&self) {
        let micros = self.elapsed.as_micros();
        let frequency = if micros > 0 {
            u128::from(self.cycles) * 1_000_000 / micros
        } else {
            0
        };
        info!(
            instructions = self.cycles,
            host_time_us = micros as u64,
            instr_per_sec = frequency as u64,
            "execution finished"
        );
    }
}

/// Errors that stop execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(ExecState),

    #[error("instruction fetch failed: {0}")]
    Fetch(#[from] MemoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfig;

    fn cpu_with(words: &[Word]) -> Cpu {
        let mut mem = PhysicalMemory::new(MemoryConfig { base: 0x8000_0000, size: 0x40 });
        let image: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        mem.load_image(&image).unwrap();
        Cpu::new(mem)
    }

    #[test]
    fn test_cpu_step_advances_pc() {
        let mut cpu = cpu_with(&[0x13, 0x13, TRAP_INSTR]);
        assert_eq!(cpu.execute(ExecCount::Steps(1)), None);
        assert_eq!(cpu.regs.pc, 0x8000_0004);
        assert_eq!(cpu.state, ExecState::Stopped);
        assert_eq!(cpu.cycles, 1);
    }

    #[test]
    fn test_cpu_zero_steps() {
        let mut cpu = cpu_with(&[TRAP_INSTR]);
        assert_eq!(cpu.execute(ExecCount::Steps(0)), None);
        assert_eq!(cpu.regs.pc, 0x8000_0000);
        assert_eq!(cpu.cycles, 0);
    }

    #[test]
    fn test_cpu_good_trap() {
        let mut cpu = cpu_with(&[0x13, 0x13, TRAP_INSTR, 0xdead_beef]);
        let event = cpu.execute(ExecCount::Unbounded);
        assert_eq!(event, Some(ExecEvent::GoodTrap { pc: 0x8000_0008 }));
        assert_eq!(
            event.unwrap().to_string(),
            "HIT GOOD TRAP at pc = 0x80000008"
        );
        assert_eq!(cpu.state, ExecState::Ended { halt_pc: 0x8000_0008, halt_ret: 0 });
        assert_eq!(cpu.cycles, 3);
    }

    #[test]
    fn test_cpu_bad_trap() {
        let mut cpu = cpu_with(&[TRAP_INSTR]);
        cpu.regs.set_gpr(A0, 1);
        let event = cpu.execute(ExecCount::Unbounded).unwrap();
        assert_eq!(event, ExecEvent::BadTrap { pc: 0x8000_0000, code: 1 });
        assert_eq!(event.to_string(), "HIT BAD TRAP at pc = 0x80000000 (halt code 1)");
    }

    #[test]
    fn test_cpu_steps_stop_at_trap() {
        let mut cpu = cpu_with(&[0x13, TRAP_INSTR]);
        let event = cpu.execute(ExecCount::Steps(100));
        assert!(matches!(event, Some(ExecEvent::GoodTrap { .. })));
        assert_eq!(cpu.cycles, 2);
    }

    #[test]
    fn test_cpu_runs_off_the_end() {
        // no trap anywhere in RAM
        let mut cpu = cpu_with(&[]);
        let event = cpu.execute(ExecCount::Unbounded).unwrap();
        assert!(matches!(event, ExecEvent::Abort { pc: 0x8000_0040, .. }));
        assert_eq!(cpu.cycles, 16);
    }

    #[test]
    fn test_cpu_finished_program_stays_finished() {
        let mut cpu = cpu_with(&[TRAP_INSTR]);
        cpu.execute(ExecCount::Unbounded);
        let cycles = cpu.cycles;

        let event = cpu.execute(ExecCount::Steps(1)).unwrap();
        assert_eq!(event, ExecEvent::AlreadyFinished);
        assert_eq!(
            event.to_string(),
            "Program execution has ended. To restart the program, exit and run again."
        );
        assert_eq!(cpu.cycles, cycles);
    }

    #[test]
    fn test_step_requires_running() {
        let mut cpu = cpu_with(&[0x13]);
        assert_eq!(cpu.step(), Err(CpuError::NotRunning(ExecState::Stopped)));
    }
}
