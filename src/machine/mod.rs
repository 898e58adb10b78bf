//! Reference machine behind the monitor.
//!
//! This module provides:
//! - Guest physical memory loaded from a raw image
//! - A register file with the RISC-V ABI names
//! - An execution engine that runs until the trap instruction
//! - The watchpoint pool and expression token rules set up at startup

pub mod execute;
pub mod expr;
pub mod memory;
pub mod registers;
pub mod watchpoint;

use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::MemoryConfig;
use crate::emulator::{Emulator, ExecCount, PAddr, Word};

pub use execute::{Cpu, CpuError, ExecEvent, ExecState, TRAP_INSTR};
pub use expr::{ExprError, ExprLexer, Token};
pub use memory::{MemoryError, PhysicalMemory};
pub use registers::Registers;
pub use watchpoint::{WatchpointError, WatchpointPool, NR_WP};

/// Image used when no program is given.
pub const BUILTIN_IMAGE: [Word; 5] = [
    0x0000_0297, // auipc t0,0
    0x0002_8823, // sb    zero,16(t0)
    0x0102_c503, // lbu   a0,16(t0)
    TRAP_INSTR,  // ebreak
    0xdead_beef, // data
];

/// The reference machine.
#[derive(Debug)]
pub struct Machine {
    /// CPU and memory.
    pub cpu: Cpu,
    lexer: Option<ExprLexer>,
    watchpoints: Option<WatchpointPool>,
}

impl Machine {
    /// Power on with zeroed RAM laid out per `config`.
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            cpu: Cpu::new(PhysicalMemory::new(config)),
            lexer: None,
            watchpoints: None,
        }
    }

    /// Load a raw image at the start of RAM, or the built-in image when
    /// `path` is `None`. Returns the image size in bytes.
    pub fn load_image(&mut self, path: Option<&Path>) -> Result<usize, MachineError> {
        let image = match path {
            Some(path) => std::fs::read(path).map_err(|e| MachineError::Image {
                path: path.display().to_string(),
                message: e.to_string(),
            })?,
            None => {
                info!("no image given, using the built-in image");
                BUILTIN_IMAGE.iter().flat_map(|w| w.to_le_bytes()).collect()
            }
        };

        self.cpu.mem.load_image(&image)?;
        info!(size = image.len(), base = self.cpu.mem.base(), "image loaded");
        Ok(image.len())
    }

    /// Tokenize an expression with the compiled rules.
    pub fn tokenize(&self, expr: &str) -> Result<Vec<Token>, MachineError> {
        let lexer = self
            .lexer
            .as_ref()
            .ok_or(MachineError::NotInitialized("pattern engine"))?;
        Ok(lexer.tokenize(expr)?)
    }

    /// The watchpoint pool.
    pub fn watchpoints(&mut self) -> Result<&mut WatchpointPool, MachineError> {
        self.watchpoints
            .as_mut()
            .ok_or(MachineError::NotInitialized("watchpoint pool"))
    }

    /// Should the process exit with a failure code?
    ///
    /// Only a fault or a nonzero halt code counts; quitting early is fine.
    pub fn is_exit_status_bad(&self) -> bool {
        match self.cpu.state {
            ExecState::Ended { halt_ret, .. } => halt_ret != 0,
            ExecState::Aborted { .. } => true,
            ExecState::Running | ExecState::Stopped => false,
        }
    }
}

impl Emulator for Machine {
    type Error = MachineError;

    fn init_pattern_engine(&mut self) -> Result<(), MachineError> {
        self.lexer = Some(ExprLexer::new()?);
        Ok(())
    }

    fn init_watchpoint_pool(&mut self) -> Result<(), MachineError> {
        self.watchpoints = Some(WatchpointPool::new(NR_WP));
        Ok(())
    }

    fn execute(&mut self, count: ExecCount) {
        let Some(event) = self.cpu.execute(count) else {
            return;
        };
        match &event {
            ExecEvent::AlreadyFinished | ExecEvent::GoodTrap { .. } => info!("{}", event),
            ExecEvent::BadTrap { .. } => warn!("{}", event),
            ExecEvent::Abort { .. } => error!("{}", event),
        }
        println!("{}", event);
    }

    fn display_registers(&self, out: &mut dyn Write) -> io::Result<()> {
        self.cpu.regs.display(out)
    }

    fn read_physical(&mut self, addr: PAddr, len: usize) -> Result<Word, MachineError> {
        Ok(self.cpu.mem.read(addr, len)?)
    }
}

/// Errors from the reference machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error("cannot load image {path}: {message}")]
    Image { path: String, message: String },

    #[error(transparent)]
    Expr(#[from] ExprError),

    #[error(transparent)]
    Watchpoint(#[from] WatchpointError),

    #[error("{0} used before initialization")]
    NotInitialized(&'static str),
}
