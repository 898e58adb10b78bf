//! # sdb
//!
//! A simple debugger monitor for a 32-bit emulator.
//!
//! The monitor reads commands from the operator and drives an emulator
//! through the [`Emulator`] trait: continue, single-step, print registers
//! and dump physical memory. A small reference [`Machine`] implements the
//! trait so the monitor can run on its own.

pub mod config;
pub mod emulator;
pub mod error;
pub mod logging;
pub mod machine;
pub mod monitor;

// Re-export commonly used types
pub use config::{Config, MemoryConfig, MonitorConfig};
pub use emulator::{Emulator, ExecCount, PAddr, Word};
pub use error::MonitorError;
pub use machine::{Machine, MachineError};
pub use monitor::{LineSource, Monitor, Prompt, ScriptSource, Status};
