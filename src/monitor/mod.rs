//! The interactive monitor.
//!
//! Reads a line, splits off the command word, looks it up in the command
//! table and runs its handler, until a handler asks to stop or the input
//! runs out. In batch mode the loop is skipped and the program simply runs
//! to completion.

pub mod command;
pub mod examine;
mod handlers;
pub mod line;
pub mod scan;

#[cfg(test)]
pub(crate) mod testing;

use std::io::Write;

use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::emulator::{Emulator, ExecCount};
use crate::error::{MonitorError, Result};

pub use command::{lookup, CommandDef, CommandKind, COMMANDS};
pub use line::{split_command, LineSource, Prompt, ScriptSource};

/// What the loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Prompt for the next command.
    Continue,
    /// End the session.
    Terminate,
}

/// A monitor session over an emulator.
pub struct Monitor<E, W> {
    emu: E,
    out: W,
    config: MonitorConfig,
}

impl<E: Emulator, W: Write> Monitor<E, W> {
    /// Initialize the emulator's pattern engine and watchpoint pool, then
    /// build the monitor. Output goes to `out`.
    pub fn new(mut emu: E, out: W, config: MonitorConfig) -> Result<Self> {
        emu.init_pattern_engine()
            .map_err(|e| MonitorError::init("pattern engine", e))?;
        emu.init_watchpoint_pool()
            .map_err(|e| MonitorError::init("watchpoint pool", e))?;
        info!(batch = config.batch, "monitor initialized");

        Ok(Self { emu, out, config })
    }

    /// Run the session to its end.
    ///
    /// In batch mode `input` is never read.
    pub fn run(&mut self, input: &mut dyn LineSource) -> Result<()> {
        if self.config.batch {
            info!("batch mode, running to completion");
            self.emu.execute(ExecCount::Unbounded);
            return Ok(());
        }

        while let Some(line) = input.next_line()? {
            let Some((command, args)) = split_command(&line) else {
                continue;
            };

            self.emu.clear_event_queue();

            if self.dispatch(command, args)? == Status::Terminate {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Run the handler named `command` with the unparsed `args`.
    ///
    /// Unknown commands print a diagnostic and never end the loop.
    pub fn dispatch(&mut self, command: &str, args: Option<&str>) -> Result<Status> {
        let Some(def) = lookup(command) else {
            debug!(command, "unknown command");
            writeln!(self.out, "Unknown command '{}'", command)?;
            return Ok(Status::Continue);
        };

        debug!(command, args, "dispatch");
        match def.kind {
            CommandKind::Help => self.cmd_help(args),
            CommandKind::Continue => self.cmd_continue(),
            CommandKind::Quit => Ok(Status::Terminate),
            CommandKind::Step => self.cmd_step(args),
            CommandKind::Info => self.cmd_info(args),
            CommandKind::Examine => self.cmd_examine(args),
        }
    }

    /// The emulator being driven.
    pub fn emulator(&self) -> &E {
        &self.emu
    }

    /// Tear the monitor down, returning the emulator and the output sink.
    pub fn into_parts(self) -> (E, W) {
        (self.emu, self.out)
    }
}
