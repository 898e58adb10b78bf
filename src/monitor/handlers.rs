//! Command handlers.
//!
//! Each handler gets the raw argument remainder and parses it on its own.

use std::io::Write;

use tracing::warn;

use super::command::{lookup, COMMANDS};
use super::examine::{format_word, word_addr, WORD_BYTES};
use super::line::first_arg;
use super::scan::{scan_decimal, scan_hex};
use super::{Monitor, Status};
use crate::emulator::{Emulator, ExecCount};
use crate::error::Result;

impl<E: Emulator, W: Write> Monitor<E, W> {
    pub(super) fn cmd_help(&mut self, args: Option<&str>) -> Result<Status> {
        match first_arg(args) {
            None => {
                for cmd in COMMANDS {
                    writeln!(self.out, "{}", cmd.help_line())?;
                }
            }
            Some(name) => match lookup(name) {
                Some(cmd) => writeln!(self.out, "{}", cmd.help_line())?,
                None => writeln!(self.out, "Unknown command '{}'", name)?,
            },
        }
        Ok(Status::Continue)
    }

    pub(super) fn cmd_continue(&mut self) -> Result<Status> {
        self.out.flush()?;
        self.emu.execute(ExecCount::Unbounded);
        Ok(Status::Continue)
    }

    pub(super) fn cmd_step(&mut self, args: Option<&str>) -> Result<Status> {
        let n = first_arg(args).and_then(scan_decimal).unwrap_or(1);
        self.out.flush()?;
        self.emu.execute(ExecCount::from_signed(n));
        Ok(Status::Continue)
    }

    pub(super) fn cmd_info(&mut self, args: Option<&str>) -> Result<Status> {
        match first_arg(args) {
            Some("r") => self.emu.display_registers(&mut self.out)?,
            // TODO: `info w` once watchpoints can be set from the monitor
            _ => writeln!(self.out, "Please input r/w")?,
        }
        Ok(Status::Continue)
    }

    pub(super) fn cmd_examine(&mut self, args: Option<&str>) -> Result<Status> {
        let mut tokens = args.unwrap_or_default().split_whitespace();

        let Some(count) = tokens.next() else {
            writeln!(self.out, "Please input n")?;
            return Ok(Status::Continue);
        };
        let n = scan_decimal(count).unwrap_or(1);

        let Some(expr) = tokens.next() else {
            writeln!(self.out, "Please input EXPR")?;
            return Ok(Status::Continue);
        };
        // EXPR is a bare hex literal for now
        let base = scan_hex(expr).unwrap_or(0);

        let words = u32::try_from(n.max(0)).unwrap_or(u32::MAX);
        for i in 0..words {
            let addr = word_addr(base, i);
            match self.emu.read_physical(addr, WORD_BYTES) {
                Ok(value) => writeln!(self.out, "{}", format_word(addr, value))?,
                Err(e) => {
                    warn!(addr, error = %e, "memory read failed");
                    writeln!(self.out, "{}", e)?;
                    break;
                }
            }
        }
        Ok(Status::Continue)
    }
}
