//! A recording emulator for monitor tests.

use std::cell::Cell;
use std::io::{self, Write};

use thiserror::Error;

use super::Monitor;
use crate::config::MonitorConfig;
use crate::emulator::{Emulator, ExecCount, PAddr, Word};

#[derive(Debug, Error)]
pub enum MockError {
    #[error("address {0:#010x} is out of bound")]
    OutOfBound(PAddr),
    #[error("init refused")]
    InitRefused,
}

/// Records every call the monitor makes.
#[derive(Debug, Default)]
pub struct MockEmulator {
    pub base: PAddr,
    pub memory: Vec<u8>,
    pub executed: Vec<ExecCount>,
    pub reads: Vec<(PAddr, usize)>,
    pub register_displays: Cell<usize>,
    pub pattern_inits: usize,
    pub watchpoint_inits: usize,
    pub event_clears: usize,
    pub fail_watchpoint_init: bool,
}

impl MockEmulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memory(base: PAddr, bytes: &[u8]) -> Self {
        Self {
            base,
            memory: bytes.to_vec(),
            ..Self::default()
        }
    }
}

impl Emulator for MockEmulator {
    type Error = MockError;

    fn init_pattern_engine(&mut self) -> Result<(), MockError> {
        self.pattern_inits += 1;
        Ok(())
    }

    fn init_watchpoint_pool(&mut self) -> Result<(), MockError> {
        self.watchpoint_inits += 1;
        if self.fail_watchpoint_init {
            return Err(MockError::InitRefused);
        }
        Ok(())
    }

    fn execute(&mut self, count: ExecCount) {
        self.executed.push(count);
    }

    fn display_registers(&self, out: &mut dyn Write) -> io::Result<()> {
        self.register_displays.set(self.register_displays.get() + 1);
        writeln!(out, "pc 0x{:08x}", self.base)
    }

    fn read_physical(&mut self, addr: PAddr, len: usize) -> Result<Word, MockError> {
        self.reads.push((addr, len));
        let offset = addr.wrapping_sub(self.base) as usize;
        match self.memory.get(offset..offset + 4) {
            Some(bytes) if addr >= self.base => {
                Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            _ => Err(MockError::OutOfBound(addr)),
        }
    }

    fn clear_event_queue(&mut self) {
        self.event_clears += 1;
    }
}

/// A monitor over `emu` writing into a buffer.
pub fn session(emu: MockEmulator) -> Monitor<MockEmulator, Vec<u8>> {
    Monitor::new(emu, Vec::new(), MonitorConfig::default()).unwrap()
}

/// Tear down a test monitor, returning the emulator and everything printed.
pub fn output_of(monitor: Monitor<MockEmulator, Vec<u8>>) -> (MockEmulator, String) {
    let (emu, out) = monitor.into_parts();
    (emu, String::from_utf8(out).unwrap())
}
