//! Guest physical memory.
//!
//! One contiguous RAM region starting at a configurable base address.
//! Multi-byte accesses are little-endian.

use thiserror::Error;

use crate::config::MemoryConfig;
use crate::emulator::{PAddr, Word};

/// Guest RAM.
#[derive(Clone)]
pub struct PhysicalMemory {
    base: PAddr,
    bytes: Vec<u8>,
}

impl PhysicalMemory {
    /// Create zeroed RAM covering `[base, base + size)`.
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            base: config.base,
            bytes: vec![0; config.size as usize],
        }
    }

    /// First valid address.
    pub fn base(&self) -> PAddr {
        self.base
    }

    /// Read 1, 2 or 4 bytes.
    pub fn read(&self, addr: PAddr, len: usize) -> Result<Word, MemoryError> {
        check_len(len)?;
        let offset = self.offset(addr, len)?;
        let mut word = [0u8; 4];
        word[..len].copy_from_slice(&self.bytes[offset..offset + len]);
        Ok(Word::from_le_bytes(word))
    }

    /// Copy an image to the start of RAM.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), MemoryError> {
        if image.len() > self.bytes.len() {
            return Err(MemoryError::ImageTooLarge {
                size: image.len(),
                available: self.bytes.len(),
            });
        }
        self.bytes[..image.len()].copy_from_slice(image);
        Ok(())
    }

    fn offset(&self, addr: PAddr, len: usize) -> Result<usize, MemoryError> {
        let offset = addr.wrapping_sub(self.base) as usize;
        if addr < self.base || offset + len > self.bytes.len() {
            return Err(MemoryError::AddressOutOfRange {
                addr,
                base: self.base,
                end: self.end(),
            });
        }
        Ok(offset)
    }

    fn end(&self) -> PAddr {
        self.base.wrapping_add(self.bytes.len() as PAddr).wrapping_sub(1)
    }
}

fn check_len(len: usize) -> Result<(), MemoryError> {
    match len {
        1 | 2 | 4 => Ok(()),
        _ => Err(MemoryError::BadAccessWidth(len)),
    }
}

impl std::fmt::Debug for PhysicalMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicalMemory")
            .field("base", &format_args!("{:#010x}", self.base))
            .field("size", &format_args!("{:#x}", self.bytes.len()))
            .finish()
    }
}

/// Errors from memory accesses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Access falls outside RAM.
    #[error("address = {addr:#010x} is out of bound of pmem [{base:#010x}, {end:#010x}]")]
    AddressOutOfRange { addr: PAddr, base: PAddr, end: PAddr },
    /// Only 1, 2 and 4 byte accesses exist.
    #[error("unsupported access width {0}")]
    BadAccessWidth(usize),
    /// Image does not fit in RAM.
    #[error("image size {size} exceeds memory size {available}")]
    ImageTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> PhysicalMemory {
        PhysicalMemory::new(MemoryConfig { base: 0x1000, size: 0x100 })
    }

    #[test]
    fn test_memory_read_widths() {
        let mut mem = small();
        mem.load_image(&[0, 0, 0, 0, 0x78, 0x56, 0x34, 0x12]).unwrap();
        assert_eq!(mem.read(0x1004, 4).unwrap(), 0x1234_5678);
        assert_eq!(mem.read(0x1004, 1).unwrap(), 0x78);
        assert_eq!(mem.read(0x1006, 2).unwrap(), 0x1234);
    }

    #[test]
    fn test_memory_little_endian_layout() {
        let mut mem = small();
        mem.load_image(&[0x41, 0x00, 0xff, 0x20]).unwrap();
        assert_eq!(mem.read(0x1000, 4).unwrap(), 0x20ff_0041);
    }

    #[test]
    fn test_memory_bounds() {
        let mem = small();
        assert!(mem.read(0x1000, 4).is_ok());
        assert!(mem.read(0x10fc, 4).is_ok());

        assert!(mem.read(0x0fff, 1).is_err());
        assert!(mem.read(0x10fd, 4).is_err());
        assert!(mem.read(0x1100, 1).is_err());
        assert!(mem.read(0, 4).is_err());
    }

    #[test]
    fn test_memory_error_message() {
        let err = small().read(0x2000, 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "address = 0x00002000 is out of bound of pmem [0x00001000, 0x000010ff]"
        );
    }

    #[test]
    fn test_memory_access_width() {
        let mem = small();
        assert_eq!(mem.read(0x1000, 3), Err(MemoryError::BadAccessWidth(3)));
        assert_eq!(mem.read(0x1000, 8), Err(MemoryError::BadAccessWidth(8)));
    }

    #[test]
    fn test_load_image_too_large() {
        let mut mem = small();
        let err = mem.load_image(&[0; 0x101]).unwrap_err();
        assert_eq!(err, MemoryError::ImageTooLarge { size: 0x101, available: 0x100 });
    }
}
