//! Rendering for the `x` memory dump.

use crate::emulator::{PAddr, Word};

/// Bytes per dumped word.
pub const WORD_BYTES: usize = 4;

/// Render one dumped word.
///
/// The address comes first, then the bytes in memory order (least
/// significant first) as hex, then the same bytes as ASCII with anything
/// outside the printable range shown as `.`.
///
/// ```
/// use sdb::monitor::examine::format_word;
///
/// assert_eq!(format_word(0x1000, 0x20FF_0041), "0x00001000: 41 00 ff 20 A.. ");
/// ```
pub fn format_word(addr: PAddr, value: Word) -> String {
    let bytes = value.to_le_bytes();
    let mut line = format!("0x{:08x}: ", addr);
    for byte in bytes {
        line.push_str(&format!("{:02x} ", byte));
    }
    line.extend(bytes.iter().map(|&byte| printable(byte)));
    line
}

fn printable(byte: u8) -> char {
    if (32..=126).contains(&byte) {
        char::from(byte)
    } else {
        '.'
    }
}

/// Address of the `index`-th word of a dump starting at `base`.
pub fn word_addr(base: PAddr, index: u32) -> PAddr {
    base.wrapping_add(index.wrapping_mul(WORD_BYTES as u32))
}
