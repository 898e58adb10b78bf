//! Lenient numeric scans for command arguments.
//!
//! Both scans read an optional sign and then as many digits as they can,
//! ignoring whatever follows. A token with no leading digits yields `None`
//! and the caller keeps its default.

/// Scan a base-10 integer from the start of `token`.
///
/// Saturates at the `i64` range.
pub fn scan_decimal(token: &str) -> Option<i64> {
    let (negative, rest) = split_sign(token);
    let digits = leading_run(rest, |c| c.is_ascii_digit());
    if digits.is_empty() {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits.bytes() {
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    Some(value)
}

/// Scan a hexadecimal integer from the start of `token`.
///
/// Accepts an optional `0x`/`0X` prefix. The result wraps to 32 bits and a
/// leading minus negates it modulo 2^32.
pub fn scan_hex(token: &str) -> Option<u32> {
    let (negative, rest) = split_sign(token);
    let (prefixed, rest) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(stripped) => (true, stripped),
        None => (false, rest),
    };
    let digits = leading_run(rest, |c| c.is_ascii_hexdigit());
    if digits.is_empty() {
        // "0x" alone still scanned the zero
        return prefixed.then_some(0);
    }

    let mut value: u32 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(16).unwrap_or(0);
        value = value.wrapping_shl(4) | digit;
    }
    Some(if negative { value.wrapping_neg() } else { value })
}

fn split_sign(token: &str) -> (bool, &str) {
    if let Some(rest) = token.strip_prefix('-') {
        (true, rest)
    } else {
        (false, token.strip_prefix('+').unwrap_or(token))
    }
}

fn leading_run(s: &str, accept: impl Fn(char) -> bool) -> &str {
    let end = s.find(|c: char| !accept(c)).unwrap_or(s.len());
    &s[..end]
}
