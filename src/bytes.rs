//! Byte-level helpers shared by the decoders.
//!
//! These follow ModSecurity's C macros (`VALID_HEX`, `x2c`, `ISODIGIT`, ...)
//! byte for byte, so the decoders built on them reproduce its output.

use std::borrow::Cow;

/// Returns true if `b` is an ASCII hex digit.
#[inline]
pub fn valid_hex(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// Value of a single hex digit. The caller validates the digit.
#[inline]
pub fn xsingle2c(b: u8) -> u8 {
    if b >= b'A' {
        (b & 0xdf).wrapping_sub(b'A').wrapping_add(10)
    } else {
        b.wrapping_sub(b'0')
    }
}

/// Decode two hex digits into one byte. The caller validates both digits.
#[inline]
pub fn x2c(pair: [u8; 2]) -> u8 {
    (xsingle2c(pair[0]) << 4) | (xsingle2c(pair[1]) & 0x0f)
}

/// Full-width ASCII compensation for a decoded `U+FFxx` escape.
///
/// `high` holds the two hex digits above the decoded low byte. When both are
/// `f`/`F` and the low byte is in `0x01..=0x5e`, the escape was a full-width
/// form (`U+FF01`..`U+FF5E`) and `0x20` is added to reach its ASCII twin.
#[inline]
pub fn full_width_fold(high: [u8; 2], low: u8) -> u8 {
    let full_width = high.iter().all(|&d| d == b'f' || d == b'F');
    if full_width && low > 0x00 && low < 0x5f {
        low + 0x20
    } else {
        low
    }
}

/// Whitespace as seen by a Latin-1 aware decoder (adds NEL and NBSP).
#[inline]
pub fn is_latin_space(b: u8) -> bool {
    matches!(b, 0x09..=0x0d | 0x20 | 0x85 | 0xa0)
}

/// C `isspace` in the "C" locale.
#[inline]
pub fn is_ascii_space(b: u8) -> bool {
    matches!(b, b' ' | 0x0c | b'\n' | b'\r' | b'\t' | 0x0b)
}

/// Returns true if `b` is an octal digit.
#[inline]
pub fn is_odigit(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

/// Strip one matching pair of surrounding `"` or `'`.
pub fn maybe_remove_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return s;
    }
    let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
    if first == last && (first == b'"' || first == b'\'') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Linear membership test.
#[inline]
pub fn in_slice<T: PartialEq>(item: &T, list: &[T]) -> bool {
    list.iter().any(|candidate| candidate == item)
}

/// ASCII-only lowercase; borrows when there is nothing to fold.
pub fn fast_lower(s: &[u8]) -> Cow<'_, [u8]> {
    if s.iter().any(u8::is_ascii_uppercase) {
        Cow::Owned(s.to_ascii_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

/// ASCII-only case-insensitive equality.
#[inline]
pub fn fast_equal_fold(a: &[u8], b: &[u8]) -> bool {
    a.eq_ignore_ascii_case(b)
}
