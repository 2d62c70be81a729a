//! Encoding and hashing transformations.

use super::Transformed;
use crate::error::Result;
use ::md5::{Digest, Md5 as Md5Hasher};
use ::sha1::Sha1 as Sha1Hasher;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// MD5 of the empty string.
const MD5_EMPTY: [u8; 16] = [
    0xd4, 0x1d, 0x8c, 0xd9, 0x8f, 0x00, 0xb2, 0x04, 0xe9, 0x80, 0x09, 0x98, 0xec, 0xf8, 0x42, 0x7e,
];

/// SHA-1 of the empty string.
const SHA1_EMPTY: [u8; 20] = [
    0xda, 0x39, 0xa3, 0xee, 0x5e, 0x6b, 0x4b, 0x0d, 0x32, 0x55, 0xbf, 0xef, 0x95, 0x60, 0x18, 0x90,
    0xaf, 0xd8, 0x07, 0x09,
];

/// Base64 encode transformation.
pub fn base64_encode(input: &[u8]) -> Result<Transformed<'_>> {
    if input.is_empty() {
        return Ok(Transformed::unchanged(input));
    }
    Ok(Transformed::changed(STANDARD.encode(input).into_bytes()))
}

/// Hex encode transformation (lowercase digits).
pub fn hex_encode(input: &[u8]) -> Result<Transformed<'_>> {
    Ok(Transformed::compare(input, hex::encode(input).into_bytes()))
}

/// URL encode transformation.
///
/// Keeps `*` and ASCII alphanumerics, turns space into `+` and everything
/// else into `%hh` with lowercase digits.
pub fn url_encode(input: &[u8]) -> Result<Transformed<'_>> {
    let mut out = Vec::with_capacity(input.len() * 3);
    for &b in input {
        match b {
            b' ' => out.push(b'+'),
            b'*' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' => out.push(b),
            _ => out.extend_from_slice(&[
                b'%',
                HEX_DIGITS[usize::from(b >> 4)],
                HEX_DIGITS[usize::from(b & 0x0f)],
            ]),
        }
    }
    Ok(Transformed::compare(input, out))
}

/// MD5 hash transformation. Produces the raw 16-byte digest.
pub fn md5(input: &[u8]) -> Result<Transformed<'_>> {
    if input.is_empty() {
        return Ok(Transformed::with_flag(MD5_EMPTY.to_vec(), false));
    }
    Ok(Transformed::changed(Md5Hasher::digest(input).to_vec()))
}

/// SHA1 hash transformation. Produces the raw 20-byte digest.
pub fn sha1(input: &[u8]) -> Result<Transformed<'_>> {
    if input.is_empty() {
        return Ok(Transformed::with_flag(SHA1_EMPTY.to_vec(), false));
    }
    Ok(Transformed::changed(Sha1Hasher::digest(input).to_vec()))
}

/// UTF-8 to `%uHHHH` transformation (`t:utf8toUnicode`).
///
/// Non-ASCII scalars become `%u` plus at least four lowercase hex digits.
/// ASCII and bytes that are not valid UTF-8 pass through.
pub fn utf8_to_unicode(input: &[u8]) -> Result<Transformed<'_>> {
    if input.is_ascii() {
        return Ok(Transformed::unchanged(input));
    }

    let mut out = Vec::with_capacity(input.len() * 2);
    for chunk in input.utf8_chunks() {
        for c in chunk.valid().chars() {
            if c.is_ascii() {
                out.push(c as u8);
            } else {
                out.extend_from_slice(format!("%u{:04x}", u32::from(c)).as_bytes());
            }
        }
        out.extend_from_slice(chunk.invalid());
    }

    Ok(Transformed::compare(input, out))
}
