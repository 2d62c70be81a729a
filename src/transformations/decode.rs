//! Decoding transformations.

use super::Transformed;
use crate::bytes::{full_width_fold, valid_hex, x2c};
use crate::error::{Error, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use percent_encoding::percent_decode;
use phf::phf_map;
use std::borrow::Cow;

/// URL decode transformation (`t:urlDecode`).
///
/// Decodes `%HH` pairs and `+`; a `%` without two hex digits is kept.
pub fn url_decode(input: &[u8]) -> Result<Transformed<'_>> {
    Ok(url_decode_with_errors(input).0)
}

/// URL decode, also returning how many `%` escapes were malformed.
///
/// The count feeds the rule engine's `URLENCODED_ERROR` variable.
pub fn url_decode_with_errors(input: &[u8]) -> (Transformed<'_>, usize) {
    let invalid = count_invalid_escapes(input);

    if !input.contains(&b'+') {
        // Borrowed back unless at least one escape was decoded.
        let decoded: Cow<'_, [u8]> = percent_decode(input).into();
        let out = match decoded {
            Cow::Borrowed(_) => Transformed::unchanged(input),
            Cow::Owned(value) => Transformed::changed(value),
        };
        return (out, invalid);
    }

    let spaced: Vec<u8> = input
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    (Transformed::changed(percent_decode(&spaced).collect()), invalid)
}

fn count_invalid_escapes(input: &[u8]) -> usize {
    let mut invalid = 0;
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' {
            if i + 2 < input.len() && valid_hex(input[i + 1]) && valid_hex(input[i + 2]) {
                i += 3;
                continue;
            }
            invalid += 1;
        }
        i += 1;
    }
    invalid
}

/// URL decode with IIS `%uHHHH` support (`t:urlDecodeUni`).
///
/// Only the low byte of a `%u` escape survives; full-width forms
/// (`%uFF01`..`%uFF5E`) fold to ASCII.
pub fn url_decode_uni(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.iter().any(|&b| b == b'%' || b == b'+') {
        return Ok(Transformed::unchanged(input));
    }

    let len = input.len();
    let mut out = Vec::with_capacity(len);
    let mut changed = false;
    let mut i = 0;

    while i < len {
        match input[i] {
            b'%' if i + 1 < len && (input[i + 1] == b'u' || input[i + 1] == b'U') => {
                if i + 5 < len && input[i + 2..i + 6].iter().all(|&b| valid_hex(b)) {
                    let low = x2c([input[i + 4], input[i + 5]]);
                    out.push(full_width_fold([input[i + 2], input[i + 3]], low));
                    changed = true;
                    i += 6;
                } else {
                    // Invalid %u: keep "%u" and carry on after it.
                    out.extend_from_slice(&input[i..i + 2]);
                    i += 2;
                }
            }
            b'%' => {
                if i + 2 < len && valid_hex(input[i + 1]) && valid_hex(input[i + 2]) {
                    out.push(x2c([input[i + 1], input[i + 2]]));
                    changed = true;
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b'+' => {
                out.push(b' ');
                changed = true;
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    if changed {
        Ok(Transformed::changed(out))
    } else {
        Ok(Transformed::unchanged(input))
    }
}

/// Standard alphabet, canonical padding, non-zero trailing bits tolerated.
const STRICT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Strict Base64 decode transformation (`t:base64Decode`).
///
/// CR and LF are ignored; any other deviation leaves the input unchanged.
pub fn base64_decode(input: &[u8]) -> Result<Transformed<'_>> {
    let stripped: Cow<'_, [u8]> = if input.iter().any(|&b| b == b'\r' || b == b'\n') {
        Cow::Owned(
            input
                .iter()
                .copied()
                .filter(|&b| b != b'\r' && b != b'\n')
                .collect(),
        )
    } else {
        Cow::Borrowed(input)
    };

    match STRICT_BASE64.decode(stripped.as_ref()) {
        Ok(decoded) => Ok(Transformed::compare(input, decoded)),
        Err(_) => Ok(Transformed::unchanged(input)),
    }
}

const B64_PAD: u8 = 64;
const B64_INVALID: u8 = 127;

/// Six-bit value of every byte; `B64_PAD` for `=`, `B64_INVALID` otherwise.
static BASE64_DECODE_TABLE: [u8; 256] = base64_decode_table();

const fn base64_decode_table() -> [u8; 256] {
    let mut table = [B64_INVALID; 256];
    let mut i = 0;
    while i < 26 {
        table[b'A' as usize + i] = i as u8;
        table[b'a' as usize + i] = 26 + i as u8;
        i += 1;
    }
    i = 0;
    while i < 10 {
        table[b'0' as usize + i] = 52 + i as u8;
        i += 1;
    }
    table[b'+' as usize] = 62;
    table[b'/' as usize] = 63;
    table[b'=' as usize] = B64_PAD;
    table
}

/// Lenient Base64 decode transformation (`t:base64DecodeExt`).
///
/// Bytes outside the alphabet are skipped. Decoding stops at a third `=` or
/// at a data symbol after padding, keeping what was decoded before it.
pub fn base64_decode_ext(input: &[u8]) -> Result<Transformed<'_>> {
    let mut symbols = 0usize;
    let mut pads = 0u8;
    let mut end = input.len();

    for (i, &b) in input.iter().enumerate() {
        match BASE64_DECODE_TABLE[usize::from(b)] {
            B64_INVALID => {}
            B64_PAD => {
                pads += 1;
                if pads > 2 {
                    end = i;
                    break;
                }
            }
            _ if pads > 0 => {
                end = i;
                break;
            }
            _ => symbols += 1,
        }
    }

    // A single symbol carries fewer than eight bits.
    if symbols < 2 {
        return Ok(Transformed::unchanged(input));
    }

    let mut out = Vec::with_capacity(symbols * 3 / 4);
    let mut acc: u32 = 0;
    let mut held = 0;
    for &b in &input[..end] {
        let value = BASE64_DECODE_TABLE[usize::from(b)];
        if value >= B64_PAD {
            continue;
        }
        acc = (acc << 6) | u32::from(value);
        held += 1;
        if held == 4 {
            out.extend_from_slice(&[(acc >> 16) as u8, (acc >> 8) as u8, acc as u8]);
            acc = 0;
            held = 0;
        }
    }
    match held {
        2 => out.push((acc >> 4) as u8),
        3 => out.extend_from_slice(&[(acc >> 10) as u8, (acc >> 2) as u8]),
        _ => {}
    }

    Ok(Transformed::compare(input, out))
}

/// Hex decode transformation (`t:hexDecode`).
///
/// A trailing odd byte is dropped before decoding; a non-hex pair is an error.
pub fn hex_decode(input: &[u8]) -> Result<Transformed<'_>> {
    let even = &input[..input.len() & !1];
    let decoded = hex::decode(even).map_err(|e| Error::decode("hexDecode", e.to_string()))?;
    Ok(Transformed::compare(input, decoded))
}

/// Entities ModSecurity decodes to a single byte, `;` optional.
static CORE_ENTITIES: phf::Map<&'static str, u8> = phf_map! {
    "quot" => b'"',
    "amp" => b'&',
    "lt" => b'<',
    "gt" => b'>',
    "nbsp" => 0xa0,
};

/// HTML entity decode transformation (`t:htmlEntityDecode`).
///
/// Numeric entities (`&#NN`, `&#xHH`, `;` optional) decode to one byte.
/// Names are looked up among the core entities first, then, when
/// terminated by `;`, in the full HTML table. Anything else is kept.
pub fn html_entity_decode(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.contains(&b'&') {
        return Ok(Transformed::unchanged(input));
    }

    let len = input.len();
    let mut out = Vec::with_capacity(len);
    let mut i = 0;
    while i < len {
        if input[i] == b'&' && i + 1 < len {
            if let Some(next) = decode_entity(input, i, &mut out) {
                i = next;
                continue;
            }
        }
        out.push(input[i]);
        i += 1;
    }

    Ok(Transformed::compare(input, out))
}

/// Decode the entity starting at `input[amp] == b'&'` into `out`.
///
/// Returns the index after the entity, or `None` (nothing written) when it
/// is not a decodable entity.
fn decode_entity(input: &[u8], amp: usize, out: &mut Vec<u8>) -> Option<usize> {
    let mut j = amp + 1;

    if input[j] == b'#' {
        j += 1;
        let hex = matches!(input.get(j), Some(b'x' | b'X'));
        if hex {
            j += 1;
        }
        let radix = if hex { 16 } else { 10 };
        let start = j.min(input.len());
        let digits = input[start..]
            .iter()
            .take_while(|b| if hex { b.is_ascii_hexdigit() } else { b.is_ascii_digit() })
            .count();
        if digits == 0 {
            return None;
        }
        out.push(numeric_entity_value(&input[start..start + digits], radix));
        j = start + digits;
    } else {
        let name_len = input[j..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        if name_len == 0 {
            return None;
        }
        let name = &input[j..j + name_len];
        j += name_len;

        if let Some(byte) = core_entity(name) {
            out.push(byte);
        } else if input.get(j) == Some(&b';') {
            let decoded = named_entity(name)?;
            out.extend_from_slice(decoded.as_bytes());
            return Some(j + 1);
        } else {
            return None;
        }
    }

    if input.get(j) == Some(&b';') {
        j += 1;
    }
    Some(j)
}

/// Value of a numeric entity truncated to one byte; overflow saturates
/// like C `strtol`.
fn numeric_entity_value(digits: &[u8], radix: u32) -> u8 {
    let value = digits.iter().fold(0u64, |acc, &d| {
        let digit = char::from(d).to_digit(radix).unwrap_or(0);
        acc.saturating_mul(u64::from(radix))
            .saturating_add(u64::from(digit))
    });
    value.min(i64::MAX as u64) as u8
}

fn core_entity(name: &[u8]) -> Option<u8> {
    let mut buf = [0u8; 4];
    let folded = buf.get_mut(..name.len())?;
    folded.copy_from_slice(name);
    folded.make_ascii_lowercase();
    let key = std::str::from_utf8(folded).ok()?;
    CORE_ENTITIES.get(key).copied()
}

fn named_entity(name: &[u8]) -> Option<String> {
    let name = std::str::from_utf8(name).ok()?;
    let entity = format!("&{name};");
    match html_escape::decode_html_entities(&entity) {
        // A legacy prefix match ("&ampfoo;" -> "&foo;") leaves the name tail
        // behind; a real entity decodes to at most two characters.
        Cow::Owned(decoded) if decoded.chars().count() <= 2 => Some(decoded),
        _ => None,
    }
}
