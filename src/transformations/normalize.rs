//! Normalization transformations.

use super::Transformed;
use crate::bytes::{fast_lower, in_slice, is_ascii_space, is_latin_space};
use crate::error::Result;
use std::borrow::Cow;

/// Lowercase transformation (ASCII only).
pub fn lowercase(input: &[u8]) -> Result<Transformed<'_>> {
    Ok(match fast_lower(input) {
        Cow::Borrowed(_) => Transformed::unchanged(input),
        Cow::Owned(lower) => Transformed::changed(lower),
    })
}

/// Uppercase transformation (ASCII only).
pub fn uppercase(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.iter().any(u8::is_ascii_lowercase) {
        return Ok(Transformed::unchanged(input));
    }
    Ok(Transformed::changed(input.to_ascii_uppercase()))
}

/// Trim transformation.
pub fn trim(input: &[u8]) -> Result<Transformed<'_>> {
    let start = leading_spaces(input);
    let end = input.len() - trailing_spaces(&input[start..]);
    Ok(trimmed(input, start, end))
}

/// Trim left transformation.
pub fn trim_left(input: &[u8]) -> Result<Transformed<'_>> {
    Ok(trimmed(input, leading_spaces(input), input.len()))
}

/// Trim right transformation.
pub fn trim_right(input: &[u8]) -> Result<Transformed<'_>> {
    Ok(trimmed(input, 0, input.len() - trailing_spaces(input)))
}

fn leading_spaces(input: &[u8]) -> usize {
    input.iter().take_while(|&&b| is_ascii_space(b)).count()
}

fn trailing_spaces(input: &[u8]) -> usize {
    input.iter().rev().take_while(|&&b| is_ascii_space(b)).count()
}

fn trimmed(input: &[u8], start: usize, end: usize) -> Transformed<'_> {
    if start == 0 && end == input.len() {
        Transformed::unchanged(input)
    } else {
        Transformed::changed(input[start..end].to_vec())
    }
}

/// Remove null bytes transformation.
pub fn remove_nulls(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.contains(&0) {
        return Ok(Transformed::unchanged(input));
    }
    Ok(Transformed::changed(
        input.iter().copied().filter(|&b| b != 0).collect(),
    ))
}

/// Replace null bytes with spaces transformation.
pub fn replace_nulls(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.contains(&0) {
        return Ok(Transformed::unchanged(input));
    }
    Ok(Transformed::changed(
        input
            .iter()
            .map(|&b| if b == 0 { b' ' } else { b })
            .collect(),
    ))
}

/// Remove whitespace transformation.
///
/// Drops every Unicode whitespace scalar. Bytes that are not valid UTF-8
/// are dropped only when they are Latin-1 whitespace (NEL, NBSP).
pub fn remove_whitespace(input: &[u8]) -> Result<Transformed<'_>> {
    let mut out = Vec::with_capacity(input.len());
    for chunk in input.utf8_chunks() {
        let valid = chunk.valid();
        if valid.bytes().all(|b| b.is_ascii() && !is_ascii_space(b)) {
            out.extend_from_slice(valid.as_bytes());
        } else {
            for c in valid.chars().filter(|c| !c.is_whitespace()) {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
        out.extend(chunk.invalid().iter().filter(|&&b| !is_latin_space(b)));
    }
    Ok(Transformed::compare(input, out))
}

/// Compress whitespace transformation.
///
/// Each run of Latin-1 whitespace bytes becomes a single space.
pub fn compress_whitespace(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.iter().any(|&b| is_latin_space(b)) {
        return Ok(Transformed::unchanged(input));
    }

    let mut out = Vec::with_capacity(input.len());
    let mut in_space = false;
    for &b in input {
        if is_latin_space(b) {
            if !in_space {
                out.push(b' ');
                in_space = true;
            }
        } else {
            out.push(b);
            in_space = false;
        }
    }

    Ok(Transformed::compare(input, out))
}

/// Reverse transformation (by Unicode scalar).
///
/// Bytes that are not valid UTF-8 are reversed as single units.
pub fn reverse(input: &[u8]) -> Result<Transformed<'_>> {
    let chunks: Vec<_> = input.utf8_chunks().collect();
    let mut out = Vec::with_capacity(input.len());
    for chunk in chunks.iter().rev() {
        out.extend(chunk.invalid().iter().rev());
        for c in chunk.valid().chars().rev() {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    Ok(Transformed::compare(input, out))
}

/// Bytes dropped by `cmdLine`.
const CMDLINE_DROPPED: &[u8] = b"\\\"'^";
/// Bytes folded into a single space by `cmdLine`.
const CMDLINE_SPACES: &[u8] = b" ,;\t\r\n";

/// Command line normalization transformation (`t:cmdLine`).
///
/// Drops `\ " ' ^`, folds runs of ` , ; \t \r \n` into one space, removes a
/// space before `/` or `(`, and lowercases ASCII.
pub fn cmd_line(input: &[u8]) -> Result<Transformed<'_>> {
    let needs_work = input.iter().any(|b| {
        b.is_ascii_uppercase() || in_slice(b, CMDLINE_DROPPED) || in_slice(b, CMDLINE_SPACES)
    });
    if !needs_work {
        return Ok(Transformed::unchanged(input));
    }

    let mut out = Vec::with_capacity(input.len());
    let mut space = false;
    for &b in input {
        if in_slice(&b, CMDLINE_DROPPED) {
            continue;
        }
        if in_slice(&b, CMDLINE_SPACES) {
            if !space {
                out.push(b' ');
                space = true;
            }
            continue;
        }
        if (b == b'/' || b == b'(') && space {
            out.pop();
        }
        space = false;
        out.push(b.to_ascii_lowercase());
    }

    Ok(Transformed::compare(input, out))
}
