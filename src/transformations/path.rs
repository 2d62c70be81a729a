//! Path normalization transformations.
//!
//! Normalization is purely lexical; the filesystem is never consulted.

use super::Transformed;
use crate::error::Result;

/// Normalize path transformation (`t:normalizePath`, `t:normalisePath`).
///
/// Collapses repeated separators and resolves `.` and `..`. A trailing `/`
/// in the input is kept; a path that cleans down to `.` becomes empty.
pub fn normalize_path(input: &[u8]) -> Result<Transformed<'_>> {
    if input.is_empty() {
        return Ok(Transformed::unchanged(input));
    }

    let mut clean = clean_path(input);
    if clean == b"." {
        clean.clear();
    } else if input.last() == Some(&b'/') && clean.last() != Some(&b'/') {
        clean.push(b'/');
    }

    Ok(Transformed::compare(input, clean))
}

/// Normalize Windows path transformation (`t:normalizePathWin`, `t:normalisePathWin`).
///
/// Backslashes are converted to `/` before normalizing.
pub fn normalize_path_win(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.contains(&b'\\') {
        return normalize_path(input);
    }

    let slashed: Vec<u8> = input
        .iter()
        .map(|&b| if b == b'\\' { b'/' } else { b })
        .collect();
    let normalized = normalize_path(&slashed)?.into_value().into_owned();
    Ok(Transformed::compare(input, normalized))
}

/// Lexically clean a `/`-separated path. Never returns an empty path.
fn clean_path(path: &[u8]) -> Vec<u8> {
    let n = path.len();
    let rooted = path.first() == Some(&b'/');
    let mut out = Vec::with_capacity(n);
    // Length of the prefix that ".." may not remove.
    let mut floor = 0;
    let mut r = 0;

    if rooted {
        out.push(b'/');
        r = 1;
        floor = 1;
    }

    while r < n {
        let rest = &path[r..];
        if rest[0] == b'/' {
            r += 1;
        } else if rest == b"." || rest.starts_with(b"./") {
            r += 1;
        } else if rest == b".." || rest.starts_with(b"../") {
            r += 2;
            if out.len() > floor {
                // Drop the last element along with its separator.
                let mut removed = out.pop();
                while out.len() > floor && removed != Some(b'/') {
                    removed = out.pop();
                }
            } else if !rooted {
                if !out.is_empty() {
                    out.push(b'/');
                }
                out.extend_from_slice(b"..");
                floor = out.len();
            }
        } else {
            if out.len() != usize::from(rooted) {
                out.push(b'/');
            }
            let element = rest.iter().take_while(|&&b| b != b'/').count();
            out.extend_from_slice(&rest[..element]);
            r += element;
        }
    }

    if out.is_empty() {
        out.push(b'.');
    }
    out
}
