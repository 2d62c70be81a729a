//! Comment removal transformations.

use super::Transformed;
use crate::error::Result;

/// Remove comments transformation (`t:removeComments`).
///
/// `/* ... */` and `<!-- ... -->` collapse to a single space; an
/// unterminated one becomes a trailing space. The first `--` or `#`
/// outside a comment becomes a space and ends the value.
pub fn remove_comments(input: &[u8]) -> Result<Transformed<'_>> {
    let len = input.len();
    let mut out = Vec::with_capacity(len);
    let mut in_comment = false;
    let mut i = 0;

    while i < len {
        let rest = &input[i..];
        if in_comment {
            if rest.starts_with(b"*/") {
                in_comment = false;
                out.push(b' ');
                i += 2;
            } else if rest.starts_with(b"-->") {
                in_comment = false;
                out.push(b' ');
                i += 3;
            } else {
                i += 1;
            }
        } else if rest.starts_with(b"/*") {
            in_comment = true;
            i += 2;
        } else if rest.starts_with(b"<!--") {
            in_comment = true;
            i += 4;
        } else if rest.starts_with(b"--") || rest[0] == b'#' {
            out.push(b' ');
            return Ok(Transformed::compare(input, out));
        } else {
            out.push(rest[0]);
            i += 1;
        }
    }

    if in_comment {
        out.push(b' ');
    }

    Ok(Transformed::compare(input, out))
}

/// Remove comment characters transformation (`t:removeCommentsChar`).
///
/// Deletes the delimiters `/*`, `*/`, `<!--`, `-->`, `--` and `#` but
/// keeps the text between them.
pub fn remove_comments_char(input: &[u8]) -> Result<Transformed<'_>> {
    let len = input.len();
    let mut out = Vec::with_capacity(len);
    let mut i = 0;

    while i < len {
        let rest = &input[i..];
        let skip = if rest.starts_with(b"/*") || rest.starts_with(b"*/") {
            2
        } else if rest.starts_with(b"<!--") {
            4
        } else if rest.starts_with(b"-->") {
            3
        } else if rest.starts_with(b"--") {
            2
        } else if rest[0] == b'#' {
            1
        } else {
            out.push(rest[0]);
            1
        };
        i += skip;
    }

    Ok(Transformed::compare(input, out))
}

/// Replace comments transformation (`t:replaceComments`).
///
/// Each `/* ... */` becomes a single space, as does an unterminated `/*`.
pub fn replace_comments(input: &[u8]) -> Result<Transformed<'_>> {
    let len = input.len();
    let mut out = Vec::with_capacity(len);
    let mut in_comment = false;
    let mut i = 0;

    while i < len {
        let rest = &input[i..];
        if in_comment {
            if rest.starts_with(b"*/") {
                in_comment = false;
                out.push(b' ');
                i += 2;
            } else {
                i += 1;
            }
        } else if rest.starts_with(b"/*") {
            in_comment = true;
            i += 2;
        } else {
            out.push(rest[0]);
            i += 1;
        }
    }

    if in_comment {
        out.push(b' ');
    }

    Ok(Transformed::compare(input, out))
}
