//! Backslash escape decoders (CSS, JavaScript, ANSI C).

use super::Transformed;
use crate::bytes::{full_width_fold, is_ascii_space, is_odigit, valid_hex, x2c, xsingle2c};
use crate::error::Result;

/// CSS decode transformation (`t:cssDecode`).
///
/// `\` plus 1-6 hex digits decodes to the byte of the last two digits (one
/// digit decodes to its value), with a full-width check for escapes that
/// can encode `U+FFxx`. One whitespace byte after a hex escape is eaten.
pub fn css_decode(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.contains(&b'\\') {
        return Ok(Transformed::unchanged(input));
    }

    let len = input.len();
    let mut out = Vec::with_capacity(len);
    let mut i = 0;

    while i < len {
        if input[i] != b'\\' {
            out.push(input[i]);
            i += 1;
            continue;
        }

        // The backslash itself never reaches the output.
        i += 1;
        if i >= len {
            break;
        }

        let digits = input[i..]
            .iter()
            .take(6)
            .take_while(|&&b| valid_hex(b))
            .count();

        if digits == 0 {
            // Line continuation, or an escaped literal.
            if input[i] != b'\n' {
                out.push(input[i]);
            }
            i += 1;
            continue;
        }

        let hex = &input[i..i + digits];
        let decoded = if digits == 1 {
            xsingle2c(hex[0])
        } else {
            let low = x2c([hex[digits - 2], hex[digits - 1]]);
            let check_full_width = match digits {
                4 => true,
                5 => hex[0] == b'0',
                6 => hex[0] == b'0' && hex[1] == b'0',
                _ => false,
            };
            if check_full_width {
                full_width_fold([hex[digits - 4], hex[digits - 3]], low)
            } else {
                low
            }
        };
        out.push(decoded);
        i += digits;

        if i < len && is_ascii_space(input[i]) {
            i += 1;
        }
    }

    Ok(Transformed::changed(out))
}

/// ANSI C escape decode transformation (`t:escapeSeqDecode`).
///
/// Handles `\a \b \f \n \r \t \v \\ \? \' \"`, `\xHH` and `\OOO`. For any
/// other escape the backslash is dropped.
pub fn escape_seq_decode(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.contains(&b'\\') {
        return Ok(Transformed::unchanged(input));
    }

    let len = input.len();
    let mut out = Vec::with_capacity(len);
    let mut decoded = false;
    let mut i = 0;

    while i < len {
        if input[i] != b'\\' || i + 1 >= len {
            out.push(input[i]);
            i += 1;
            continue;
        }

        decoded = true;
        let next = input[i + 1];
        if let Some(c) = c_escape(next) {
            out.push(c);
            i += 2;
        } else if (next == b'x' || next == b'X')
            && i + 3 < len
            && valid_hex(input[i + 2])
            && valid_hex(input[i + 3])
        {
            out.push(x2c([input[i + 2], input[i + 3]]));
            i += 4;
        } else if is_odigit(next) {
            let digits = octal_digits(&input[i + 1..], 3);
            out.push(octal_value(&input[i + 1..i + 1 + digits]));
            i += 1 + digits;
        } else {
            out.push(next);
            i += 2;
        }
    }

    if decoded {
        Ok(Transformed::changed(out))
    } else {
        Ok(Transformed::unchanged(input))
    }
}

fn c_escape(c: u8) -> Option<u8> {
    match c {
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b'f' => Some(0x0c),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'v' => Some(0x0b),
        b'\\' | b'?' | b'\'' | b'"' => Some(c),
        _ => None,
    }
}

/// JavaScript decode transformation (`t:jsDecode`).
///
/// `\uHHHH` keeps the low byte (full-width forms fold to ASCII), `\xHH`,
/// `\OOO` (at most one byte), the usual single-letter escapes, and `\C`
/// for anything else. A lone trailing backslash is kept.
pub fn js_decode(input: &[u8]) -> Result<Transformed<'_>> {
    if !input.contains(&b'\\') {
        return Ok(Transformed::unchanged(input));
    }

    let len = input.len();
    let mut out = Vec::with_capacity(len);
    let mut decoded = false;
    let mut i = 0;

    while i < len {
        if input[i] != b'\\' {
            out.push(input[i]);
            i += 1;
            continue;
        }

        if i + 5 < len
            && input[i + 1] == b'u'
            && input[i + 2..i + 6].iter().all(|&b| valid_hex(b))
        {
            let low = x2c([input[i + 4], input[i + 5]]);
            out.push(full_width_fold([input[i + 2], input[i + 3]], low));
            i += 6;
        } else if i + 3 < len
            && input[i + 1] == b'x'
            && valid_hex(input[i + 2])
            && valid_hex(input[i + 3])
        {
            out.push(x2c([input[i + 2], input[i + 3]]));
            i += 4;
        } else if i + 1 < len && is_odigit(input[i + 1]) {
            let mut digits = octal_digits(&input[i + 1..], 3);
            // \400 and above would not fit in a byte.
            if digits == 3 && input[i + 1] > b'3' {
                digits = 2;
            }
            out.push(octal_value(&input[i + 1..i + 1 + digits]));
            i += 1 + digits;
        } else if i + 1 < len {
            out.push(match input[i + 1] {
                b'a' => 0x07,
                b'b' => 0x08,
                b'f' => 0x0c,
                b'n' => b'\n',
                b'r' => b'\r',
                b't' => b'\t',
                b'v' => 0x0b,
                c => c,
            });
            i += 2;
        } else {
            out.push(b'\\');
            break;
        }
        decoded = true;
    }

    if decoded {
        Ok(Transformed::changed(out))
    } else {
        Ok(Transformed::unchanged(input))
    }
}

fn octal_digits(s: &[u8], max: usize) -> usize {
    s.iter().take(max).take_while(|&&b| is_odigit(b)).count()
}

/// Base-8 value of up to three digits, truncated to a byte.
fn octal_value(digits: &[u8]) -> u8 {
    digits
        .iter()
        .fold(0u32, |acc, &d| acc * 8 + u32::from(d - b'0')) as u8
}
