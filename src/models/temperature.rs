use crate::error::{ProcessingError, Result};

/// Decode a temperature field of the form `[-][0-9]{1,2}.[0-9]` starting at `start`.
///
/// Returns the value in tenths of a degree together with the offset one past the
/// fractional digit. The following `\n` is left for the caller.
#[inline(always)]
pub fn decode_temperature(buf: &[u8], start: usize) -> Result<(i32, usize)> {
    let mut pos = start;

    let negative = buf.get(pos) == Some(&b'-');
    if negative {
        pos += 1;
    }

    let mut value = digit_at(buf, pos)?;
    pos += 1;

    if buf.get(pos) != Some(&b'.') {
        value = value * 10 + digit_at(buf, pos)?;
        pos += 1;
        if buf.get(pos) != Some(&b'.') {
            return Err(unexpected(buf, pos, "'.'"));
        }
    }
    pos += 1;

    value = value * 10 + digit_at(buf, pos)?;
    pos += 1;

    Ok((if negative { -value } else { value }, pos))
}

#[inline(always)]
fn digit_at(buf: &[u8], pos: usize) -> Result<i32> {
    match buf.get(pos) {
        Some(b) if b.is_ascii_digit() => Ok((b - b'0') as i32),
        _ => Err(unexpected(buf, pos, "a digit")),
    }
}

#[cold]
fn unexpected(buf: &[u8], pos: usize, expected: &str) -> ProcessingError {
    let reason = match buf.get(pos) {
        Some(b) => format!("expected {} in temperature, found {:?}", expected, *b as char),
        None => format!("expected {} in temperature, found end of block", expected),
    };
    ProcessingError::malformed(pos, reason)
}

/// Fixed-point tenths to degrees.
#[inline]
pub fn x10_to_celsius(value_x10: i32) -> f64 {
    value_x10 as f64 / 10.0
}

/// Render tenths with exactly one fractional digit, the way records are written.
pub fn format_x10(value_x10: i32) -> String {
    let sign = if value_x10 < 0 { "-" } else { "" };
    let abs = value_x10.unsigned_abs();
    format!("{}{}.{}", sign, abs / 10, abs % 10)
}
