//! Integer and float literal grammar
//!
//! Integers accept an optional sign (signed targets only) followed by a
//! decimal literal or a `0x`, `0o`, `0b` or leading-`0` octal literal.
//! Underscore separators are allowed only in prefixed literals, and only
//! between digits or directly after the prefix.

use crate::domain::errors::ValueError;

/// Parses a signed integer literal into `i128`, leaving range checks to the caller
pub(crate) fn parse_signed(input: &str) -> Result<i128, ValueError> {
    let (negative, body) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let magnitude = parse_magnitude(input, body)?;
    let magnitude = i128::try_from(magnitude).map_err(|_| ValueError::range(input))?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Parses an unsigned integer literal; any sign is a syntax error
pub(crate) fn parse_unsigned(input: &str) -> Result<u128, ValueError> {
    if input.starts_with(['+', '-']) {
        return Err(ValueError::syntax(input));
    }
    parse_magnitude(input, input)
}

/// Parses a finite `f64`; `inf`/`nan` spellings are rejected
pub(crate) fn parse_float(input: &str) -> Result<f64, ValueError> {
    let digits = input.trim_start_matches(['+', '-']);
    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Err(ValueError::syntax(input));
    }
    let value: f64 = input.parse().map_err(|_| ValueError::syntax(input))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValueError::range(input))
    }
}

fn parse_magnitude(input: &str, body: &str) -> Result<u128, ValueError> {
    let (radix, digits, prefixed) = split_radix(body);
    if prefixed {
        if !underscores_ok(digits) {
            return Err(ValueError::syntax(input));
        }
    } else if digits.contains('_') {
        return Err(ValueError::syntax(input));
    }

    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        // A bare "0" is split into radix 8 with no digits left.
        return if body == "0" {
            Ok(0)
        } else {
            Err(ValueError::syntax(input))
        };
    }
    if !cleaned.chars().all(|c| c.is_digit(radix)) {
        return Err(ValueError::syntax(input));
    }
    // Digits are validated above, so the only remaining failure is overflow.
    u128::from_str_radix(&cleaned, radix).map_err(|_| ValueError::range(input))
}

fn split_radix(body: &str) -> (u32, &str, bool) {
    let bytes = body.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &body[2..], true),
            b'o' | b'O' => return (8, &body[2..], true),
            b'b' | b'B' => return (2, &body[2..], true),
            _ => return (8, &body[1..], true),
        }
    }
    if body == "0" {
        return (8, "", true);
    }
    (10, body, false)
}

fn underscores_ok(digits: &str) -> bool {
    if digits.ends_with('_') || digits.contains("__") {
        return false;
    }
    true
}
