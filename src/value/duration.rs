//! Compound duration literals
//!
//! A literal is an optionally signed sequence of `<number><unit>` pairs such as
//! `300ms`, `-1.5h` or `2h45m`. Units are `ns`, `us` (or `µs`/`μs`), `ms`, `s`,
//! `m` and `h`. The bare literal `0` needs no unit. Totals are kept in signed
//! 64-bit nanoseconds.

use crate::domain::errors::DurationError;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Magnitude of `i64::MIN`, the largest total a negative literal may reach
const MAX_MAGNITUDE: u64 = 1 << 63;

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parses a duration literal into nanoseconds
pub(crate) fn parse_nanos(input: &str) -> Result<i64, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());
    let overflow = || DurationError::Overflow(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (whole, after_whole) = leading_int(rest).ok_or_else(invalid)?;
        let has_whole = after_whole.len() != rest.len();
        rest = after_whole;

        let mut fraction = 0u64;
        let mut scale = 1f64;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (f, s, after_fraction) = leading_fraction(after_dot);
            has_fraction = after_fraction.len() != after_dot.len();
            fraction = f;
            scale = s;
            rest = after_fraction;
        }
        if !has_whole && !has_fraction {
            return Err(invalid());
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_end == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];
        let unit = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        if whole > MAX_MAGNITUDE / unit {
            return Err(overflow());
        }
        let mut value = whole * unit;
        if fraction > 0 {
            // fraction / scale of one unit, e.g. ".5" of "h"
            value += (fraction as f64 * (unit as f64 / scale)) as u64;
            if value > MAX_MAGNITUDE {
                return Err(overflow());
            }
        }
        total = total.checked_add(value).ok_or_else(overflow)?;
        if total > MAX_MAGNITUDE {
            return Err(overflow());
        }
    }

    if negative {
        // total <= 2^63 here, so the wrap only happens for exactly i64::MIN.
        return Ok((total as i64).wrapping_neg());
    }
    i64::try_from(total).map_err(|_| overflow())
}

/// Consumes leading decimal digits; `None` on overflow
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    for b in s[..end].bytes() {
        if value > MAX_MAGNITUDE / 10 {
            return None;
        }
        value = value * 10 + u64::from(b - b'0');
        if value > MAX_MAGNITUDE {
            return None;
        }
    }
    Some((value, &s[end..]))
}

/// Consumes fractional digits, dropping precision once it would overflow
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    let mut scale = 1f64;
    let mut saturated = false;
    for b in s[..end].bytes() {
        if saturated {
            continue;
        }
        if value > (MAX_MAGNITUDE - 1) / 10 {
            saturated = true;
            continue;
        }
        let next = value * 10 + u64::from(b - b'0');
        if next > MAX_MAGNITUDE {
            saturated = true;
            continue;
        }
        value = next;
        scale *= 10.0;
    }
    (value, scale, &s[end..])
}

/// Renders nanoseconds in the canonical `72h3m0.5s` form
///
/// Durations under one second use the largest sub-second unit that keeps the
/// integer part non-zero, e.g. `1.5ms`. Zero renders as `0s`.
pub(crate) fn format_nanos(nanos: i64) -> String {
    let negative = nanos < 0;
    let mut u = nanos.unsigned_abs();
    let mut out = String::new();

    if u < SECOND {
        if u == 0 {
            return "0s".to_string();
        }
        let (digits, unit) = if u < MICROSECOND {
            (u.to_string(), "ns")
        } else if u < MILLISECOND {
            (with_fraction(u, 3), "µs")
        } else {
            (with_fraction(u, 6), "ms")
        };
        out.push_str(&digits);
        out.push_str(unit);
    } else {
        let seconds = with_fraction(u % MINUTE, 9);
        u /= MINUTE;
        let minutes = u % 60;
        let hours = u / 60;
        if hours > 0 {
            out.push_str(&format!("{hours}h{minutes}m"));
        } else if minutes > 0 {
            out.push_str(&format!("{minutes}m"));
        }
        out.push_str(&seconds);
        out.push('s');
    }

    if negative {
        out.insert(0, '-');
    }
    out
}

/// Formats `v / 10^precision` with trailing fractional zeros trimmed
fn with_fraction(v: u64, precision: u32) -> String {
    let divisor = 10u64.pow(precision);
    let whole = v / divisor;
    let fraction = v % divisor;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = precision as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
