//! Duration text in the compact `1h20m30s` form.
//!
//! The same grammar is used for command-line arguments, environment
//! variables, defaults and YAML documents. Use the module as a serde helper
//! on `std::time::Duration` fields:
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Cfg {
//!     #[serde(with = "yamfig::duration")]
//!     timeout: Duration,
//! }
//! ```
//!
//! On input the helper also accepts a plain integer, read as nanoseconds.

use std::fmt;
use std::time::Duration;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

/// Fraction digits beyond this are ignored.
const MAX_FRACTION_DIGITS: usize = 18;

const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", NANOS_PER_MICRO),
    ("µs", NANOS_PER_MICRO), // U+00B5 micro sign
    ("μs", NANOS_PER_MICRO), // U+03BC greek mu
    ("ms", NANOS_PER_MILLI),
    ("s", NANOS_PER_SEC),
    ("m", NANOS_PER_MIN),
    ("h", NANOS_PER_HOUR),
];

/// Parse a duration such as `"300ms"`, `"1.5h"` or `"2h45m"`.
///
/// A leading `+` is accepted. A leading `-` is only accepted for a zero
/// duration since `std::time::Duration` cannot be negative. The bare string
/// `"0"` needs no unit.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let (negative, mut rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err("empty duration".into());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err("expected a number".into());
        }

        let unit_len = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, remainder) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err("missing unit".into());
        }
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| format!("unknown unit '{unit}'"))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| "duration out of range")?
        };
        total = whole
            .checked_mul(scale)
            .and_then(|nanos| total.checked_add(nanos))
            .ok_or("duration out of range")?;

        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u128 = digits.parse().map_err(|_| "invalid fraction")?;
            let denominator = 10u128.pow(digits.len() as u32);
            total += numerator * scale / denominator;
        }

        if total > u128::from(u64::MAX) {
            return Err("duration out of range".into());
        }
        rest = remainder;
    }

    if negative && total != 0 {
        return Err("negative durations are not supported".into());
    }
    Ok(Duration::from_nanos(total as u64))
}

/// Format a duration the way [`parse_duration`] reads it back.
///
/// Sub-second values use the largest fitting unit (`1.5ms`); longer ones are
/// spelled out in hours, minutes and seconds (`1h0m30s`).
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".into();
    }

    let mut out = String::new();
    if nanos < NANOS_PER_MICRO {
        out.push_str(&nanos.to_string());
        out.push_str("ns");
    } else if nanos < NANOS_PER_MILLI {
        push_fraction(&mut out, nanos, NANOS_PER_MICRO, 3);
        out.push_str("µs");
    } else if nanos < NANOS_PER_SEC {
        push_fraction(&mut out, nanos, NANOS_PER_MILLI, 6);
        out.push_str("ms");
    } else {
        let hours = nanos / NANOS_PER_HOUR;
        let minutes = nanos % NANOS_PER_HOUR / NANOS_PER_MIN;
        if hours > 0 {
            out.push_str(&format!("{hours}h"));
        }
        if hours > 0 || minutes > 0 {
            out.push_str(&format!("{minutes}m"));
        }
        push_fraction(&mut out, nanos % NANOS_PER_MIN, NANOS_PER_SEC, 9);
        out.push('s');
    }
    out
}

fn push_fraction(out: &mut String, value: u128, unit: u128, width: usize) {
    out.push_str(&(value / unit).to_string());
    let remainder = value % unit;
    if remainder != 0 {
        let digits = format!("{remainder:0width$}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
}

pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    deserializer.deserialize_any(DurationVisitor)
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"1h20m30s\" or an integer number of nanoseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        parse_duration(v).map_err(|reason| E::custom(format!("invalid duration '{v}': {reason}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
        Ok(Duration::from_nanos(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
        u64::try_from(v)
            .map(Duration::from_nanos)
            .map_err(|_| E::custom("negative durations are not supported"))
    }
}
