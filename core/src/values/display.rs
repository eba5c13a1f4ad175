//! Canonical text forms of values.

use super::value::{Instant, LocalTime};
use chrono::SecondsFormat;

pub const POSITIVE_INFINITY: &str = "∞";
pub const NEGATIVE_INFINITY: &str = "-∞";

fn format_infinite(value: f64) -> &'static str {
    if value > 0.0 {
        POSITIVE_INFINITY
    } else {
        NEGATIVE_INFINITY
    }
}

/// Integers print without a fractional part.
pub fn format_integer(value: f64) -> Option<String> {
    if value.is_nan() {
        None
    } else if value.is_infinite() {
        Some(format_infinite(value).to_string())
    } else if value == 0.0 {
        // Avoid "-0".
        Some("0".to_string())
    } else {
        Some(format!("{}", value.trunc()))
    }
}

/// Doubles print with exactly three decimals.
pub fn format_double(value: f64) -> Option<String> {
    if value.is_nan() {
        None
    } else if value.is_infinite() {
        Some(format_infinite(value).to_string())
    } else {
        let text = format!("{:.3}", value);
        if text == "-0.000" {
            Some("0.000".to_string())
        } else {
            Some(text)
        }
    }
}

/// ISO-8601 in UTC, with as many fractional digits as needed.
pub fn format_instant(value: &Instant) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn format_local_time(value: &LocalTime) -> String {
    value.to_string()
}

pub fn format_items<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let mut out = String::from("[");
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(item);
    }
    out.push(']');
    out
}
