//! Text conversion of instants and times of day.
//!
//! Patterns use strftime syntax. Locales only affect formatting; parsing
//! always reads English names.

use crate::errors::{ExpressionError, Result};
use crate::values::{Instant, LocalTime};
use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, Locale, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use core::fmt::Write;

pub fn validate_pattern(function: &str, pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(ExpressionError::value_error(
            function,
            format!("invalid date pattern '{pattern}'"),
        ));
    }
    Ok(())
}

/// Accepts both `de_DE` and `de-DE`.
pub fn parse_locale(function: &str, name: &str) -> Result<Locale> {
    let normalized = name.trim().replace('-', "_");
    Locale::try_from(normalized.as_str())
        .map_err(|_| ExpressionError::value_error(function, format!("unknown locale '{name}'")))
}

/// Local date-time to instant; ambiguous times take the earlier instant,
/// times inside a gap are moved forward by an hour.
pub fn resolve_local(zone: Tz, local: NaiveDateTime) -> Option<Instant> {
    let resolved = match zone.from_local_datetime(&local) {
        LocalResult::Single(t) => Some(t),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => zone
            .from_local_datetime(&local.checked_add_signed(TimeDelta::hours(1))?)
            .earliest(),
    };
    resolved.map(|t| t.with_timezone(&Utc))
}

const LOCAL_PATTERNS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses ISO-8601 style text.
///
/// Accepts an offset or `Z`, a trailing `[zone]`, a space instead of `T`,
/// any fractional-second width, and a bare date. Zone-less text is read in
/// the bracketed zone if present, else in `zone`.
pub fn parse_instant_default(text: &str, zone: Tz) -> Option<Instant> {
    let text = text.trim();
    let (body, zone) = match text.strip_suffix(']').and_then(|t| t.split_once('[')) {
        Some((body, name)) => (body, name.parse::<Tz>().ok()?),
        None => (text, zone),
    };
    let body = body.replacen(' ', "T", 1);

    if let Ok(t) = DateTime::parse_from_rfc3339(&body) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_str(&body, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(t.with_timezone(&Utc));
    }
    for pattern in LOCAL_PATTERNS {
        if let Ok(local) = NaiveDateTime::parse_from_str(&body, pattern) {
            return resolve_local(zone, local);
        }
    }
    let date = NaiveDate::parse_from_str(&body, "%Y-%m-%d").ok()?;
    resolve_local(zone, date.and_time(NaiveTime::MIN))
}

pub fn parse_local_time_default(text: &str) -> Option<LocalTime> {
    let text = text.trim();
    text.parse::<NaiveTime>()
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

/// Parses `text` with a strftime `pattern`; patterns without an offset are
/// read in `zone`, patterns without a time read midnight.
pub fn parse_instant_with(function: &str, text: &str, pattern: &str, zone: Tz) -> Result<Instant> {
    validate_pattern(function, pattern)?;
    if let Ok(t) = DateTime::parse_from_str(text, pattern) {
        return Ok(t.with_timezone(&Utc));
    }
    let local = NaiveDateTime::parse_from_str(text, pattern)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, pattern)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        });
    local
        .and_then(|local| resolve_local(zone, local))
        .ok_or_else(|| unparseable(function, text, Some(pattern)))
}

pub fn parse_time_with(function: &str, text: &str, pattern: &str) -> Result<LocalTime> {
    validate_pattern(function, pattern)?;
    NaiveTime::parse_from_str(text, pattern).map_err(|_| unparseable(function, text, Some(pattern)))
}

pub fn unparseable(function: &str, text: &str, pattern: Option<&str>) -> ExpressionError {
    let message = match pattern {
        Some(pattern) => format!("cannot parse '{text}' with pattern '{pattern}'"),
        None => format!("cannot parse '{text}'"),
    };
    ExpressionError::value_error(function, message)
}

/// Renders a formatting closure, turning formatter failures (e.g. a date
/// field requested from a time of day) into value faults.
fn render(function: &str, pattern: &str, f: impl FnOnce(&mut String) -> core::fmt::Result) -> Result<String> {
    let mut out = String::new();
    f(&mut out).map_err(|_| {
        ExpressionError::value_error(function, format!("pattern '{pattern}' does not apply"))
    })?;
    Ok(out)
}

pub fn format_instant_with(
    function: &str,
    value: Instant,
    pattern: &str,
    locale: Option<Locale>,
    zone: Tz,
) -> Result<String> {
    validate_pattern(function, pattern)?;
    let local = value.with_timezone(&zone);
    render(function, pattern, |out| match locale {
        Some(locale) => write!(out, "{}", local.format_localized(pattern, locale)),
        None => write!(out, "{}", local.format(pattern)),
    })
}

pub fn format_time_with(
    function: &str,
    value: LocalTime,
    pattern: &str,
    locale: Option<Locale>,
) -> Result<String> {
    validate_pattern(function, pattern)?;
    render(function, pattern, |out| {
        // The plain formatter rejects date fields, localized or not.
        write!(out, "{}", value.format(pattern))?;
        if let Some(locale) = locale {
            out.clear();
            let anchored = NaiveDate::default().and_time(value).and_utc();
            write!(out, "{}", anchored.format_localized(pattern, locale))?;
        }
        Ok(())
    })
}
