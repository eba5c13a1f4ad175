//! Instant functions: `date_diff`, `date_add`, `date_set`, `date_get`,
//! `date_parse_str`, `date_str`, `date_now`, `date_before`, `date_after`,
//! `date_millis`, `date_parse`.
//!
//! Units from DAY upward are counted on the local calendar of a zone, which
//! defaults to the context's default zone.

use super::format::{
    format_instant_with, parse_instant_default, parse_instant_with, parse_locale, resolve_local,
    unparseable, validate_pattern,
};
use super::units::{DateUnit, check_constant, parse_unit, parse_zone, text_at, zone_at};
use super::GROUP;
use crate::errors::{ExpressionError, Result};
use crate::evaluator::ExpressionEvaluator;
use crate::stdlib::{Arity, NativeFunction, Param, check_params, constant_value, value_node};
use crate::types::ExpressionType;
use crate::values::{Instant, Value};
use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;

fn overflow(function: &str) -> ExpressionError {
    ExpressionError::value_error(function, "the result is out of the supported range")
}

fn local(value: Instant, zone: Tz) -> NaiveDateTime {
    value.with_timezone(&zone).naive_local()
}

// ============================================================================
// Differences
// ============================================================================

/// End date moved by a day when the time of day has not been reached yet,
/// so that only complete days count.
fn adjusted_end(start: NaiveDateTime, end: NaiveDateTime) -> NaiveDate {
    let end_date = end.date();
    if end_date > start.date() && end.time() < start.time() {
        end_date.pred_opt().unwrap_or(end_date)
    } else if end_date < start.date() && end.time() > start.time() {
        end_date.succ_opt().unwrap_or(end_date)
    } else {
        end_date
    }
}

fn days_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (adjusted_end(start, end) - start.date()).num_days()
}

fn months_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let from = start.date();
    let to = adjusted_end(start, end);
    let months = (i64::from(to.year()) * 12 + i64::from(to.month0()))
        - (i64::from(from.year()) * 12 + i64::from(from.month0()));
    if months > 0 && to.day() < from.day() {
        months - 1
    } else if months < 0 && to.day() > from.day() {
        months + 1
    } else {
        months
    }
}

/// Signed number of whole `unit`s from `a` to `b`.
pub fn diff(function: &str, a: Instant, b: Instant, unit: DateUnit, zone: Tz) -> Result<i64> {
    let delta = b.signed_duration_since(a);
    Ok(match unit {
        DateUnit::Nanosecond => delta.num_nanoseconds().ok_or_else(|| overflow(function))?,
        DateUnit::Millisecond => delta.num_milliseconds(),
        DateUnit::Second => delta.num_seconds(),
        DateUnit::Minute => delta.num_minutes(),
        DateUnit::Hour => delta.num_hours(),
        DateUnit::Day => days_between(local(a, zone), local(b, zone)),
        DateUnit::Week => days_between(local(a, zone), local(b, zone)) / 7,
        DateUnit::Month => months_between(local(a, zone), local(b, zone)),
        DateUnit::Year => months_between(local(a, zone), local(b, zone)) / 12,
    })
}

// ============================================================================
// Addition
// ============================================================================

fn shift_local(
    function: &str,
    value: Instant,
    zone: Tz,
    shift: impl FnOnce(NaiveDateTime) -> Option<NaiveDateTime>,
) -> Result<Instant> {
    shift(local(value, zone))
        .and_then(|shifted| resolve_local(zone, shifted))
        .ok_or_else(|| overflow(function))
}

/// Adds `amount` (truncated) units; NaN gives `None`, infinities saturate.
pub fn add(function: &str, value: Instant, amount: f64, unit: DateUnit, zone: Tz) -> Result<Option<Instant>> {
    if amount.is_nan() {
        return Ok(None);
    }
    if amount.is_infinite() {
        return Ok(Some(if amount > 0.0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        }));
    }
    let amount = amount.trunc();
    if amount.abs() >= i64::MAX as f64 {
        return Err(overflow(function));
    }
    let n = amount as i64;
    let shifted = match unit {
        DateUnit::Nanosecond
        | DateUnit::Millisecond
        | DateUnit::Second
        | DateUnit::Minute
        | DateUnit::Hour => {
            let delta = match unit {
                DateUnit::Nanosecond => Some(TimeDelta::nanoseconds(n)),
                DateUnit::Millisecond => TimeDelta::try_milliseconds(n),
                DateUnit::Second => TimeDelta::try_seconds(n),
                DateUnit::Minute => TimeDelta::try_minutes(n),
                _ => TimeDelta::try_hours(n),
            };
            delta
                .and_then(|d| value.checked_add_signed(d))
                .ok_or_else(|| overflow(function))?
        }
        DateUnit::Day | DateUnit::Week => {
            let days = if unit == DateUnit::Week {
                n.checked_mul(7).ok_or_else(|| overflow(function))?
            } else {
                n
            };
            shift_local(function, value, zone, |l| {
                if days >= 0 {
                    l.checked_add_days(Days::new(days.unsigned_abs()))
                } else {
                    l.checked_sub_days(Days::new(days.unsigned_abs()))
                }
            })?
        }
        DateUnit::Month | DateUnit::Year => {
            let months = if unit == DateUnit::Year {
                n.checked_mul(12).ok_or_else(|| overflow(function))?
            } else {
                n
            };
            let count = u32::try_from(months.unsigned_abs()).map_err(|_| overflow(function))?;
            shift_local(function, value, zone, |l| {
                if months >= 0 {
                    l.checked_add_months(Months::new(count))
                } else {
                    l.checked_sub_months(Months::new(count))
                }
            })?
        }
    };
    Ok(Some(shifted))
}

// ============================================================================
// Fields
// ============================================================================

pub const MAX_YEAR: i64 = 999_999_999;

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from((next - first).num_days()).ok()
}

/// Date with `year` and `month`, the day clamped to the month's length.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)?))
}

pub fn field_value(function: &str, unit: DateUnit, value: f64, min: i64, max: i64) -> Result<i64> {
    if value.fract() != 0.0 || !value.is_finite() || value < min as f64 || value > max as f64 {
        return Err(ExpressionError::value_error(
            function,
            format!("{unit} must be a whole number in {min}..={max}, was {value}"),
        ));
    }
    Ok(value as i64)
}

/// Widest valid range of a field; the last DAY still depends on the month.
pub fn field_range(unit: DateUnit) -> (i64, i64) {
    match unit {
        DateUnit::Nanosecond => (0, 999_999_999),
        DateUnit::Millisecond => (0, 999),
        DateUnit::Second | DateUnit::Minute => (0, 59),
        DateUnit::Hour => (0, 23),
        DateUnit::Day => (1, 31),
        DateUnit::Week => (1, 53),
        DateUnit::Month => (0, 11),
        DateUnit::Year => (-MAX_YEAR, MAX_YEAR),
    }
}

/// Range-checks a constant field value when its unit is constant too, so
/// that `date_set(d, 24, DATE_UNIT_HOUR)` faults at parse time.
pub fn check_constant_field(
    function: &str,
    value: Option<&ExpressionEvaluator>,
    unit: Option<&ExpressionEvaluator>,
    parse: impl Fn(&str) -> Result<DateUnit>,
) -> Result<()> {
    let (Some(value), Some(unit)) = (value, unit) else {
        return Ok(());
    };
    let (Some(value), Some(unit)) = (constant_value(value)?, constant_value(unit)?) else {
        return Ok(());
    };
    let (Some(field), Some(unit)) = (value.as_f64(), unit.as_str()) else {
        return Ok(());
    };
    if field.is_nan() {
        return Ok(());
    }
    let unit = parse(unit)?;
    let (min, max) = field_range(unit);
    field_value(function, unit, field, min, max).map(drop)
}

/// Overwrites the `unit` field of `value` as seen in `zone`.
pub fn set(function: &str, value: Instant, field: f64, unit: DateUnit, zone: Tz) -> Result<Instant> {
    let local = local(value, zone);
    let (date, time) = (local.date(), local.time());
    let (min, max) = field_range(unit);
    let updated = match unit {
        DateUnit::Nanosecond => local.with_nanosecond(field_value(function, unit, field, min, max)? as u32),
        DateUnit::Millisecond => {
            let ms = field_value(function, unit, field, min, max)? as u32;
            local.with_nanosecond(ms * 1_000_000 + time.nanosecond() % 1_000_000)
        }
        DateUnit::Second => local.with_second(field_value(function, unit, field, min, max)? as u32),
        DateUnit::Minute => local.with_minute(field_value(function, unit, field, min, max)? as u32),
        DateUnit::Hour => local.with_hour(field_value(function, unit, field, min, max)? as u32),
        DateUnit::Day => {
            let last = days_in_month(date.year(), date.month()).map_or(max, i64::from);
            local.with_day(field_value(function, unit, field, min, last)? as u32)
        }
        DateUnit::Week => {
            let week = field_value(function, unit, field, min, max)? as u32;
            let iso = date.iso_week();
            let moved = NaiveDate::from_isoywd_opt(iso.year(), week, date.weekday()).ok_or_else(|| {
                ExpressionError::value_error(function, format!("{} has no week {week}", iso.year()))
            })?;
            Some(moved.and_time(time))
        }
        DateUnit::Month => {
            let month = field_value(function, unit, field, min, max)? as u32 + 1;
            clamped_date(date.year(), month, date.day()).map(|d| d.and_time(time))
        }
        DateUnit::Year => {
            let year = field_value(function, unit, field, min, max)? as i32;
            clamped_date(year, date.month(), date.day()).map(|d| d.and_time(time))
        }
    };
    updated
        .and_then(|l| resolve_local(zone, l))
        .ok_or_else(|| overflow(function))
}

/// One field of `value` as seen in `zone`; the month is 0-based.
pub fn get(value: Instant, unit: DateUnit, zone: Tz) -> i64 {
    let local = value.with_timezone(&zone);
    let field = match unit {
        DateUnit::Nanosecond => local.nanosecond() % 1_000_000_000,
        DateUnit::Millisecond => local.nanosecond() % 1_000_000_000 / 1_000_000,
        DateUnit::Second => local.second(),
        DateUnit::Minute => local.minute(),
        DateUnit::Hour => local.hour(),
        DateUnit::Day => local.day(),
        DateUnit::Week => local.iso_week().week(),
        DateUnit::Month => local.month0(),
        DateUnit::Year => return i64::from(local.year()),
    };
    i64::from(field)
}

// ============================================================================
// Function table
// ============================================================================

fn integer(value: Option<i64>) -> Value {
    Value::Integer(value.map_or(f64::NAN, |v| v as f64))
}

fn date_diff() -> NativeFunction {
    NativeFunction::new("date_diff", GROUP, "date_diff(from, to, unit[, zone])", Arity::range(3, 4), |ctx, args| {
        let zone = ctx.options().default_time_zone;
        check_params("date_diff", args, &[Param::Instant, Param::Instant, Param::Text, Param::Text])?;
        check_constant(args.get(2), |t| parse_unit("date_diff", t))?;
        check_constant(args.get(3), |t| parse_zone("date_diff", t))?;
        Ok(value_node(ExpressionType::Integer, args, move |v| {
            let (Some(a), Some(b), Some(unit)) = (v[0].as_instant(), v[1].as_instant(), v[2].as_str()) else {
                return Ok(integer(None));
            };
            let unit = parse_unit("date_diff", unit)?;
            let Some(zone) = zone_at("date_diff", v, 3, zone)? else {
                return Ok(integer(None));
            };
            diff("date_diff", a, b, unit, zone).map(|n| integer(Some(n)))
        }))
    })
}

fn date_add() -> NativeFunction {
    NativeFunction::new("date_add", GROUP, "date_add(date, amount, unit[, zone])", Arity::range(3, 4), |ctx, args| {
        let zone = ctx.options().default_time_zone;
        check_params("date_add", args, &[Param::Instant, Param::Numeric, Param::Text, Param::Text])?;
        check_constant(args.get(2), |t| parse_unit("date_add", t))?;
        check_constant(args.get(3), |t| parse_zone("date_add", t))?;
        Ok(value_node(ExpressionType::Instant, args, move |v| {
            let (Some(a), Some(amount), Some(unit)) = (v[0].as_instant(), v[1].as_f64(), v[2].as_str()) else {
                return Ok(Value::Instant(None));
            };
            let unit = parse_unit("date_add", unit)?;
            let Some(zone) = zone_at("date_add", v, 3, zone)? else {
                return Ok(Value::Instant(None));
            };
            add("date_add", a, amount, unit, zone).map(Value::Instant)
        }))
    })
}

fn date_set() -> NativeFunction {
    NativeFunction::new("date_set", GROUP, "date_set(date, value, unit[, zone])", Arity::range(3, 4), |ctx, args| {
        let zone = ctx.options().default_time_zone;
        check_params("date_set", args, &[Param::Instant, Param::Numeric, Param::Text, Param::Text])?;
        check_constant(args.get(2), |t| parse_unit("date_set", t))?;
        check_constant(args.get(3), |t| parse_zone("date_set", t))?;
        check_constant_field("date_set", args.get(1), args.get(2), |t| parse_unit("date_set", t))?;
        Ok(value_node(ExpressionType::Instant, args, move |v| {
            let (Some(a), Some(field), Some(unit)) = (v[0].as_instant(), v[1].as_f64(), v[2].as_str()) else {
                return Ok(Value::Instant(None));
            };
            if field.is_nan() {
                return Ok(Value::Instant(None));
            }
            let unit = parse_unit("date_set", unit)?;
            let Some(zone) = zone_at("date_set", v, 3, zone)? else {
                return Ok(Value::Instant(None));
            };
            set("date_set", a, field, unit, zone).map(|t| Value::Instant(Some(t)))
        }))
    })
}

fn date_get() -> NativeFunction {
    NativeFunction::new("date_get", GROUP, "date_get(date, unit[, zone])", Arity::range(2, 3), |ctx, args| {
        let zone = ctx.options().default_time_zone;
        check_params("date_get", args, &[Param::Instant, Param::Text, Param::Text])?;
        check_constant(args.get(1), |t| parse_unit("date_get", t))?;
        check_constant(args.get(2), |t| parse_zone("date_get", t))?;
        Ok(value_node(ExpressionType::Integer, args, move |v| {
            let (Some(a), Some(unit)) = (v[0].as_instant(), v[1].as_str()) else {
                return Ok(integer(None));
            };
            let unit = parse_unit("date_get", unit)?;
            let Some(zone) = zone_at("date_get", v, 2, zone)? else {
                return Ok(integer(None));
            };
            Ok(integer(Some(get(a, unit, zone))))
        }))
    })
}

/// Constant pattern, locale and zone arguments starting at `first`.
fn check_format_args(function: &'static str, args: &[ExpressionEvaluator], first: usize) -> Result<()> {
    check_constant(args.get(first), |t| validate_pattern(function, t))?;
    check_constant(args.get(first + 1), |t| parse_locale(function, t))?;
    check_constant(args.get(first + 2), |t| parse_zone(function, t))
}

fn date_parse_str() -> NativeFunction {
    NativeFunction::new(
        "date_parse_str",
        GROUP,
        "date_parse_str(text[, pattern[, locale[, zone]]])",
        Arity::range(1, 4),
        |ctx, args| {
            let zone = ctx.options().default_time_zone;
            check_params("date_parse_str", args, &[Param::Text])?;
            check_format_args("date_parse_str", args, 1)?;
            Ok(value_node(ExpressionType::Instant, args, move |v| {
                let Some(text) = v[0].as_str() else {
                    return Ok(Value::Instant(None));
                };
                if let Some(locale) = text_at(v, 2) {
                    parse_locale("date_parse_str", locale)?;
                }
                let zone = zone_at("date_parse_str", v, 3, zone)?.unwrap_or(zone);
                let parsed = match text_at(v, 1) {
                    Some(pattern) => parse_instant_with("date_parse_str", text, pattern, zone)?,
                    None => parse_instant_default(text, zone)
                        .ok_or_else(|| unparseable("date_parse_str", text, None))?,
                };
                Ok(Value::Instant(Some(parsed)))
            }))
        },
    )
}

fn date_str() -> NativeFunction {
    NativeFunction::new(
        "date_str",
        GROUP,
        "date_str(date[, pattern[, locale[, zone]]])",
        Arity::range(1, 4),
        |ctx, args| {
            let zone = ctx.options().default_time_zone;
            check_params("date_str", args, &[Param::Instant, Param::Text])?;
            check_format_args("date_str", args, 1)?;
            Ok(value_node(ExpressionType::String, args, move |v| {
                let Some(value) = v[0].as_instant() else {
                    return Ok(Value::String(None));
                };
                let locale = text_at(v, 2)
                    .map(|name| parse_locale("date_str", name))
                    .transpose()?;
                let zone = zone_at("date_str", v, 3, zone)?.unwrap_or(zone);
                let text = match text_at(v, 1) {
                    Some(pattern) => format_instant_with("date_str", value, pattern, locale, zone)?,
                    None => value
                        .with_timezone(&zone)
                        .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                };
                Ok(Value::string(text))
            }))
        },
    )
}

fn comparison(name: &'static str, signature: &'static str, before: bool) -> NativeFunction {
    NativeFunction::new(name, GROUP, signature, Arity::exact(2), move |_, args| {
        check_params(name, args, &[Param::Instant])?;
        Ok(value_node(ExpressionType::Boolean, args, move |v| {
            let result = v[0]
                .as_instant()
                .zip(v[1].as_instant())
                .map(|(a, b)| if before { a < b } else { a > b });
            Ok(Value::Boolean(result))
        }))
    })
}

pub fn functions() -> Vec<NativeFunction> {
    vec![
        date_diff(),
        date_add(),
        date_set(),
        date_get(),
        date_parse_str(),
        date_str(),
        NativeFunction::new("date_now", GROUP, "date_now()", Arity::exact(0), |_, _| {
            Ok(ExpressionEvaluator::instant(false, |_| Ok(Some(Utc::now()))))
        }),
        comparison("date_before", "date_before(a, b)", true),
        comparison("date_after", "date_after(a, b)", false),
        NativeFunction::new("date_millis", GROUP, "date_millis(date)", Arity::exact(1), |_, args| {
            check_params("date_millis", args, &[Param::Instant])?;
            Ok(value_node(ExpressionType::Integer, args, |v| {
                Ok(integer(v[0].as_instant().map(|t| t.timestamp_millis())))
            }))
        }),
        NativeFunction::new("date_parse", GROUP, "date_parse(millis)", Arity::exact(1), |_, args| {
            check_params("date_parse", args, &[Param::Numeric])?;
            Ok(value_node(ExpressionType::Instant, args, |v| {
                let millis = v[0].as_f64().unwrap_or(f64::NAN);
                if millis.is_nan() {
                    return Ok(Value::Instant(None));
                }
                if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
                    return Err(overflow("date_parse"));
                }
                let parsed = Utc
                    .timestamp_millis_opt(millis.trunc() as i64)
                    .single()
                    .ok_or_else(|| overflow("date_parse"))?;
                Ok(Value::Instant(Some(parsed)))
            }))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UTC: Tz = chrono_tz::UTC;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Instant {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_diff_counts_whole_units() {
        let a = at(2020, 1, 31, 12, 0, 0);
        assert_eq!(diff("t", a, at(2020, 2, 29, 11, 0, 0), DateUnit::Month, UTC).unwrap(), 0);
        assert_eq!(diff("t", a, at(2020, 3, 31, 12, 0, 0), DateUnit::Month, UTC).unwrap(), 2);
        assert_eq!(diff("t", a, at(2020, 2, 1, 11, 59, 59), DateUnit::Day, UTC).unwrap(), 0);
        assert_eq!(diff("t", a, at(2020, 2, 1, 12, 0, 0), DateUnit::Day, UTC).unwrap(), 1);
        assert_eq!(diff("t", at(2020, 2, 1, 12, 0, 0), a, DateUnit::Day, UTC).unwrap(), -1);
        assert_eq!(diff("t", a, at(2023, 1, 31, 12, 0, 0), DateUnit::Year, UTC).unwrap(), 3);
        assert_eq!(diff("t", a, at(2020, 2, 14, 12, 0, 0), DateUnit::Week, UTC).unwrap(), 2);
        assert_eq!(diff("t", a, a + TimeDelta::milliseconds(1500), DateUnit::Second, UTC).unwrap(), 1);
    }

    #[test]
    fn test_nanosecond_diff_overflow_faults() {
        let result = diff("t", DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC, DateUnit::Nanosecond, UTC);
        assert!(result.is_err());
    }

    #[test]
    fn test_day_diff_across_dst_uses_local_calendar() {
        let berlin = chrono_tz::Europe::Berlin;
        // 2021-03-27 12:00 CET to 2021-03-28 12:00 CEST is 23 hours but one day.
        let a = at(2021, 3, 27, 11, 0, 0);
        let b = at(2021, 3, 28, 10, 0, 0);
        assert_eq!(diff("t", a, b, DateUnit::Day, berlin).unwrap(), 1);
        assert_eq!(diff("t", a, b, DateUnit::Day, UTC).unwrap(), 0);
    }

    #[test]
    fn test_add() {
        let a = at(2020, 1, 31, 0, 0, 0);
        assert_eq!(add("t", a, 1.0, DateUnit::Month, UTC).unwrap(), Some(at(2020, 2, 29, 0, 0, 0)));
        assert_eq!(add("t", a, -1.9, DateUnit::Day, UTC).unwrap(), Some(at(2020, 1, 30, 0, 0, 0)));
        assert_eq!(add("t", a, 2.0, DateUnit::Week, UTC).unwrap(), Some(at(2020, 2, 14, 0, 0, 0)));
        assert_eq!(add("t", a, 1.0, DateUnit::Year, UTC).unwrap(), Some(at(2021, 1, 31, 0, 0, 0)));
        assert_eq!(add("t", a, f64::NAN, DateUnit::Hour, UTC).unwrap(), None);
        assert_eq!(add("t", a, f64::INFINITY, DateUnit::Hour, UTC).unwrap(), Some(DateTime::<Utc>::MAX_UTC));
        assert_eq!(add("t", a, f64::NEG_INFINITY, DateUnit::Year, UTC).unwrap(), Some(DateTime::<Utc>::MIN_UTC));
        assert!(add("t", a, 1e15, DateUnit::Year, UTC).is_err());
    }

    #[test]
    fn test_set_and_get() {
        let a = at(2020, 1, 31, 10, 20, 30);
        assert_eq!(set("t", a, 1.0, DateUnit::Month, UTC).unwrap(), at(2020, 2, 29, 10, 20, 30));
        assert_eq!(set("t", a, 2021.0, DateUnit::Year, UTC).unwrap(), at(2021, 1, 31, 10, 20, 30));
        assert_eq!(set("t", a, 5.0, DateUnit::Hour, UTC).unwrap(), at(2020, 1, 31, 5, 20, 30));
        assert!(set("t", a, 24.0, DateUnit::Hour, UTC).is_err());
        assert!(set("t", a, 12.0, DateUnit::Month, UTC).is_err());
        assert!(set("t", at(2020, 2, 1, 0, 0, 0), 30.0, DateUnit::Day, UTC).is_err());
        assert!(set("t", a, 1_000_000_000.0, DateUnit::Year, UTC).is_err());
        assert!(set("t", a, 999_999_999.0, DateUnit::Year, UTC).is_err());
        assert_eq!(get(a, DateUnit::Month, UTC), 0);
        assert_eq!(get(a, DateUnit::Day, UTC), 31);
        assert_eq!(get(a, DateUnit::Week, UTC), 5);
        assert_eq!(get(a, DateUnit::Hour, chrono_tz::Asia::Tokyo), 19);
    }
}
