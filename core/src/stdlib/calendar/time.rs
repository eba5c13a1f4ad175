//! Time-of-day functions: `time_diff`, `time_add`, `time_set`, `time_get`,
//! `time_parse_str`, `time_str`.
//!
//! Times of day have no zone and no date, so WEEK, MONTH and YEAR are
//! rejected. DAY is accepted by `time_diff` and `time_add` only.

use super::GROUP;
use super::format::{format_time_with, parse_local_time_default, parse_locale, parse_time_with, unparseable, validate_pattern};
use super::instant::{check_constant_field, field_range, field_value};
use super::units::{DateUnit, check_constant, parse_unit, text_at, time_unit};
use crate::errors::Result;
use crate::stdlib::{Arity, NativeFunction, Param, check_params, value_node};
use crate::types::ExpressionType;
use crate::values::{LocalTime, Value, display};
use chrono::{NaiveTime, TimeDelta, Timelike};

const NANOS_PER_DAY: i128 = 86_400_000_000_000;

fn unit_of(function: &str, text: &str, allow_day: bool) -> Result<DateUnit> {
    time_unit(function, parse_unit(function, text)?, allow_day)
}

/// Signed number of whole `unit`s from `a` to `b`.
pub fn diff(a: LocalTime, b: LocalTime, unit: DateUnit) -> i64 {
    let nanos = i128::from(b.signed_duration_since(a).num_nanoseconds().unwrap_or(0));
    let per_unit = unit.nanos().unwrap_or(NANOS_PER_DAY);
    (nanos / per_unit) as i64
}

/// Adds `amount` (truncated) units, wrapping around midnight; NaN gives
/// `None`, infinities saturate to the first or last instant of the day.
pub fn add(value: LocalTime, amount: f64, unit: DateUnit) -> Option<LocalTime> {
    if amount.is_nan() {
        return None;
    }
    if amount.is_infinite() {
        return Some(if amount > 0.0 {
            NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)?
        } else {
            NaiveTime::MIN
        });
    }
    let per_unit = unit.nanos().unwrap_or(NANOS_PER_DAY);
    let steps = (amount.trunc() as i128).rem_euclid(NANOS_PER_DAY / per_unit);
    let offset = TimeDelta::nanoseconds((steps * per_unit) as i64);
    Some(value.overflowing_add_signed(offset).0)
}

pub fn set(function: &str, value: LocalTime, field: f64, unit: DateUnit) -> Result<LocalTime> {
    let (min, max) = field_range(unit);
    let field = field_value(function, unit, field, min, max)? as u32;
    let updated = match unit {
        DateUnit::Nanosecond => value.with_nanosecond(field),
        DateUnit::Millisecond => value.with_nanosecond(field * 1_000_000 + value.nanosecond() % 1_000_000),
        DateUnit::Second => value.with_second(field),
        DateUnit::Minute => value.with_minute(field),
        _ => value.with_hour(field),
    };
    // Every field was range-checked, so the update cannot fail.
    Ok(updated.unwrap_or(value))
}

pub fn get(value: LocalTime, unit: DateUnit) -> i64 {
    i64::from(match unit {
        DateUnit::Nanosecond => value.nanosecond() % 1_000_000_000,
        DateUnit::Millisecond => value.nanosecond() % 1_000_000_000 / 1_000_000,
        DateUnit::Second => value.second(),
        DateUnit::Minute => value.minute(),
        _ => value.hour(),
    })
}

fn integer(value: Option<i64>) -> Value {
    Value::Integer(value.map_or(f64::NAN, |v| v as f64))
}

pub fn functions() -> Vec<NativeFunction> {
    vec![
        NativeFunction::new("time_diff", GROUP, "time_diff(from, to, unit)", Arity::exact(3), |_, args| {
            check_params("time_diff", args, &[Param::LocalTime, Param::LocalTime, Param::Text])?;
            check_constant(args.get(2), |t| unit_of("time_diff", t, true))?;
            Ok(value_node(ExpressionType::Integer, args, |v| {
                let (Some(a), Some(b), Some(unit)) = (v[0].as_local_time(), v[1].as_local_time(), v[2].as_str()) else {
                    return Ok(integer(None));
                };
                Ok(integer(Some(diff(a, b, unit_of("time_diff", unit, true)?))))
            }))
        }),
        NativeFunction::new("time_add", GROUP, "time_add(time, amount, unit)", Arity::exact(3), |_, args| {
            check_params("time_add", args, &[Param::LocalTime, Param::Numeric, Param::Text])?;
            check_constant(args.get(2), |t| unit_of("time_add", t, true))?;
            Ok(value_node(ExpressionType::LocalTime, args, |v| {
                let (Some(a), Some(amount), Some(unit)) = (v[0].as_local_time(), v[1].as_f64(), v[2].as_str()) else {
                    return Ok(Value::LocalTime(None));
                };
                Ok(Value::LocalTime(add(a, amount, unit_of("time_add", unit, true)?)))
            }))
        }),
        NativeFunction::new("time_set", GROUP, "time_set(time, value, unit)", Arity::exact(3), |_, args| {
            check_params("time_set", args, &[Param::LocalTime, Param::Numeric, Param::Text])?;
            check_constant(args.get(2), |t| unit_of("time_set", t, false))?;
            check_constant_field("time_set", args.get(1), args.get(2), |t| unit_of("time_set", t, false))?;
            Ok(value_node(ExpressionType::LocalTime, args, |v| {
                let (Some(a), Some(field), Some(unit)) = (v[0].as_local_time(), v[1].as_f64(), v[2].as_str()) else {
                    return Ok(Value::LocalTime(None));
                };
                if field.is_nan() {
                    return Ok(Value::LocalTime(None));
                }
                let unit = unit_of("time_set", unit, false)?;
                set("time_set", a, field, unit).map(|t| Value::LocalTime(Some(t)))
            }))
        }),
        NativeFunction::new("time_get", GROUP, "time_get(time, unit)", Arity::exact(2), |_, args| {
            check_params("time_get", args, &[Param::LocalTime, Param::Text])?;
            check_constant(args.get(1), |t| unit_of("time_get", t, false))?;
            Ok(value_node(ExpressionType::Integer, args, |v| {
                let (Some(a), Some(unit)) = (v[0].as_local_time(), v[1].as_str()) else {
                    return Ok(integer(None));
                };
                Ok(integer(Some(get(a, unit_of("time_get", unit, false)?))))
            }))
        }),
        NativeFunction::new(
            "time_parse_str",
            GROUP,
            "time_parse_str(text[, pattern[, locale]])",
            Arity::range(1, 3),
            |_, args| {
                check_params("time_parse_str", args, &[Param::Text])?;
                check_constant(args.get(1), |t| validate_pattern("time_parse_str", t))?;
                check_constant(args.get(2), |t| parse_locale("time_parse_str", t))?;
                Ok(value_node(ExpressionType::LocalTime, args, |v| {
                    let Some(text) = v[0].as_str() else {
                        return Ok(Value::LocalTime(None));
                    };
                    if let Some(locale) = text_at(v, 2) {
                        parse_locale("time_parse_str", locale)?;
                    }
                    let parsed = match text_at(v, 1) {
                        Some(pattern) => parse_time_with("time_parse_str", text, pattern)?,
                        None => parse_local_time_default(text)
                            .ok_or_else(|| unparseable("time_parse_str", text, None))?,
                    };
                    Ok(Value::LocalTime(Some(parsed)))
                }))
            },
        ),
        NativeFunction::new(
            "time_str",
            GROUP,
            "time_str(time[, pattern[, locale]])",
            Arity::range(1, 3),
            |_, args| {
                check_params("time_str", args, &[Param::LocalTime, Param::Text])?;
                check_constant(args.get(1), |t| validate_pattern("time_str", t))?;
                check_constant(args.get(2), |t| parse_locale("time_str", t))?;
                Ok(value_node(ExpressionType::String, args, |v| {
                    let Some(value) = v[0].as_local_time() else {
                        return Ok(Value::String(None));
                    };
                    let locale = text_at(v, 2)
                        .map(|name| parse_locale("time_str", name))
                        .transpose()?;
                    let text = match text_at(v, 1) {
                        Some(pattern) => format_time_with("time_str", value, pattern, locale)?,
                        None => display::format_local_time(&value),
                    };
                    Ok(Value::string(text))
                }))
            },
        ),
    ]
}
