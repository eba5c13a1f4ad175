//! Target-type coercion.
//!
//! Used by `eval(text, type)`, `attribute(name, type)` and by `if` when its
//! branches disagree. Coercion never faults on unparseable text: numeric
//! targets yield NaN, every other target yields its missing value. Only
//! targets that cannot be reached from a source type at all are faults.

use crate::errors::{ExpressionError, Result};
use crate::evaluator::ExpressionEvaluator;
use crate::stdlib::calendar::{parse_instant_default, parse_local_time_default};
use crate::types::ExpressionType;
use crate::values::{Instant, Value};
use chrono::TimeZone;
use chrono_tz::Tz;

/// Target types accepted by `eval` and `attribute`.
pub const CAST_TARGETS: [ExpressionType; 6] = [
    ExpressionType::Integer,
    ExpressionType::Double,
    ExpressionType::String,
    ExpressionType::Boolean,
    ExpressionType::Instant,
    ExpressionType::LocalTime,
];

/// Check whether values of `source` can be coerced to `target`.
pub fn is_cast_valid(source: ExpressionType, target: ExpressionType) -> bool {
    use ExpressionType::*;
    if source == target || target == String {
        return true;
    }
    match target {
        Integer | Double => matches!(source, Integer | Double | String | Boolean | Instant),
        Boolean => matches!(source, Integer | Double | String),
        Instant => matches!(source, Integer | Double | String),
        LocalTime => source == String,
        String | StringSet | StringList => false,
    }
}

pub fn validate_cast(function: &str, source: ExpressionType, target: ExpressionType) -> Result<()> {
    if is_cast_valid(source, target) {
        Ok(())
    } else {
        Err(ExpressionError::type_error(
            function,
            format!("cannot convert {source} to {target}"),
        ))
    }
}

fn numeric_from_text(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Half-up rounding used when a value becomes `Integer`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn instant_from_millis(millis: f64) -> Option<Instant> {
    if !millis.is_finite() {
        return None;
    }
    chrono::Utc.timestamp_millis_opt(millis.trunc() as i64).single()
}

/// Coerce `value` to `target`.
///
/// `zone` interprets zone-less date text.
pub fn cast_value(function: &str, value: Value, target: ExpressionType, zone: Tz) -> Result<Value> {
    validate_cast(function, value.ty(), target)?;
    if value.ty() == target {
        return Ok(value);
    }
    let cast = match target {
        ExpressionType::Integer | ExpressionType::Double => {
            let number = match &value {
                Value::Integer(v) | Value::Double(v) => *v,
                Value::String(Some(text)) => numeric_from_text(text),
                Value::Boolean(Some(b)) => f64::from(u8::from(*b)),
                Value::Instant(Some(t)) => t.timestamp_millis() as f64,
                _ => f64::NAN,
            };
            if target == ExpressionType::Integer {
                Value::Integer(round_half_up(number))
            } else {
                Value::Double(number)
            }
        }
        ExpressionType::String => Value::String(value.to_text()),
        ExpressionType::Boolean => Value::Boolean(match &value {
            Value::Integer(v) | Value::Double(v) if !v.is_nan() => Some(*v != 0.0),
            Value::String(Some(text)) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }),
        ExpressionType::Instant => Value::Instant(match &value {
            Value::Integer(v) | Value::Double(v) => instant_from_millis(*v),
            Value::String(Some(text)) => parse_instant_default(text, zone),
            _ => None,
        }),
        ExpressionType::LocalTime => Value::LocalTime(match &value {
            Value::String(Some(text)) => parse_local_time_default(text),
            _ => None,
        }),
        ExpressionType::StringSet | ExpressionType::StringList => Value::missing(target),
    };
    Ok(cast)
}

/// Wrap `node` so that it produces values of type `target`.
pub fn cast_node(
    function: &str,
    node: ExpressionEvaluator,
    target: ExpressionType,
    zone: Tz,
) -> Result<ExpressionEvaluator> {
    validate_cast(function, node.ty(), target)?;
    if node.ty() == target {
        return Ok(node);
    }
    let function = function.to_string();
    let constant = node.is_constant();
    ExpressionEvaluator::from_values(target, constant, move |s| {
        cast_value(&function, node.value(s)?, target, zone)
    })
    .fold()
}
