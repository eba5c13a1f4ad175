//! The `Value` sum type: one variant per type tag.
//!
//! Numeric variants encode "missing" as NaN. All other variants use `None`.

use super::display;
use crate::types::ExpressionType;
use std::collections::BTreeSet;

pub type Instant = chrono::DateTime<chrono::Utc>;
pub type LocalTime = chrono::NaiveTime;
pub type StringSet = BTreeSet<String>;
pub type StringList = Vec<String>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(f64),
    Double(f64),
    String(Option<String>),
    Boolean(Option<bool>),
    Instant(Option<Instant>),
    LocalTime(Option<LocalTime>),
    StringSet(Option<StringSet>),
    StringList(Option<StringList>),
}

impl Value {
    /// The missing value of the given type.
    pub fn missing(ty: ExpressionType) -> Value {
        match ty {
            ExpressionType::Integer => Value::Integer(f64::NAN),
            ExpressionType::Double => Value::Double(f64::NAN),
            ExpressionType::String => Value::String(None),
            ExpressionType::Boolean => Value::Boolean(None),
            ExpressionType::Instant => Value::Instant(None),
            ExpressionType::LocalTime => Value::LocalTime(None),
            ExpressionType::StringSet => Value::StringSet(None),
            ExpressionType::StringList => Value::StringList(None),
        }
    }

    /// Builds a numeric value of the given numeric tag.
    ///
    /// Non-numeric tags fall back to `Double`.
    pub fn numeric(ty: ExpressionType, value: f64) -> Value {
        match ty {
            ExpressionType::Integer => Value::Integer(value),
            _ => Value::Double(value),
        }
    }

    pub fn string(value: impl Into<String>) -> Value {
        Value::String(Some(value.into()))
    }

    pub fn ty(&self) -> ExpressionType {
        match self {
            Value::Integer(_) => ExpressionType::Integer,
            Value::Double(_) => ExpressionType::Double,
            Value::String(_) => ExpressionType::String,
            Value::Boolean(_) => ExpressionType::Boolean,
            Value::Instant(_) => ExpressionType::Instant,
            Value::LocalTime(_) => ExpressionType::LocalTime,
            Value::StringSet(_) => ExpressionType::StringSet,
            Value::StringList(_) => ExpressionType::StringList,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Value::Integer(v) | Value::Double(v) => v.is_nan(),
            Value::String(v) => v.is_none(),
            Value::Boolean(v) => v.is_none(),
            Value::Instant(v) => v.is_none(),
            Value::LocalTime(v) => v.is_none(),
            Value::StringSet(v) => v.is_none(),
            Value::StringList(v) => v.is_none(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) | Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(Some(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => *v,
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<Instant> {
        match self {
            Value::Instant(v) => *v,
            _ => None,
        }
    }

    pub fn as_local_time(&self) -> Option<LocalTime> {
        match self {
            Value::LocalTime(v) => *v,
            _ => None,
        }
    }

    /// Canonical text of the value, or `None` if it is missing.
    ///
    /// This is the representation used by string concatenation, `str()` and
    /// cross-type equality.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Integer(v) => display::format_integer(*v),
            Value::Double(v) => display::format_double(*v),
            Value::String(v) => v.clone(),
            Value::Boolean(v) => v.map(|b| b.to_string()),
            Value::Instant(v) => v.as_ref().map(display::format_instant),
            Value::LocalTime(v) => v.as_ref().map(display::format_local_time),
            Value::StringSet(v) => v.as_ref().map(|set| display::format_items(set.iter())),
            Value::StringList(v) => v.as_ref().map(|list| display::format_items(list.iter())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_for_every_type() {
        for ty in ExpressionType::ALL {
            let value = Value::missing(ty);
            assert!(value.is_missing(), "{ty} missing value not detected");
            assert_eq!(value.ty(), ty);
            assert_eq!(value.to_text(), None);
        }
    }

    #[test]
    fn test_numeric_constructor() {
        assert_eq!(Value::numeric(ExpressionType::Integer, 3.0), Value::Integer(3.0));
        assert_eq!(Value::numeric(ExpressionType::Double, 3.0), Value::Double(3.0));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Double(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::string("a").as_str(), Some("a"));
        assert_eq!(Value::Boolean(Some(true)).as_bool(), Some(true));
        assert_eq!(Value::string("a").as_f64(), None);
    }
}
