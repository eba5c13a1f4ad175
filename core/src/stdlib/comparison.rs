//! Ordering and equality operators.

use super::{Arity, NativeFunction, all_constant, constant_value, value_node};
use crate::errors::ExpressionError;
use crate::evaluator::ExpressionEvaluator;
use crate::types::ExpressionType;
use crate::values::Value;
use core::cmp::Ordering;

const GROUP: &str = "comparison";

pub fn functions() -> Vec<NativeFunction> {
    vec![
        ordering("<", "a < b", Ordering::is_lt),
        ordering("<=", "a <= b", Ordering::is_le),
        ordering(">", "a > b", Ordering::is_gt),
        ordering(">=", "a >= b", Ordering::is_ge),
        equality("==", "a == b", false),
        equality("!=", "a != b", true),
    ]
}

fn comparable(a: ExpressionType, b: ExpressionType) -> bool {
    (a.is_numeric() && b.is_numeric()) || (a == ExpressionType::String && b == ExpressionType::String)
}

/// `< <= > >=` over numbers or text.
///
/// Missing operands compare false, except that a constant missing value on
/// the left is rejected at parse time.
fn ordering(name: &'static str, signature: &'static str, accept: fn(Ordering) -> bool) -> NativeFunction {
    NativeFunction::new(name, GROUP, signature, Arity::exact(2), move |_, args| {
        let (left, right) = (&args[0], &args[1]);
        if !comparable(left.ty(), right.ty()) {
            let err = ExpressionError::type_error(
                name,
                format!("cannot compare {} with {}", left.ty(), right.ty()),
            );
            if all_constant(args) {
                return Err(err);
            }
            return Ok(ExpressionEvaluator::boolean(false, move |_| Err(err.clone())));
        }
        if constant_value(left)?.is_some_and(|v| v.is_missing()) {
            return Err(ExpressionError::value_error(
                name,
                "left operand is a constant missing value",
            ));
        }
        if constant_value(right)?.is_some_and(|v| v.is_missing()) {
            return Ok(ExpressionEvaluator::constant(Value::Boolean(Some(false))));
        }
        Ok(value_node(ExpressionType::Boolean, args, move |v| {
            if v[0].is_missing() || v[1].is_missing() {
                return Ok(Value::Boolean(Some(false)));
            }
            let order = match (&v[0], &v[1]) {
                (Value::String(Some(a)), Value::String(Some(b))) => Some(a.cmp(b)),
                (a, b) => a
                    .as_f64()
                    .zip(b.as_f64())
                    .and_then(|(a, b)| a.partial_cmp(&b)),
            };
            Ok(Value::Boolean(Some(order.is_some_and(accept))))
        }))
    })
}

fn equality(name: &'static str, signature: &'static str, negate: bool) -> NativeFunction {
    NativeFunction::new(name, GROUP, signature, Arity::exact(2), move |_, args| {
        Ok(value_node(ExpressionType::Boolean, args, move |v| {
            Ok(Value::Boolean(Some(values_equal(&v[0], &v[1]) != negate)))
        }))
    })
}

fn same_storage(a: ExpressionType, b: ExpressionType) -> bool {
    a == b || (a.is_numeric() && b.is_numeric())
}

/// Equality across types. Never fails.
///
/// - missing equals missing of the same type (`Integer` and `Double` count
///   as one); missing never equals a present value
/// - numbers compare numerically; booleans compare with numbers as 1 / 0
///   and with text case-insensitively as `true` / `false`
/// - other mixed pairs compare their canonical text
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => return same_storage(a.ty(), b.ty()),
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x == y;
    }
    match (a, b) {
        (Value::Boolean(Some(flag)), other) | (other, Value::Boolean(Some(flag))) => match other {
            Value::Integer(n) | Value::Double(n) => *n == if *flag { 1.0 } else { 0.0 },
            Value::String(Some(text)) => text.eq_ignore_ascii_case(if *flag { "true" } else { "false" }),
            Value::Boolean(Some(other_flag)) => flag == other_flag,
            _ => a.to_text() == b.to_text(),
        },
        _ if a.ty() == b.ty() => a == b,
        _ => a.to_text() == b.to_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_missing_equality() {
        let nan = Value::Double(f64::NAN);
        assert!(values_equal(&nan, &Value::Integer(f64::NAN)));
        assert!(!values_equal(&nan, &Value::String(None)));
        assert!(!values_equal(&nan, &Value::Double(1.0)));
        assert!(values_equal(&Value::Instant(None), &Value::Instant(None)));
    }

    #[test]
    fn test_mixed_types() {
        assert!(values_equal(&Value::Boolean(Some(true)), &Value::Integer(1.0)));
        assert!(values_equal(&Value::string("TRUE"), &Value::Boolean(Some(true))));
        assert!(values_equal(&Value::Integer(3.0), &Value::string("3")));
        assert!(values_equal(&Value::Double(3.0), &Value::string("3.000")));
        assert!(!values_equal(&Value::Double(3.0), &Value::string("3")));
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(values_equal(&Value::Instant(Some(t)), &Value::string("2020-01-01T00:00:00Z")));
    }

    #[test]
    fn test_equality_is_symmetric() {
        let values = [
            Value::Integer(1.0),
            Value::Double(1.0),
            Value::Double(f64::NAN),
            Value::string("1"),
            Value::string("true"),
            Value::String(None),
            Value::Boolean(Some(true)),
            Value::Boolean(None),
        ];
        for a in &values {
            for b in &values {
                assert_eq!(values_equal(a, b), values_equal(b, a), "{a:?} vs {b:?}");
            }
        }
    }
}
