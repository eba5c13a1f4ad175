//! Logical operators.
//!
//! Operands are booleans or numbers (non-zero is true). A missing operand,
//! NaN included, makes the result missing. Both operands are always
//! evaluated.

use super::{Arity, NativeFunction, Param, check_params, value_node};
use crate::types::ExpressionType;
use crate::values::Value;

const GROUP: &str = "logical";

pub fn functions() -> Vec<NativeFunction> {
    vec![
        NativeFunction::new("&&", GROUP, "a && b", Arity::exact(2), |_, args| {
            check_params("&&", args, &[Param::Logical])?;
            Ok(value_node(ExpressionType::Boolean, args, |v| {
                Ok(Value::Boolean(truth(&v[0]).zip(truth(&v[1])).map(|(a, b)| a && b)))
            }))
        }),
        NativeFunction::new("||", GROUP, "a || b", Arity::exact(2), |_, args| {
            check_params("||", args, &[Param::Logical])?;
            Ok(value_node(ExpressionType::Boolean, args, |v| {
                Ok(Value::Boolean(truth(&v[0]).zip(truth(&v[1])).map(|(a, b)| a || b)))
            }))
        }),
        NativeFunction::new("!", GROUP, "!a", Arity::exact(1), |_, args| {
            check_params("!", args, &[Param::Logical])?;
            Ok(value_node(ExpressionType::Boolean, args, |v| {
                Ok(Value::Boolean(truth(&v[0]).map(|a| !a)))
            }))
        }),
    ]
}

/// Truth value of a logical operand; `None` when missing.
pub fn truth(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => *b,
        Value::Integer(n) | Value::Double(n) if !n.is_nan() => Some(*n != 0.0),
        _ => None,
    }
}
