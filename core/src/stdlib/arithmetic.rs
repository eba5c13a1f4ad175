//! Arithmetic operators.
//!
//! `Integer op Integer` stays `Integer` for `+ - * %`, and for `^` when the
//! exponent is a non-negative constant. Division is always `Double`. `+`
//! with a string operand concatenates canonical text instead.

use super::{Arity, NativeFunction, Param, check_params, constant_value, numeric_join, numeric_node, value_node};
use crate::api::Context;
use crate::errors::Result;
use crate::evaluator::ExpressionEvaluator;
use crate::types::ExpressionType;
use crate::values::Value;
use std::rc::Rc;

const GROUP: &str = "arithmetic";

pub fn functions() -> Vec<NativeFunction> {
    vec![
        NativeFunction::new("+", GROUP, "a + b", Arity::range(1, 2), plus),
        NativeFunction::new("-", GROUP, "a - b", Arity::range(1, 2), minus),
        NativeFunction::new("*", GROUP, "a * b", Arity::exact(2), |_, args| {
            binary("*", args, |a, b| a * b)
        }),
        NativeFunction::new("/", GROUP, "a / b", Arity::exact(2), |_, args| {
            check_params("/", args, &[Param::Numeric])?;
            Ok(numeric_node(ExpressionType::Double, args, |v| Ok(v[0] / v[1])))
        }),
        NativeFunction::new("%", GROUP, "a % b", Arity::exact(2), |_, args| {
            binary("%", args, |a, b| a % b)
        }),
        NativeFunction::new("^", GROUP, "a ^ b", Arity::exact(2), power),
    ]
}

fn binary(name: &str, args: &[ExpressionEvaluator], op: fn(f64, f64) -> f64) -> Result<ExpressionEvaluator> {
    check_params(name, args, &[Param::Numeric])?;
    Ok(numeric_node(numeric_join(args), args, move |v| Ok(op(v[0], v[1]))))
}

fn plus(_: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
    if let [operand] = args {
        check_params("+", args, &[Param::Numeric])?;
        return Ok(operand.clone());
    }
    if args.iter().any(|a| a.ty() == ExpressionType::String) {
        return Ok(concatenation(args));
    }
    binary("+", args, |a, b| a + b)
}

/// Text concatenation; a missing side contributes nothing, two missing
/// sides give a missing result.
fn concatenation(args: &[ExpressionEvaluator]) -> ExpressionEvaluator {
    value_node(ExpressionType::String, args, |v| {
        Ok(Value::String(match (v[0].to_text(), v[1].to_text()) {
            (None, None) => None,
            (left, right) => Some(left.unwrap_or_default() + &right.unwrap_or_default()),
        }))
    })
}

fn minus(_: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
    if let [operand] = args {
        check_params("-", args, &[Param::Numeric])?;
        return Ok(numeric_node(operand.ty(), args, |v| Ok(-v[0])));
    }
    binary("-", args, |a, b| a - b)
}

fn power(_: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
    check_params("^", args, &[Param::Numeric])?;
    let exponent = constant_value(&args[1])?.and_then(|v| v.as_f64());
    let integral = numeric_join(args) == ExpressionType::Integer
        && exponent.is_some_and(|e| e >= 0.0);
    let ty = if integral {
        ExpressionType::Integer
    } else {
        ExpressionType::Double
    };
    Ok(numeric_node(ty, args, |v| Ok(v[0].powf(v[1]))))
}
