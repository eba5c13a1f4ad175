//! Math Package
//!
//! Functions: sqrt, exp, ln, log, ld, signum, abs, floor, ceil, round, rint,
//!            sin, cos, tan, cot, sec, cosec, asin, acos, atan, atan2,
//!            sinh, cosh, tanh, asinh, acosh, atanh,
//!            min, max, avg, sum, binom,
//!            bit_or, bit_and, bit_xor, bit_not
//!
//! Missing input (NaN) propagates to a missing result everywhere.

use super::{
    Arity, NativeFunction, Param, all_constant, check_params, numeric_join, numeric_node,
    whole_number,
};
use crate::api::Context;
use crate::errors::{ExpressionError, Result};
use crate::evaluator::ExpressionEvaluator;
use crate::types::ExpressionType;
use std::rc::Rc;

const GROUP: &str = "math";

/// Result type of a one-argument function.
#[derive(Copy, Clone)]
enum Output {
    Double,
    Integer,
    SameAsInput,
}

fn unary(name: &'static str, signature: &'static str, output: Output, f: fn(f64) -> f64) -> NativeFunction {
    NativeFunction::new(name, GROUP, signature, Arity::exact(1), move |_, args| {
        check_params(name, args, &[Param::Numeric])?;
        let ty = match output {
            Output::Double => ExpressionType::Double,
            Output::Integer => ExpressionType::Integer,
            Output::SameAsInput => args[0].ty(),
        };
        Ok(numeric_node(ty, args, move |v| Ok(f(v[0]))))
    })
}

// ============================================================================
// Rounding
// ============================================================================

/// Half-up rounding to `digits` decimals; negative digits round to tens,
/// hundreds and so on.
pub fn round_to(value: f64, digits: i64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits.clamp(-400, 400) as i32);
    if factor == 0.0 {
        return 0.0;
    }
    let scaled = value * factor;
    // More digits than a double carries.
    if !factor.is_finite() || !scaled.is_finite() {
        return value;
    }
    (scaled + 0.5).floor() / factor
}

fn round(_: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
    check_params("round", args, &[Param::Numeric])?;
    let ty = if args.len() == 1 || args[0].ty() == ExpressionType::Integer {
        ExpressionType::Integer
    } else {
        ExpressionType::Double
    };
    Ok(numeric_node(ty, args, |v| {
        let digits = match v.get(1) {
            None => 0,
            Some(d) if d.is_nan() => return Ok(f64::NAN),
            Some(d) => whole_number("round", "number of digits", *d)?,
        };
        Ok(round_to(v[0], digits))
    }))
}

/// Round half to even.
fn rint(value: f64) -> f64 {
    let rounded = value.round();
    if (value - value.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - value.signum()
    } else {
        rounded
    }
}

fn signum(value: f64) -> f64 {
    if value.is_nan() || value == 0.0 {
        value.abs()
    } else {
        value.signum()
    }
}

// ============================================================================
// Aggregations
// ============================================================================

/// Variadic numeric aggregation; polls for cancellation between arguments.
fn aggregate(
    ctx: &Rc<Context>,
    args: &[ExpressionEvaluator],
    ty: ExpressionType,
    combine: fn(&[f64]) -> f64,
) -> ExpressionEvaluator {
    let ctx = ctx.clone();
    let constant = all_constant(args);
    let args = args.to_vec();
    ExpressionEvaluator::numeric(ty, constant, move |s| {
        let mut values = Vec::with_capacity(args.len());
        for arg in &args {
            ctx.check_cancelled()?;
            values.push(arg.numeric_value(s)?);
        }
        Ok(combine(&values))
    })
}

fn nan_aware(values: &[f64], pick: fn(f64, f64) -> f64) -> f64 {
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    values.iter().copied().reduce(pick).unwrap_or(f64::NAN)
}

fn aggregation(
    name: &'static str,
    signature: &'static str,
    output: Output,
    combine: fn(&[f64]) -> f64,
) -> NativeFunction {
    NativeFunction::new(name, GROUP, signature, Arity::at_least(1), move |ctx, args| {
        check_params(name, args, &[Param::Numeric])?;
        let ty = match output {
            Output::Double => ExpressionType::Double,
            _ => numeric_join(args),
        };
        Ok(aggregate(ctx, args, ty, combine))
    })
}

/// Iterations of `binomial` between cancellation polls.
const BINOMIAL_POLL_INTERVAL: i64 = 4096;

fn binomial(ctx: &Context, n: f64, k: f64) -> Result<f64> {
    if n.is_nan() || k.is_nan() {
        return Ok(f64::NAN);
    }
    let n = whole_number("binom", "n", n)?;
    let k = whole_number("binom", "k", k)?;
    if n < 0 || k < 0 {
        return Err(ExpressionError::value_error(
            "binom",
            format!("arguments must not be negative, were {n} and {k}"),
        ));
    }
    if k > n {
        return Ok(0.0);
    }
    let k = k.min(n - k);
    let mut result = 1.0f64;
    for i in 0..k {
        if i % BINOMIAL_POLL_INTERVAL == 0 {
            ctx.check_cancelled()?;
        }
        result = result * (n - i) as f64 / (i + 1) as f64;
        if result.is_infinite() {
            break;
        }
    }
    Ok(result.round())
}

// ============================================================================
// Bit operations
// ============================================================================

fn bit_operation(name: &'static str, signature: &'static str, op: fn(i64, i64) -> i64) -> NativeFunction {
    NativeFunction::new(name, GROUP, signature, Arity::exact(2), move |_, args| {
        check_params(name, args, &[Param::Numeric])?;
        Ok(numeric_node(ExpressionType::Integer, args, move |v| {
            if v[0].is_nan() || v[1].is_nan() {
                return Ok(f64::NAN);
            }
            let a = whole_number(name, "argument 1", v[0])?;
            let b = whole_number(name, "argument 2", v[1])?;
            Ok(op(a, b) as f64)
        }))
    })
}

pub fn functions() -> Vec<NativeFunction> {
    vec![
        unary("sqrt", "sqrt(x)", Output::Double, f64::sqrt),
        unary("exp", "exp(x)", Output::Double, f64::exp),
        unary("ln", "ln(x)", Output::Double, f64::ln),
        unary("log", "log(x)", Output::Double, f64::log10),
        unary("ld", "ld(x)", Output::Double, f64::log2),
        unary("signum", "signum(x)", Output::Integer, signum),
        unary("abs", "abs(x)", Output::SameAsInput, f64::abs),
        unary("floor", "floor(x)", Output::Integer, f64::floor),
        unary("ceil", "ceil(x)", Output::Integer, f64::ceil),
        unary("rint", "rint(x)", Output::Integer, rint),
        NativeFunction::new("round", GROUP, "round(x[, digits])", Arity::range(1, 2), round),
        unary("sin", "sin(x)", Output::Double, f64::sin),
        unary("cos", "cos(x)", Output::Double, f64::cos),
        unary("tan", "tan(x)", Output::Double, f64::tan),
        unary("cot", "cot(x)", Output::Double, |x| 1.0 / x.tan()),
        unary("sec", "sec(x)", Output::Double, |x| 1.0 / x.cos()),
        unary("cosec", "cosec(x)", Output::Double, |x| 1.0 / x.sin()),
        unary("asin", "asin(x)", Output::Double, f64::asin),
        unary("acos", "acos(x)", Output::Double, f64::acos),
        unary("atan", "atan(x)", Output::Double, f64::atan),
        NativeFunction::new("atan2", GROUP, "atan2(y, x)", Arity::exact(2), |_, args| {
            check_params("atan2", args, &[Param::Numeric])?;
            Ok(numeric_node(ExpressionType::Double, args, |v| Ok(v[0].atan2(v[1]))))
        }),
        unary("sinh", "sinh(x)", Output::Double, f64::sinh),
        unary("cosh", "cosh(x)", Output::Double, f64::cosh),
        unary("tanh", "tanh(x)", Output::Double, f64::tanh),
        unary("asinh", "asinh(x)", Output::Double, f64::asinh),
        unary("acosh", "acosh(x)", Output::Double, f64::acosh),
        unary("atanh", "atanh(x)", Output::Double, f64::atanh),
        aggregation("min", "min(x, ...)", Output::SameAsInput, |v| nan_aware(v, f64::min)),
        aggregation("max", "max(x, ...)", Output::SameAsInput, |v| nan_aware(v, f64::max)),
        aggregation("sum", "sum(x, ...)", Output::SameAsInput, |v| v.iter().sum()),
        aggregation("avg", "avg(x, ...)", Output::Double, |v| {
            v.iter().sum::<f64>() / v.len() as f64
        }),
        NativeFunction::new("binom", GROUP, "binom(n, k)", Arity::exact(2), |ctx, args| {
            check_params("binom", args, &[Param::Numeric])?;
            let ctx = ctx.clone();
            Ok(numeric_node(ExpressionType::Integer, args, move |v| binomial(&ctx, v[0], v[1])))
        }),
        bit_operation("bit_or", "bit_or(a, b)", |a, b| a | b),
        bit_operation("bit_and", "bit_and(a, b)", |a, b| a & b),
        bit_operation("bit_xor", "bit_xor(a, b)", |a, b| a ^ b),
        NativeFunction::new("bit_not", GROUP, "bit_not(a)", Arity::exact(1), |_, args| {
            check_params("bit_not", args, &[Param::Numeric])?;
            Ok(numeric_node(ExpressionType::Integer, args, |v| {
                if v[0].is_nan() {
                    return Ok(f64::NAN);
                }
                Ok(!whole_number("bit_not", "argument", v[0])? as f64)
            }))
        }),
    ]
}
