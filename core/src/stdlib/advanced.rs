//! Control flow and runtime lookups: `if`, `missing`, `eval`, `attribute`,
//! `macro`.

use super::logical::truth;
use super::{Arity, NativeFunction, Param, check_params, constant_value, value_node};
use crate::api::Context;
use crate::casting::{CAST_TARGETS, cast_node, cast_value};
use crate::errors::{ExpressionError, Result};
use crate::evaluator::ExpressionEvaluator;
use crate::types::ExpressionType;
use crate::values::Value;
use std::rc::Rc;

const GROUP: &str = "advanced";

pub fn functions() -> Vec<NativeFunction> {
    vec![
        NativeFunction::new("if", GROUP, "if(condition, then, else)", Arity::exact(3), if_else),
        NativeFunction::new("missing", GROUP, "missing(value)", Arity::exact(1), |_, args| {
            Ok(value_node(ExpressionType::Boolean, args, |v| {
                Ok(Value::Boolean(Some(v[0].is_missing())))
            }))
        }),
        NativeFunction::new("eval", GROUP, "eval(expression[, type])", Arity::range(1, 2), eval),
        NativeFunction::new("attribute", GROUP, "attribute(name[, type])", Arity::range(1, 2), attribute),
        NativeFunction::new("macro", GROUP, "macro(name[, default])", Arity::range(1, 2), macro_value),
    ]
}

// ============================================================================
// if
// ============================================================================

/// Common type of two branches: equal types stay, numeric pairs join,
/// anything else meets in `String`.
fn branch_type(a: ExpressionType, b: ExpressionType) -> ExpressionType {
    if a == b {
        a
    } else if a.is_numeric() && b.is_numeric() {
        a.numeric_join(b)
    } else {
        ExpressionType::String
    }
}

/// Only the selected branch is evaluated.
fn if_else(ctx: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
    check_params("if", args, &[Param::Logical, Param::Any])?;
    let zone = ctx.options().default_time_zone;
    let ty = branch_type(args[1].ty(), args[2].ty());
    let then = cast_node("if", args[1].clone(), ty, zone)?;
    let otherwise = cast_node("if", args[2].clone(), ty, zone)?;

    if let Some(condition) = constant_value(&args[0])? {
        return Ok(match truth(&condition) {
            Some(true) => then,
            Some(false) => otherwise,
            None => ExpressionEvaluator::constant(Value::missing(ty)),
        });
    }
    let condition = args[0].clone();
    Ok(ExpressionEvaluator::from_values(ty, false, move |s| {
        match truth(&condition.value(s)?) {
            Some(true) => then.value(s),
            Some(false) => otherwise.value(s),
            None => Ok(Value::missing(ty)),
        }
    }))
}

// ============================================================================
// Shared argument handling
// ============================================================================

/// The optional constant type-name argument of `eval` and `attribute`.
fn target_type(function: &str, arg: Option<&ExpressionEvaluator>) -> Result<Option<ExpressionType>> {
    let Some(arg) = arg else {
        return Ok(None);
    };
    let Some(value) = constant_value(arg)? else {
        return Err(ExpressionError::type_error(
            function,
            "the type argument must be a constant such as TYPE_DOUBLE",
        ));
    };
    let Some(name) = value.as_str() else {
        return Err(ExpressionError::value_error(function, "the type argument is missing"));
    };
    let ty = name
        .parse::<ExpressionType>()
        .map_err(|e| ExpressionError::value_error(function, e.to_string()))?;
    if !CAST_TARGETS.contains(&ty) {
        return Err(ExpressionError::value_error(
            function,
            format!("cannot convert to {ty}"),
        ));
    }
    Ok(Some(ty))
}

/// Evaluates `node`, reporting its faults as faults of the nested expression.
fn nested(node: ExpressionEvaluator) -> ExpressionEvaluator {
    let constant = node.is_constant();
    let ty = node.ty();
    ExpressionEvaluator::from_values(ty, constant, move |s| {
        node.value(s).map_err(|e| ExpressionError::subexpression("eval", e))
    })
}

// ============================================================================
// eval
// ============================================================================

/// Conservative textual guard against an expression evaluating itself.
///
/// Any occurrence of `eval(` counts, string literals included.
fn check_self_reference(source: &str) -> Result<()> {
    if source.contains("eval(") {
        return Err(ExpressionError::subexpression(
            "eval",
            ExpressionError::value_error("eval", "nested expressions must not call eval"),
        ));
    }
    Ok(())
}

fn compile_eval(ctx: &Rc<Context>, source: &str) -> Result<ExpressionEvaluator> {
    check_self_reference(source)?;
    ctx.compile_nested(source)
        .map_err(|e| ExpressionError::subexpression("eval", e))
}

fn eval(ctx: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
    check_params("eval", args, &[Param::Text, Param::Text])?;
    let target = target_type("eval", args.get(1))?;
    let zone = ctx.options().default_time_zone;

    if let Some(source) = constant_value(&args[0])? {
        let Some(source) = source.as_str() else {
            let ty = target.unwrap_or(ExpressionType::String);
            return Ok(ExpressionEvaluator::constant(Value::missing(ty)));
        };
        let node = nested(compile_eval(ctx, source)?);
        return match target {
            Some(ty) => cast_node("eval", node, ty, zone),
            None => Ok(node),
        };
    }

    let Some(ty) = target else {
        return Err(ExpressionError::type_error(
            "eval",
            "a non-constant expression needs a result type, e.g. eval(text, TYPE_DOUBLE)",
        ));
    };
    let ctx = ctx.clone();
    let text = args[0].clone();
    Ok(ExpressionEvaluator::from_values(ty, false, move |s| {
        let Some(source) = text.text_value(s)? else {
            return Ok(Value::missing(ty));
        };
        let value = compile_eval(&ctx, &source)?
            .value(s)
            .map_err(|e| ExpressionError::subexpression("eval", e))?;
        cast_value("eval", value, ty, zone)
    }))
}

// ============================================================================
// attribute
// ============================================================================

fn unknown(name: &str) -> ExpressionError {
    ExpressionError::UnknownIdentifier {
        name: name.to_string(),
    }
}

fn attribute(ctx: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
    check_params("attribute", args, &[Param::Text, Param::Text])?;
    let target = target_type("attribute", args.get(1))?;
    let zone = ctx.options().default_time_zone;

    if let Some(name) = constant_value(&args[0])? {
        let Some(name) = name.as_str() else {
            return Err(ExpressionError::value_error("attribute", "the attribute name is missing"));
        };
        let node = ctx.dynamic_node(name).ok_or_else(|| unknown(name))?;
        return match target {
            Some(ty) => cast_node("attribute", node, ty, zone),
            None => Ok(node),
        };
    }

    let Some(ty) = target else {
        return Err(ExpressionError::type_error(
            "attribute",
            "a non-constant attribute name needs a result type",
        ));
    };
    let ctx = ctx.clone();
    let name = args[0].clone();
    Ok(ExpressionEvaluator::from_values(ty, false, move |s| {
        let Some(name) = name.text_value(s)? else {
            return Ok(Value::missing(ty));
        };
        let node = ctx.dynamic_node(&name).ok_or_else(|| unknown(&name))?;
        cast_value("attribute", node.value(s)?, ty, zone)
    }))
}

// ============================================================================
// macro
// ============================================================================

/// Text of the scope constant `name`, falling back to `default`.
///
/// A known but unset name without a default is missing; an unknown name
/// without a default is a fault.
fn lookup_macro(ctx: &Context, name: &str, has_default: bool) -> Result<Option<Option<String>>> {
    match ctx.scope_value(name) {
        Some(Some(text)) => Ok(Some(Some(text))),
        _ if has_default => Ok(None),
        Some(None) => Ok(Some(None)),
        None => Err(unknown(name)),
    }
}

fn macro_value(ctx: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
    check_params("macro", args, &[Param::Text, Param::Text])?;
    let default = args.get(1).cloned();

    if let Some(name) = constant_value(&args[0])? {
        let Some(name) = name.as_str() else {
            return Err(ExpressionError::value_error("macro", "the macro name is missing"));
        };
        return Ok(match (lookup_macro(ctx, name, default.is_some())?, default) {
            (Some(text), _) => ExpressionEvaluator::constant(Value::String(text)),
            (None, Some(default)) => default,
            (None, None) => ExpressionEvaluator::constant(Value::String(None)),
        });
    }

    let ctx = ctx.clone();
    let name = args[0].clone();
    Ok(ExpressionEvaluator::text(false, move |s| {
        let Some(name) = name.text_value(s)? else {
            return Ok(None);
        };
        match (lookup_macro(&ctx, &name, default.is_some())?, &default) {
            (Some(text), _) => Ok(text),
            (None, Some(default)) => default.text_value(s),
            (None, None) => Ok(None),
        }
    }))
}
