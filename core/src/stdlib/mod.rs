//! Standard function library.
//!
//! Every function, operators included, is a [`Function`] that turns argument
//! nodes into a new evaluator node. Builders validate arity and static
//! argument types immediately. When all arguments are constant the resulting
//! node is folded, so value faults of constant input surface at parse time;
//! otherwise the node re-validates on every row it is evaluated for.
//!
//! Packages:
//! - [`arithmetic`]: `+ - * / % ^` and unary signs
//! - [`comparison`]: ordering and equality
//! - [`logical`]: `&& || !`
//! - [`math`]: rounding, powers, trigonometry, statistics, bit operations
//! - [`string`]: text functions
//! - [`advanced`]: `if`, `missing`, `eval`, `attribute`, `macro`
//! - [`calendar`]: instants and times of day
//! - [`host`]: `rand` and `param`, only with a host job
//! - [`constants`]: the standard named constants

use crate::api::Context;
use crate::errors::{ExpressionError, Result};
use crate::evaluator::{EvalSession, ExpressionEvaluator};
use crate::types::ExpressionType;
use crate::values::Value;
use smallvec::SmallVec;
use std::rc::Rc;

pub mod advanced;
pub mod arithmetic;
pub mod calendar;
pub mod comparison;
pub mod constants;
pub mod host;
pub mod logical;
pub mod math;
pub mod string;

#[cfg(test)]
mod stdlib_test;

/// A callable entry of the function table.
pub trait Function {
    fn name(&self) -> &str;

    /// Listing group, e.g. `"math"`.
    fn group(&self) -> &str;

    /// Usage line, e.g. `round(number[, digits])`.
    fn signature(&self) -> &str;

    fn compute(&self, ctx: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator>;
}

/// Accepted argument counts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Arity {
    min: usize,
    max: Option<usize>,
}

impl Arity {
    pub const fn exact(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min && self.max.is_none_or(|max| n <= max)
    }

    fn describe(&self) -> String {
        match self.max {
            Some(max) if max == self.min => self.min.to_string(),
            Some(max) if max == self.min + 1 => format!("{} or {}", self.min, max),
            Some(max) => format!("{} to {}", self.min, max),
            None => format!("at least {}", self.min),
        }
    }

    pub fn check(&self, function: &str, n: usize) -> Result<()> {
        if self.accepts(n) {
            Ok(())
        } else {
            Err(ExpressionError::arity(function, self.describe(), n))
        }
    }
}

type Build = Box<dyn Fn(&Rc<Context>, &[ExpressionEvaluator]) -> Result<ExpressionEvaluator>>;

/// A [`Function`] implemented by a Rust closure.
pub struct NativeFunction {
    name: &'static str,
    group: &'static str,
    signature: &'static str,
    arity: Arity,
    build: Build,
}

impl NativeFunction {
    pub fn new(
        name: &'static str,
        group: &'static str,
        signature: &'static str,
        arity: Arity,
        build: impl Fn(&Rc<Context>, &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> + 'static,
    ) -> Self {
        Self {
            name,
            group,
            signature,
            arity,
            build: Box::new(build),
        }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }
}

impl Function for NativeFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn group(&self) -> &str {
        self.group
    }

    fn signature(&self) -> &str {
        self.signature
    }

    fn compute(&self, ctx: &Rc<Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
        self.arity.check(self.name, args.len())?;
        (self.build)(ctx, args)?.fold()
    }
}

/// Every function that does not depend on a host job.
pub fn standard_functions() -> Vec<Rc<dyn Function>> {
    let mut functions = Vec::new();
    functions.extend(arithmetic::functions());
    functions.extend(comparison::functions());
    functions.extend(logical::functions());
    functions.extend(math::functions());
    functions.extend(string::functions());
    functions.extend(advanced::functions());
    functions.extend(calendar::functions());
    functions.into_iter().map(|f| Rc::new(f) as Rc<dyn Function>).collect()
}

// ============================================================================
// Argument validation
// ============================================================================

/// Static type accepted by one argument position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Param {
    Numeric,
    Text,
    Instant,
    LocalTime,
    /// `Boolean` or numeric.
    Logical,
    Any,
}

impl Param {
    pub fn accepts(self, ty: ExpressionType) -> bool {
        match self {
            Param::Numeric => ty.is_numeric(),
            Param::Text => ty == ExpressionType::String,
            Param::Instant => ty == ExpressionType::Instant,
            Param::LocalTime => ty == ExpressionType::LocalTime,
            Param::Logical => ty == ExpressionType::Boolean || ty.is_numeric(),
            Param::Any => true,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Param::Numeric => "numeric",
            Param::Text => "string",
            Param::Instant => "instant",
            Param::LocalTime => "local_time",
            Param::Logical => "boolean or numeric",
            Param::Any => "any",
        }
    }
}

/// Checks argument types against `params`; arguments past the end of
/// `params` are checked against its last entry.
pub fn check_params(function: &str, args: &[ExpressionEvaluator], params: &[Param]) -> Result<()> {
    for (i, arg) in args.iter().enumerate() {
        let Some(param) = params.get(i).or(params.last()) else {
            break;
        };
        if !param.accepts(arg.ty()) {
            return Err(ExpressionError::type_error(
                function,
                format!(
                    "argument {} must be {}, found {}",
                    i + 1,
                    param.describe(),
                    arg.ty()
                ),
            ));
        }
    }
    Ok(())
}

pub fn all_constant(args: &[ExpressionEvaluator]) -> bool {
    args.iter().all(ExpressionEvaluator::is_constant)
}

/// Value of a constant argument, evaluated at construction time.
pub fn constant_value(arg: &ExpressionEvaluator) -> Result<Option<Value>> {
    if arg.is_constant() {
        arg.value(&EvalSession::detached()).map(Some)
    } else {
        Ok(None)
    }
}

pub type ArgValues = SmallVec<[Value; 4]>;

/// Node of type `ty` computing `f` over the evaluated arguments.
///
/// Constant when every argument is constant.
pub fn value_node(
    ty: ExpressionType,
    args: &[ExpressionEvaluator],
    f: impl Fn(&[Value]) -> Result<Value> + 'static,
) -> ExpressionEvaluator {
    let constant = all_constant(args);
    let args: SmallVec<[ExpressionEvaluator; 4]> = args.iter().cloned().collect();
    ExpressionEvaluator::from_values(ty, constant, move |s| {
        let values = args
            .iter()
            .map(|arg| arg.value(s))
            .collect::<Result<ArgValues>>()?;
        f(&values)
    })
}

/// Numeric node over numeric arguments.
pub fn numeric_node(
    ty: ExpressionType,
    args: &[ExpressionEvaluator],
    f: impl Fn(&[f64]) -> Result<f64> + 'static,
) -> ExpressionEvaluator {
    let constant = all_constant(args);
    let args: SmallVec<[ExpressionEvaluator; 4]> = args.iter().cloned().collect();
    ExpressionEvaluator::numeric(ty, constant, move |s| {
        let values = args
            .iter()
            .map(|arg| arg.numeric_value(s))
            .collect::<Result<SmallVec<[f64; 4]>>>()?;
        f(&values)
    })
}

/// `Integer` if every argument is `Integer`, else `Double`.
pub fn numeric_join(args: &[ExpressionEvaluator]) -> ExpressionType {
    args.iter()
        .fold(ExpressionType::Integer, |acc, arg| acc.numeric_join(arg.ty()))
}

/// Integral value of a numeric argument, or a value fault.
pub fn whole_number(function: &str, what: &str, value: f64) -> Result<i64> {
    if value.fract() != 0.0 || !value.is_finite() || value.abs() > i64::MAX as f64 {
        return Err(ExpressionError::value_error(
            function,
            format!("{what} must be a whole number, was {value}"),
        ));
    }
    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ContextBuilder;

    #[test]
    fn test_arity_description() {
        assert_eq!(Arity::exact(2).describe(), "2");
        assert_eq!(Arity::range(1, 2).describe(), "1 or 2");
        assert_eq!(Arity::range(2, 4).describe(), "2 to 4");
        assert_eq!(Arity::at_least(1).describe(), "at least 1");
        assert!(Arity::at_least(0).accepts(0));
        assert!(!Arity::range(1, 2).accepts(3));
    }

    #[test]
    fn test_function_names_are_unique() {
        let functions = standard_functions();
        let mut names: Vec<_> = functions.iter().map(|f| f.name().to_string()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_constant_arguments_fold() {
        let ctx = ContextBuilder::new().build();
        let args = [
            ExpressionEvaluator::constant(Value::Integer(2.0)),
            ExpressionEvaluator::constant(Value::Integer(3.0)),
        ];
        let node = ctx.call("+", &args).unwrap();
        assert!(node.is_constant());
        assert_eq!(node.numeric_value(&EvalSession::detached()).unwrap(), 5.0);
    }
}
