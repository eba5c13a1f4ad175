//! Parsed expressions.

use super::Context;
use crate::errors::Result;
use crate::evaluator::ExpressionEvaluator;
use crate::types::ExpressionType;
use crate::values::{Instant, LocalTime, StringList, StringSet, Value};
use core::fmt;
use std::rc::Rc;

/// A parsed, typed expression bound to its context.
///
/// Every `evaluate_*` call evaluates against the context's current row. A
/// fault aborts that call only; later calls, for the same or other rows,
/// are unaffected. Calling an accessor that does not match
/// [`Expression::expression_type`] is a fatal fault.
pub struct Expression {
    root: ExpressionEvaluator,
    context: Rc<Context>,
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression").field("root", &self.root).finish_non_exhaustive()
    }
}

impl Expression {
    pub(crate) fn new(root: ExpressionEvaluator, context: Rc<Context>) -> Self {
        Self { root, context }
    }

    pub fn expression_type(&self) -> ExpressionType {
        self.root.ty()
    }

    pub fn is_constant(&self) -> bool {
        self.root.is_constant()
    }

    pub fn root(&self) -> &ExpressionEvaluator {
        &self.root
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    /// Value of an `Integer` or `Double` expression; NaN when missing.
    pub fn evaluate_numerical(&self) -> Result<f64> {
        self.root.numeric_value(&self.context.session())
    }

    pub fn evaluate_nominal(&self) -> Result<Option<String>> {
        self.root.text_value(&self.context.session())
    }

    pub fn evaluate_boolean(&self) -> Result<Option<bool>> {
        self.root.boolean_value(&self.context.session())
    }

    pub fn evaluate_instant(&self) -> Result<Option<Instant>> {
        self.root.instant_value(&self.context.session())
    }

    pub fn evaluate_local_time(&self) -> Result<Option<LocalTime>> {
        self.root.local_time_value(&self.context.session())
    }

    pub fn evaluate_string_set(&self) -> Result<Option<StringSet>> {
        self.root.string_set_value(&self.context.session())
    }

    pub fn evaluate_string_list(&self) -> Result<Option<StringList>> {
        self.root.string_list_value(&self.context.session())
    }

    /// Value of any expression type.
    pub fn evaluate(&self) -> Result<Value> {
        self.root.value(&self.context.session())
    }
}
