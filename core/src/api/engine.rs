//! The parser facade.

use super::{Context, Expression};
use crate::errors::Result;
use std::rc::Rc;

/// Parses expression text against a [`Context`].
///
/// Parsing resolves every name, type-checks every function call and folds
/// constant sub-trees, so most faults surface here rather than per row.
///
/// # Example
///
/// ```
/// use colexpr_core::api::{ContextBuilder, ExpressionParser};
/// use colexpr_core::types::ExpressionType;
///
/// let parser = ExpressionParser::new(ContextBuilder::new().build());
/// let expr = parser.parse("3*5").unwrap();
/// assert_eq!(expr.expression_type(), ExpressionType::Integer);
/// assert_eq!(expr.evaluate_numerical().unwrap(), 15.0);
/// ```
pub struct ExpressionParser {
    context: Rc<Context>,
}

impl ExpressionParser {
    pub fn new(context: Rc<Context>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    pub fn parse(&self, source: &str) -> Result<Expression> {
        tracing::debug!(source, "parsing expression");
        let root = self.context.compile_source(source)?;
        tracing::debug!(ty = %root.ty(), constant = root.is_constant(), "parsed expression");
        Ok(Expression::new(root, self.context.clone()))
    }
}
