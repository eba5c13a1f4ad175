mod parsed_expr;
pub mod parser;
mod syntax;
pub mod error;

// Re-export the parser and rule enum for external use
pub use parser::ExpressionGrammar;
pub use parser::Rule;
pub use parser::parse;
pub use parser::parse_with_max_depth;

pub use parsed_expr::{Expr, Literal};
pub use syntax::{BinaryOp, UnaryOp};

#[cfg(test)]
mod precedence_test;

#[cfg(test)]
mod rule_valid_test;
