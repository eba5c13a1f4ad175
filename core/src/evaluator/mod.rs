//! Lazy, typed evaluator nodes.
//!
//! Parsing an expression produces a tree of [`ExpressionEvaluator`]s, one per
//! parse-tree node. Each node exposes a single producer that computes the
//! node's value for the row described by an [`EvalSession`]. Nodes whose
//! inputs are all constant are folded once at construction.
//!
//! ## Example
//!
//! ```
//! use colexpr_core::evaluator::{EvalSession, ExpressionEvaluator};
//! use colexpr_core::values::Value;
//!
//! let node = ExpressionEvaluator::constant(Value::Integer(15.0));
//! assert!(node.is_constant());
//! assert_eq!(node.numeric_value(&EvalSession::detached()).unwrap(), 15.0);
//! ```

mod node;
mod session;


pub use node::{Callback, ExpressionEvaluator, Producer};
pub use session::EvalSession;
