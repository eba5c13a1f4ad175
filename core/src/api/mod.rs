//! Public API of the expression engine.
//!
//! 1. Assemble a [`Context`] with [`ContextBuilder`]: data resolvers, macros,
//!    the host job, extra functions and constants.
//! 2. Parse text with [`ExpressionParser`] into an [`Expression`].
//! 3. Move the context's row cursor and call the `evaluate_*` accessor
//!    matching the expression type.
//!
//! # Example
//!
//! ```
//! use colexpr_core::api::{ContextBuilder, ExpressionParser};
//! use colexpr_core::table::{Column, ColumnData, Table};
//!
//! let table = Table::new(vec![Column::new("nominal 1", ColumnData::nominal(["a", "b"]))]).unwrap();
//! let context = ContextBuilder::new().with_table(table).build();
//! let expr = ExpressionParser::new(context.clone())
//!     .parse(r#"attribute("nominal 1") + "!""#)
//!     .unwrap();
//!
//! let values: Vec<_> = (0..2)
//!     .map(|row| {
//!         context.set_row_index(row);
//!         expr.evaluate_nominal().unwrap().unwrap()
//!     })
//!     .collect();
//! assert_eq!(values, ["a!", "b!"]);
//! ```

pub mod context;
pub mod engine;
pub mod environment;
pub mod expression;
pub mod host;
pub mod options;

pub use context::{Args, Context};
pub use engine::ExpressionParser;
pub use environment::{Constant, ContextBuilder};
pub use expression::Expression;
pub use host::HostJob;
pub use options::ContextOptions;
