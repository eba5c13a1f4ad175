//! colexpr - an embeddable expression language evaluated row by row
//!
//! # Overview
//!
//! Expressions compute one value per row of a table: a derived column, a
//! filter condition, a formatted label. Column names, macros and host
//! parameters are resolved through the [`Context`] the expression is parsed
//! against.
//!
//! # Quick Start
//!
//! ```
//! use colexpr::{ColumnData, Column, ContextBuilder, ExpressionParser, Table};
//!
//! let table = Table::new(vec![
//!     Column::new("price", ColumnData::Real(vec![2.5, 4.0])),
//!     Column::new("count", ColumnData::Integer(vec![2.0, 3.0])),
//! ])
//! .unwrap();
//! let context = ContextBuilder::new().with_table(table).build();
//! let expr = ExpressionParser::new(context.clone())
//!     .parse("price * count")
//!     .unwrap();
//!
//! context.set_row_index(1);
//! assert_eq!(expr.evaluate_numerical().unwrap(), 12.0);
//! ```
//!
//! # Errors
//!
//! Every failure is an [`ExpressionError`]. Use [`render_error_to_string`]
//! to show it against the expression text.

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from colexpr_core
pub use colexpr_core::api::{
    Constant, Context, ContextBuilder, ContextOptions, Expression, ExpressionParser, HostJob,
};

pub use colexpr_core::errors::{ExpressionError, FaultKind, Result};
pub use colexpr_core::evaluator::{EvalSession, ExpressionEvaluator};
pub use colexpr_core::resolvers::{
    ConstantResolver, DynamicResolver, DynamicVariable, MacroMap, MacroStore, SchemaResolver,
    TableResolver, VariableCategory,
};
pub use colexpr_core::stdlib::{Arity, Function, NativeFunction};
pub use colexpr_core::table::{Column, ColumnData, Table, TableError};
pub use colexpr_core::types::ExpressionType;
pub use colexpr_core::values::{self, Instant, LocalTime, StringList, StringSet, Value};
