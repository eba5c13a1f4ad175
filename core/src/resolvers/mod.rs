//! Name resolution for data that lives outside the expression.
//!
//! - [`DynamicResolver`]: row-indexed values, typically table columns.
//! - [`ConstantResolver`]: scope constants such as macros, always text.
//!
//! Both can enumerate what they know for tooling (autocompletion, listings).

mod macros;
mod schema;
mod table;

pub use macros::{MacroMap, MacroResolver, MacroStore};
pub use schema::SchemaResolver;
pub use table::TableResolver;

use crate::errors::{ExpressionError, Result};
use crate::types::ExpressionType;
use crate::values::{Instant, LocalTime, StringList, StringSet};

/// Which namespace a variable descriptor belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VariableCategory {
    /// Resolved per row.
    Dynamic,
    /// Resolved once, without a row index.
    Scope,
}

/// Descriptor of a resolvable name, used for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicVariable {
    pub name: String,
    pub category: VariableCategory,
    pub group: String,
    pub ty: ExpressionType,
    pub role: Option<String>,
    pub visible: bool,
}

impl DynamicVariable {
    pub fn new(
        name: impl Into<String>,
        category: VariableCategory,
        group: impl Into<String>,
        ty: ExpressionType,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            group: group.into(),
            ty,
            role: None,
            visible: true,
        }
    }

    pub fn with_role(mut self, role: Option<&str>) -> Self {
        self.role = role.map(str::to_string);
        self
    }
}

fn unsupported(kind: &str, name: &str) -> ExpressionError {
    ExpressionError::fatal(
        "resolver",
        format!("{kind} values of '{name}' are not supported by this resolver"),
    )
}

/// Row-indexed variables.
///
/// Implementors override the accessor matching each variable's type. Calling
/// any other accessor is a contract violation; the default implementations
/// report it as a fatal fault.
pub trait DynamicResolver {
    fn all_variables(&self) -> Vec<DynamicVariable>;

    fn variable_type(&self, name: &str) -> Option<ExpressionType>;

    fn numeric_value(&self, name: &str, _row: usize) -> Result<f64> {
        Err(unsupported("numeric", name))
    }

    fn text_value(&self, name: &str, _row: usize) -> Result<Option<String>> {
        Err(unsupported("text", name))
    }

    fn boolean_value(&self, name: &str, _row: usize) -> Result<Option<bool>> {
        Err(unsupported("boolean", name))
    }

    fn instant_value(&self, name: &str, _row: usize) -> Result<Option<Instant>> {
        Err(unsupported("instant", name))
    }

    fn local_time_value(&self, name: &str, _row: usize) -> Result<Option<LocalTime>> {
        Err(unsupported("local time", name))
    }

    fn string_set_value(&self, name: &str, _row: usize) -> Result<Option<StringSet>> {
        Err(unsupported("string set", name))
    }

    fn string_list_value(&self, name: &str, _row: usize) -> Result<Option<StringList>> {
        Err(unsupported("string list", name))
    }
}

/// Scope constants. Their values are always text.
pub trait ConstantResolver {
    fn all_variables(&self) -> Vec<DynamicVariable>;

    /// `Some(ExpressionType::String)` for every known name.
    fn variable_type(&self, name: &str) -> Option<ExpressionType>;

    /// Current value; `None` for known names that are currently unset.
    fn string_value(&self, name: &str) -> Option<String>;
}
