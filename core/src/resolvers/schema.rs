//! Schema-only dynamic resolver.
//!
//! Knows names and types but no data. Parsing against it type-checks an
//! expression without evaluating anything; every value accessor reports an
//! unsupported fault.

use super::{DynamicResolver, DynamicVariable, VariableCategory};
use crate::table::Table;
use crate::types::ExpressionType;

const SCHEMA_GROUP: &str = "table";

#[derive(Debug, Clone, Default)]
pub struct SchemaResolver {
    variables: Vec<DynamicVariable>,
}

impl SchemaResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column description.
    pub fn with_column(mut self, name: impl Into<String>, ty: ExpressionType) -> Self {
        self.variables.push(DynamicVariable::new(
            name,
            VariableCategory::Dynamic,
            SCHEMA_GROUP,
            ty,
        ));
        self
    }

    /// Copies the column names, types and roles of `table`.
    pub fn from_table(table: &Table) -> Self {
        let variables = table
            .columns()
            .map(|c| {
                DynamicVariable::new(
                    c.name(),
                    VariableCategory::Dynamic,
                    SCHEMA_GROUP,
                    c.expression_type(),
                )
                .with_role(c.role())
            })
            .collect();
        Self { variables }
    }
}

impl DynamicResolver for SchemaResolver {
    fn all_variables(&self) -> Vec<DynamicVariable> {
        self.variables.clone()
    }

    fn variable_type(&self, name: &str) -> Option<ExpressionType> {
        self.variables.iter().find(|v| v.name == name).map(|v| v.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FaultKind;
    use crate::table::{Column, ColumnData};

    #[test]
    fn test_schema_from_table() {
        let table = Table::new(vec![
            Column::new("a", ColumnData::Real(vec![1.0])),
            Column::new("b", ColumnData::nominal(["x"])).with_role("id"),
        ])
        .unwrap();
        let schema = SchemaResolver::from_table(&table);
        assert_eq!(schema.variable_type("a"), Some(ExpressionType::Double));
        assert_eq!(schema.variable_type("b"), Some(ExpressionType::String));
        assert_eq!(schema.all_variables()[1].role.as_deref(), Some("id"));
    }

    #[test]
    fn test_values_are_unsupported() {
        let schema = SchemaResolver::new().with_column("a", ExpressionType::Double);
        assert_eq!(
            schema.numeric_value("a", 0).unwrap_err().kind(),
            FaultKind::Fatal
        );
        assert_eq!(schema.text_value("a", 0).unwrap_err().kind(), FaultKind::Fatal);
    }
}
