//! Dynamic resolver over a [`Table`].

use super::{DynamicResolver, DynamicVariable, VariableCategory};
use crate::errors::{ExpressionError, Result};
use crate::table::{Column, ColumnData, ColumnReader, Table};
use crate::types::ExpressionType;
use crate::values::{Instant, LocalTime, StringList, StringSet};
use core::cell::RefCell;
use hashbrown::HashMap;
use std::rc::Rc;

const TABLE_GROUP: &str = "table";
const ADDITIONAL_GROUP: &str = "additional";

/// Resolves column names to per-row values.
///
/// Keeps one lazily created reader per (column, type) pair so that
/// sequential row access never re-seeks. Columns registered with
/// [`TableResolver::add_column`] shadow table columns of the same name.
pub struct TableResolver {
    table: Rc<Table>,
    additional: RefCell<Vec<Rc<Column>>>,
    readers: RefCell<HashMap<(String, ExpressionType), ColumnReader>>,
}

impl TableResolver {
    pub fn new(table: Rc<Table>) -> Self {
        Self {
            table,
            additional: RefCell::new(Vec::new()),
            readers: RefCell::new(HashMap::new()),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Registers an extra column, replacing any earlier one with that name.
    pub fn add_column(&self, name: impl Into<String>, data: ColumnData) {
        let column = Rc::new(Column::new(name, data));
        self.readers
            .borrow_mut()
            .retain(|(reader_name, _), _| reader_name != column.name());
        let mut additional = self.additional.borrow_mut();
        additional.retain(|c| c.name() != column.name());
        tracing::debug!(column = column.name(), "registered additional column");
        additional.push(column);
    }

    /// Number of non-sequential seeks the reader for `name` has made.
    pub fn seeks(&self, name: &str) -> Option<usize> {
        self.readers
            .borrow()
            .iter()
            .find(|((reader_name, _), _)| reader_name == name)
            .map(|(_, reader)| reader.seeks())
    }

    fn column(&self, name: &str) -> Option<Rc<Column>> {
        self.additional
            .borrow()
            .iter()
            .find(|c| c.name() == name)
            .cloned()
            .or_else(|| self.table.column(name).cloned())
    }

    fn read<T>(
        &self,
        name: &str,
        kind: &str,
        read: impl FnOnce(&mut ColumnReader) -> Option<T>,
    ) -> Result<T> {
        let column = self.column(name).ok_or_else(|| {
            ExpressionError::fatal("table resolver", format!("no column named '{name}'"))
        })?;
        let ty = column.expression_type();
        let mut readers = self.readers.borrow_mut();
        let reader = readers
            .entry((name.to_string(), ty))
            .or_insert_with(|| ColumnReader::new(column));
        read(reader).ok_or_else(|| {
            ExpressionError::fatal(
                "table resolver",
                format!("requested {kind} value from {ty} column '{name}'"),
            )
        })
    }
}

impl DynamicResolver for TableResolver {
    fn all_variables(&self) -> Vec<DynamicVariable> {
        let additional = self.additional.borrow();
        let shadowed = |name: &str| additional.iter().any(|c| c.name() == name);
        let describe = |column: &Column, group: &str| {
            DynamicVariable::new(
                column.name(),
                VariableCategory::Dynamic,
                group,
                column.expression_type(),
            )
            .with_role(column.role())
        };

        self.table
            .columns()
            .filter(|c| !shadowed(c.name()))
            .map(|c| describe(&**c, TABLE_GROUP))
            .chain(additional.iter().map(|c| describe(&**c, ADDITIONAL_GROUP)))
            .collect()
    }

    fn variable_type(&self, name: &str) -> Option<ExpressionType> {
        self.column(name).map(|c| c.expression_type())
    }

    fn numeric_value(&self, name: &str, row: usize) -> Result<f64> {
        self.read(name, "numeric", |r| r.numeric(row))
    }

    fn text_value(&self, name: &str, row: usize) -> Result<Option<String>> {
        self.read(name, "text", |r| r.text(row))
    }

    fn boolean_value(&self, name: &str, row: usize) -> Result<Option<bool>> {
        self.read(name, "boolean", |r| r.boolean(row))
    }

    fn instant_value(&self, name: &str, row: usize) -> Result<Option<Instant>> {
        self.read(name, "instant", |r| r.instant(row))
    }

    fn local_time_value(&self, name: &str, row: usize) -> Result<Option<LocalTime>> {
        self.read(name, "local time", |r| r.local_time(row))
    }

    fn string_set_value(&self, name: &str, row: usize) -> Result<Option<StringSet>> {
        self.read(name, "string set", |r| r.string_set(row))
    }

    fn string_list_value(&self, name: &str, row: usize) -> Result<Option<StringList>> {
        self.read(name, "string list", |r| r.string_list(row))
    }
}
