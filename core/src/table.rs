//! In-memory columnar table.
//!
//! Stands in for the host's column store: an ordered list of named, typed
//! columns of equal height, each readable through a position-tracking
//! [`ColumnReader`]. The storage kind of a column maps to exactly one
//! expression type.

use crate::types::ExpressionType;
use crate::values::{Instant, LocalTime, StringList, StringSet};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Real(Vec<f64>),
    Integer(Vec<f64>),
    Nominal(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
    DateTime(Vec<Option<Instant>>),
    Time(Vec<Option<LocalTime>>),
    TextSet(Vec<Option<StringSet>>),
    TextList(Vec<Option<StringList>>),
}

impl ColumnData {
    pub fn expression_type(&self) -> ExpressionType {
        match self {
            ColumnData::Real(_) => ExpressionType::Double,
            ColumnData::Integer(_) => ExpressionType::Integer,
            ColumnData::Nominal(_) => ExpressionType::String,
            ColumnData::Boolean(_) => ExpressionType::Boolean,
            ColumnData::DateTime(_) => ExpressionType::Instant,
            ColumnData::Time(_) => ExpressionType::LocalTime,
            ColumnData::TextSet(_) => ExpressionType::StringSet,
            ColumnData::TextList(_) => ExpressionType::StringList,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Real(v) | ColumnData::Integer(v) => v.len(),
            ColumnData::Nominal(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
            ColumnData::Time(v) => v.len(),
            ColumnData::TextSet(v) => v.len(),
            ColumnData::TextList(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nominal column from plain strings, none of them missing.
    pub fn nominal<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        ColumnData::Nominal(values.into_iter().map(|s| Some(s.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    role: Option<String>,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            role: None,
            data,
        }
    }

    /// Tags the column with a role such as `label` or `id`.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn expression_type(&self) -> ExpressionType {
        self.data.expression_type()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("column '{name}' has {len} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        len: usize,
        expected: usize,
    },
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Rc<Column>>,
    height: usize,
}

impl Table {
    /// Builds a table; all columns must have the same height and distinct names.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let height = columns.first().map(|c| c.data.len()).unwrap_or(0);
        let mut seen: Vec<&str> = Vec::with_capacity(columns.len());
        for column in &columns {
            if seen.contains(&column.name()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            seen.push(column.name());
            if column.data.len() != height {
                return Err(TableError::RaggedColumn {
                    name: column.name.clone(),
                    len: column.data.len(),
                    expected: height,
                });
            }
        }
        Ok(Self {
            columns: columns.into_iter().map(Rc::new).collect(),
            height,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Rc<Column>> {
        self.columns.iter()
    }

    pub fn column(&self, name: &str) -> Option<&Rc<Column>> {
        self.columns.iter().find(|c| c.name == name)
    }
}

// ============================================================================
// Readers
// ============================================================================

/// Sequential reader over one column that remembers where it stopped.
///
/// Reading the row right after the previous one just advances; any other row
/// costs a seek. Rows past the end read as missing.
#[derive(Debug)]
pub struct ColumnReader {
    column: Rc<Column>,
    position: Option<usize>,
    seeks: usize,
}

impl ColumnReader {
    pub fn new(column: Rc<Column>) -> Self {
        Self {
            column,
            position: None,
            seeks: 0,
        }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Last row read, if any.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Number of non-sequential repositionings so far.
    pub fn seeks(&self) -> usize {
        self.seeks
    }

    /// Moves to `row`; returns false if the row is out of range.
    fn move_to(&mut self, row: usize) -> bool {
        if row >= self.column.data.len() {
            return false;
        }
        let sequential = match self.position {
            Some(last) => last.checked_add(1) == Some(row),
            None => row == 0,
        };
        if !sequential && self.position != Some(row) {
            self.seeks += 1;
            tracing::trace!(column = %self.column.name, row, "column reader seek");
        }
        self.position = Some(row);
        true
    }

    /// Reads a numeric cell; `None` if the column is not numeric.
    pub fn numeric(&mut self, row: usize) -> Option<f64> {
        if !self.column.expression_type().is_numeric() {
            return None;
        }
        if !self.move_to(row) {
            return Some(f64::NAN);
        }
        match &self.column.data {
            ColumnData::Real(v) | ColumnData::Integer(v) => Some(v[row]),
            _ => None,
        }
    }

    /// Reads an object cell with `pick`, which returns `None` for the wrong
    /// storage kind.
    fn object<T: Clone>(
        &mut self,
        row: usize,
        pick: impl Fn(&ColumnData) -> Option<&Vec<Option<T>>>,
    ) -> Option<Option<T>> {
        let column = Rc::clone(&self.column);
        let values = pick(&column.data)?;
        if !self.move_to(row) {
            return Some(None);
        }
        Some(values[row].clone())
    }

    pub fn text(&mut self, row: usize) -> Option<Option<String>> {
        self.object(row, |d| match d {
            ColumnData::Nominal(v) => Some(v),
            _ => None,
        })
    }

    pub fn boolean(&mut self, row: usize) -> Option<Option<bool>> {
        self.object(row, |d| match d {
            ColumnData::Boolean(v) => Some(v),
            _ => None,
        })
    }

    pub fn instant(&mut self, row: usize) -> Option<Option<Instant>> {
        self.object(row, |d| match d {
            ColumnData::DateTime(v) => Some(v),
            _ => None,
        })
    }

    pub fn local_time(&mut self, row: usize) -> Option<Option<LocalTime>> {
        self.object(row, |d| match d {
            ColumnData::Time(v) => Some(v),
            _ => None,
        })
    }

    pub fn string_set(&mut self, row: usize) -> Option<Option<StringSet>> {
        self.object(row, |d| match d {
            ColumnData::TextSet(v) => Some(v),
            _ => None,
        })
    }

    pub fn string_list(&mut self, row: usize) -> Option<Option<StringList>> {
        self.object(row, |d| match d {
            ColumnData::TextList(v) => Some(v),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader() -> ColumnReader {
        let column = Column::new("x", ColumnData::Real(vec![1.0, 2.0, 3.0, 4.0]));
        ColumnReader::new(Rc::new(column))
    }

    #[test]
    fn test_sequential_reads_do_not_seek() {
        let mut r = reader();
        for row in 0..4 {
            assert_eq!(r.numeric(row), Some(row as f64 + 1.0));
        }
        assert_eq!(r.seeks(), 0);
        assert_eq!(r.position(), Some(3));
    }

    #[test]
    fn test_backwards_read_seeks() {
        let mut r = reader();
        r.numeric(0);
        r.numeric(1);
        r.numeric(0);
        assert_eq!(r.seeks(), 1);
        r.numeric(3);
        assert_eq!(r.seeks(), 2);
        // Re-reading the same row is free.
        r.numeric(3);
        assert_eq!(r.seeks(), 2);
    }

    #[test]
    fn test_out_of_range_reads_missing() {
        let mut r = reader();
        assert!(r.numeric(10).unwrap().is_nan());
        assert_eq!(r.position(), None);
    }

    #[test]
    fn test_wrong_kind_returns_none() {
        let mut r = reader();
        assert_eq!(r.text(0), None);
        let mut nominal = ColumnReader::new(Rc::new(Column::new(
            "n",
            ColumnData::nominal(["a", "b"]),
        )));
        assert_eq!(nominal.numeric(0), None);
        assert_eq!(nominal.text(1), Some(Some("b".to_string())));
        assert_eq!(nominal.text(2), Some(None));
    }

    #[test]
    fn test_ragged_table_is_rejected() {
        let err = Table::new(vec![
            Column::new("a", ColumnData::Real(vec![1.0])),
            Column::new("b", ColumnData::Real(vec![1.0, 2.0])),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedColumn {
                name: "b".into(),
                len: 2,
                expected: 1
            }
        );
    }

    #[test]
    fn test_duplicate_column_is_rejected() {
        let err = Table::new(vec![
            Column::new("a", ColumnData::Real(vec![1.0])),
            Column::new("a", ColumnData::Real(vec![1.0])),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".into()));
    }
}
