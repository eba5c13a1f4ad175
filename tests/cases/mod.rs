//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, NaiveTime, Utc};
use colexpr::{
    Column, ColumnData, Context, ContextBuilder, ExpressionError, ExpressionParser, ExpressionType,
    FaultKind, Table, Value,
};
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use std::rc::Rc;

pub struct Row {
    pub name: Option<&'static str>,
    pub price: f64,
    pub count: f64,
    pub in_stock: Option<bool>,
    pub sold_at: Option<&'static str>,
    pub opens: Option<(u32, u32)>,
    pub tags: Option<&'static [&'static str]>,
    pub history: Option<&'static [&'static str]>,
}

/// Two complete rows followed by a row where every column is missing.
pub static ROWS: Lazy<Vec<Row>> = Lazy::new(|| {
    vec![
        Row {
            name: Some("apple"),
            price: 2.5,
            count: 4.0,
            in_stock: Some(true),
            sold_at: Some("2020-03-01T12:30:00Z"),
            opens: Some((8, 15)),
            tags: Some(&["fruit", "red"]),
            history: Some(&["a", "b"]),
        },
        Row {
            name: Some("banana"),
            price: 0.5,
            count: 12.0,
            in_stock: Some(false),
            sold_at: Some("2021-07-15T00:00:00Z"),
            opens: Some((9, 0)),
            tags: Some(&["fruit"]),
            history: Some(&["c"]),
        },
        Row {
            name: None,
            price: f64::NAN,
            count: f64::NAN,
            in_stock: None,
            sold_at: None,
            opens: None,
            tags: None,
            history: None,
        },
    ]
});

/// Column name and type of every column of [`sample_table`].
pub const COLUMNS: [(&str, ExpressionType); 8] = [
    ("name", ExpressionType::String),
    ("price", ExpressionType::Double),
    ("count", ExpressionType::Integer),
    ("in stock", ExpressionType::Boolean),
    ("sold at", ExpressionType::Instant),
    ("opens", ExpressionType::LocalTime),
    ("tags", ExpressionType::StringSet),
    ("history", ExpressionType::StringList),
];

pub fn instant(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .unwrap_or_else(|e| panic!("bad fixture instant {text}: {e}"))
        .with_timezone(&Utc)
}

pub fn sample_table() -> Table {
    fn words(w: &'static [&'static str]) -> impl Iterator<Item = String> {
        w.iter().map(|s| s.to_string())
    }

    let rows = &*ROWS;
    Table::new(vec![
        Column::new("name", ColumnData::Nominal(rows.iter().map(|r| r.name.map(String::from)).collect())),
        Column::new("price", ColumnData::Real(rows.iter().map(|r| r.price).collect())),
        Column::new("count", ColumnData::Integer(rows.iter().map(|r| r.count).collect())),
        Column::new("in stock", ColumnData::Boolean(rows.iter().map(|r| r.in_stock).collect())),
        Column::new("sold at", ColumnData::DateTime(rows.iter().map(|r| r.sold_at.map(instant)).collect())),
        Column::new(
            "opens",
            ColumnData::Time(
                rows.iter()
                    .map(|r| r.opens.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)))
                    .collect(),
            ),
        ),
        Column::new("tags", ColumnData::TextSet(rows.iter().map(|r| r.tags.map(|t| words(t).collect())).collect())),
        Column::new("history", ColumnData::TextList(rows.iter().map(|r| r.history.map(|t| words(t).collect())).collect())),
    ])
    .expect("fixture table is rectangular")
}

pub fn sample_context() -> Rc<Context> {
    ContextBuilder::new().with_table(sample_table()).build()
}

/// Parses `source` against `context` and evaluates it for every row.
pub fn evaluate_rows(context: &Rc<Context>, source: &str, rows: usize) -> Vec<Value> {
    let expr = ExpressionParser::new(context.clone())
        .parse(source)
        .unwrap_or_else(|e| panic!("parsing should succeed for: {source}\nError: {e:?}"));
    (0..rows)
        .map(|row| {
            context.set_row_index(row);
            expr.evaluate()
                .unwrap_or_else(|e| panic!("row {row} of {source} failed: {e:?}"))
        })
        .collect()
}

pub fn check_value(source: &str, expected: Value) {
    let parser = ExpressionParser::new(ContextBuilder::new().build());
    let expr = parser
        .parse(source)
        .unwrap_or_else(|e| panic!("parsing should succeed for: {source}\nError: {e:?}"));
    assert_eq!(expr.expression_type(), expected.ty(), "type of {source}");
    let value = expr
        .evaluate()
        .unwrap_or_else(|e| panic!("evaluation should succeed for: {source}\nError: {e:?}"));
    assert_eq!(value, expected, "value of {source}");
}

pub fn check_rows(source: &str, expected: Vec<Value>) {
    let values = evaluate_rows(&sample_context(), source, expected.len());
    assert_eq!(values, expected, "rows of {source}");
}

pub fn check_fault(source: &str, kind: FaultKind) -> ExpressionError {
    let parser = ExpressionParser::new(sample_context());
    let result = parser.parse(source).and_then(|expr| expr.evaluate());
    match result {
        Err(err) => {
            assert_eq!(err.kind(), kind, "fault of {source}: {err}");
            err
        }
        Ok(value) => panic!("{source} should fail, gave {value:?}"),
    }
}

/// Declares one test per expression.
///
/// - `value:` parses without bindings and checks type and value.
/// - `rows:` evaluates against [`sample_table`] for as many rows as given.
/// - `fault:` expects parsing or evaluating row 0 to fail with that kind.
macro_rules! test_case {
    (name: $name:ident, input: $input:expr, value: $value:expr $(,)?) => {
        #[test]
        fn $name() {
            $crate::cases::check_value($input, $value);
        }
    };
    (name: $name:ident, input: $input:expr, rows: $rows:expr $(,)?) => {
        #[test]
        fn $name() {
            $crate::cases::check_rows($input, $rows);
        }
    };
    (name: $name:ident, input: $input:expr, fault: $kind:expr $(,)?) => {
        #[test]
        fn $name() {
            $crate::cases::check_fault($input, $kind);
        }
    };
}
