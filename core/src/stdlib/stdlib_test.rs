//! End-to-end tests of the standard library through the public API.

use crate::api::{ContextBuilder, ExpressionParser};
use crate::errors::{ExpressionError, FaultKind, Result};
use crate::resolvers::MacroMap;
use crate::table::{Column, ColumnData, Table};
use crate::types::ExpressionType;
use crate::values::Value;
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn run(source: &str) -> Result<Value> {
    let parser = ExpressionParser::new(ContextBuilder::new().build());
    parser.parse(source)?.evaluate()
}

/// Evaluates `source` and checks both its type and its value.
fn test_expr(source: &str, expected: Value) {
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

/// Evaluates `source` and checks that the result is the missing value of `ty`.
fn test_missing(source: &str, ty: ExpressionType) {
    let value = run(source).unwrap_or_else(|e| panic!("{source} failed: {e:?}"));
    assert_eq!(value.ty(), ty, "type of {source}");
    assert!(value.is_missing(), "{source} gave {value:?}");
}

fn expect_fault(source: &str, kind: FaultKind) -> ExpressionError {
    match run(source) {
        Err(err) => {
            assert_eq!(err.kind(), kind, "fault of {source}: {err}");
            err
        }
        Ok(value) => panic!("{source} should fail, gave {value:?}"),
    }
}

fn int(v: f64) -> Value {
    Value::Integer(v)
}

fn double(v: f64) -> Value {
    Value::Double(v)
}

fn text(v: &str) -> Value {
    Value::string(v)
}

fn boolean(v: bool) -> Value {
    Value::Boolean(Some(v))
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_arithmetic_result_types() {
    test_expr("3*5", int(15.0));
    test_expr("4/2", double(2.0));
    test_expr("7 % 3", int(1.0));
    test_expr("-7 % 3", int(-1.0));
    test_expr("7.5 % 2", double(1.5));
    test_expr("1 + 2.0", double(3.0));
    test_expr("2^10", int(1024.0));
    test_expr("2^-1", double(0.5));
    test_expr("-2^2", int(-4.0));
    test_expr("2^3^2", int(512.0));
}

#[test]
fn test_division_by_zero() {
    test_expr("1/0", double(f64::INFINITY));
    test_expr("-1/0", double(f64::NEG_INFINITY));
    test_missing("0/0", ExpressionType::Double);
}

#[test]
fn test_concatenation() {
    test_expr(r#""hello " + 0/0"#, text("hello "));
    test_expr(r#""a" + 1"#, text("a1"));
    test_expr(r#""a" + 1.5"#, text("a1.500"));
    test_expr(r#"1/0 + "x""#, text("∞x"));
    test_expr(r#""is " + true"#, text("is true"));
    test_missing("MISSING_NOMINAL + MISSING_NOMINAL", ExpressionType::String);
}

#[test]
fn test_ordering() {
    test_expr(r#""apple" < "banana""#, boolean(true));
    test_expr("2 >= 2.0", boolean(true));
    test_expr("1 < MISSING_NUMERIC", boolean(false));
    expect_fault("MISSING_NUMERIC < 1", FaultKind::Value);
    expect_fault(r#"1 < "b""#, FaultKind::Type);
}

#[test]
fn test_equality() {
    test_expr("MISSING_NUMERIC == MISSING_NOMINAL", boolean(false));
    test_expr("MISSING_NUMERIC == MISSING_NUMERIC", boolean(true));
    test_expr("MISSING_NUMERIC != MISSING_NUMERIC", boolean(false));
    test_expr("true == 1", boolean(true));
    test_expr(r#""TRUE" == true"#, boolean(true));
    test_expr(r#"3 == "3""#, boolean(true));
    test_expr("1 == 1.0", boolean(true));
}

#[test]
fn test_logical() {
    test_expr("1 && 0", boolean(false));
    test_expr("!0", boolean(true));
    test_expr("true || false", boolean(true));
    test_missing("true || MISSING_NUMERIC", ExpressionType::Boolean);
    expect_fault(r#""a" && true"#, FaultKind::Type);
}

// ============================================================================
// Math
// ============================================================================

#[test]
fn test_rounding() {
    test_expr("round(1.3333, 2)", double(1.33));
    test_expr("round(2, -5)", int(0.0));
    test_expr("round(2, -400)", int(0.0));
    test_expr("round(1.5, 400)", double(1.5));
    test_expr("round(2.5)", int(3.0));
    test_expr("rint(2.5)", int(2.0));
    test_expr("floor(-1.5)", int(-2.0));
    test_expr("ceil(1.2)", int(2.0));
    expect_fault("round(1.5, 0.5)", FaultKind::Value);
}

#[test]
fn test_math_functions() {
    test_expr("sqrt(16)", double(4.0));
    test_expr("abs(-3)", int(3.0));
    test_expr("abs(-3.5)", double(3.5));
    test_expr("signum(-2.5)", int(-1.0));
    test_expr("log(1)", double(0.0));
    test_expr("ld(8)", double(3.0));
    test_expr("atan2(0, 1)", double(0.0));
}

#[test]
fn test_statistics() {
    test_expr("min(3, 1, 2)", int(1.0));
    test_expr("max(1, 2.5)", double(2.5));
    test_expr("sum(1, 2, 3)", int(6.0));
    test_expr("avg(1, 2)", double(1.5));
    test_missing("max(1, MISSING_NUMERIC)", ExpressionType::Double);
    test_expr("binom(5, 2)", int(10.0));
    expect_fault("binom(-1, 2)", FaultKind::Value);
}

#[test]
fn test_bit_operations() {
    test_expr("bit_and(12, 10)", int(8.0));
    test_expr("bit_or(12, 10)", int(14.0));
    test_expr("bit_xor(12, 10)", int(6.0));
    test_expr("bit_not(0)", int(-1.0));
    expect_fault("bit_or(1.5, 1)", FaultKind::Value);
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_text_functions() {
    test_expr(r#"length("grüße")"#, int(5.0));
    test_expr(r#"upper("abc")"#, text("ABC"));
    test_expr(r#"trim("  x ")"#, text("x"));
    test_expr(r#"index("hello", "l")"#, int(2.0));
    test_expr(r#"compare("a", "b")"#, int(-1.0));
    test_expr(r#"char("abc", 1)"#, text("b"));
    test_expr(r#"cut("colexpr", 3, 4)"#, text("expr"));
    test_expr(r#"replace("a-b-c", "-", "+")"#, text("a+b+c"));
    test_expr(r#"starts("colexpr", "col")"#, boolean(true));
    test_expr(r#"escape_html("<b>")"#, text("&lt;b&gt;"));
    test_missing(r#"upper(MISSING_NOMINAL)"#, ExpressionType::String);
    expect_fault(r#"cut("abc", 1, 5)"#, FaultKind::Value);
    expect_fault(r#"cut("abc", 1e300, 1)"#, FaultKind::Value);
}

#[test]
fn test_concat() {
    test_expr(r#"concat("a", MISSING_NOMINAL, "b")"#, text("ab"));
    test_expr("concat()", text(""));
    test_missing("concat(MISSING_NOMINAL)", ExpressionType::String);
}

#[test]
fn test_regular_expressions() {
    test_expr(r##"replaceAll("a1b22", "[0-9]+", "#")"##, text("a#b#"));
    test_expr(r#"matches("abc", "a.c")"#, boolean(true));
    test_expr(r#"matches("abcd", "a.c")"#, boolean(false));
    test_expr(r#"finds("xabcx", "b")"#, boolean(true));
    expect_fault(r#"finds("abc", "(")"#, FaultKind::Value);
}

#[test]
fn test_conversions() {
    test_expr("str(3)", text("3"));
    test_expr("str(3.0)", text("3.000"));
    test_expr("str(true)", text("true"));
    test_expr(r#"parse(" 2.5 ")"#, double(2.5));
    test_missing(r#"parse("x")"#, ExpressionType::Double);
}

// ============================================================================
// Advanced
// ============================================================================

#[test]
fn test_if() {
    test_expr("if(1 > 2, 1, 2.5)", double(2.5));
    test_expr(r#"if(true, 1, "x")"#, text("1"));
    test_expr("if(0, 1, 2)", int(2.0));
    test_missing("if(MISSING_NUMERIC, 1, 2)", ExpressionType::Integer);
}

#[test]
fn test_missing_function() {
    test_expr("missing(MISSING_DATE)", boolean(true));
    test_expr("missing(MISSING_TIME)", boolean(true));
    test_expr(r#"missing("")"#, boolean(false));
    test_expr("missing(0/0)", boolean(true));
}

#[test]
fn test_eval() {
    test_expr(r#"eval("1+2")"#, int(3.0));
    test_expr(r#"eval("1+2", TYPE_STRING)"#, text("3"));
    test_expr(r#"eval("2.5", TYPE_INTEGER)"#, int(3.0));
    test_missing(r#"eval("\"abc\"", TYPE_DOUBLE)"#, ExpressionType::Double);
    expect_fault(r#"eval("1+")"#, FaultKind::Subexpression);
    expect_fault(r#"eval("1", "real")"#, FaultKind::Value);
}

#[test]
fn test_eval_self_reference_guard() {
    let err = expect_fault(
        r#"eval("4%3 *" + "eval(" + "5/2" + ")")"#,
        FaultKind::Subexpression,
    );
    assert!(err.to_string().contains("eval"));
}

#[test]
fn test_eval_sees_the_same_context() {
    crate::test_utils::init_test_logging();
    let table = Table::new(vec![Column::new("x", ColumnData::Integer(vec![2.0, 5.0]))]).unwrap();
    let context = ContextBuilder::new().with_table(table).build();
    let expr = ExpressionParser::new(context.clone())
        .parse(r#"eval("x * 10")"#)
        .unwrap();
    assert_eq!(expr.expression_type(), ExpressionType::Integer);
    context.set_row_index(1);
    assert_eq!(expr.evaluate_numerical().unwrap(), 50.0);
}

#[test]
fn test_dynamic_eval_needs_a_type() {
    let table = Table::new(vec![Column::new("formula", ColumnData::nominal(["1+1", "2*3"]))]).unwrap();
    let context = ContextBuilder::new().with_table(table).build();
    let parser = ExpressionParser::new(context.clone());
    let err = parser.parse("eval(formula)").unwrap_err();
    assert_eq!(err.kind(), FaultKind::Type);

    let expr = parser.parse("eval(formula, TYPE_INTEGER)").unwrap();
    let values: Vec<f64> = (0..2)
        .map(|row| {
            context.set_row_index(row);
            expr.evaluate_numerical().unwrap()
        })
        .collect();
    assert_eq!(values, [2.0, 6.0]);
}

#[test]
fn test_attribute() {
    let table = Table::new(vec![Column::new("nominal 1", ColumnData::nominal(["a", "b"]))]).unwrap();
    let context = ContextBuilder::new().with_table(table).build();
    let parser = ExpressionParser::new(context.clone());
    let expr = parser.parse(r#"attribute("nominal 1")"#).unwrap();
    assert_eq!(expr.expression_type(), ExpressionType::String);
    context.set_row_index(0);
    assert_eq!(expr.evaluate_nominal().unwrap().as_deref(), Some("a"));

    let err = parser.parse(r#"attribute("nominal 2")"#).unwrap_err();
    assert_eq!(
        err,
        ExpressionError::UnknownIdentifier {
            name: "nominal 2".to_string()
        }
    );
}

#[test]
fn test_macro() {
    let macros = Rc::new(MacroMap::with_predefined(["process_name"]));
    macros.set("threshold", "0.5");
    let context = ContextBuilder::new().with_macros(macros).build();
    let parser = ExpressionParser::new(context);
    let eval = |source: &str| parser.parse(source).and_then(|e| e.evaluate());

    assert_eq!(eval(r#"macro("threshold")"#).unwrap(), text("0.5"));
    assert_eq!(eval(r#"macro("process_name")"#).unwrap(), Value::String(None));
    assert_eq!(eval(r#"macro("process_name", "none")"#).unwrap(), text("none"));
    assert_eq!(eval(r#"macro("unknown", "fallback")"#).unwrap(), text("fallback"));
    assert_eq!(eval("%{threshold}").unwrap(), text("0.5"));
    assert_eq!(eval("#{threshold} * 2").unwrap(), double(1.0));
    assert_eq!(eval(r#"macro("unknown")"#).unwrap_err().kind(), FaultKind::Syntax);
}

// ============================================================================
// Calendar
// ============================================================================

#[test]
fn test_date_functions() {
    test_expr(r#"date_get(date_parse_str("2020-03-01T12:30:00Z"), DATE_UNIT_HOUR)"#, int(12.0));
    test_expr(r#"date_get(date_parse_str("2020-03-01T12:30:00Z"), DATE_UNIT_MONTH)"#, int(2.0));
    test_expr("date_str(date_parse(0))", text("1970-01-01T00:00:00Z"));
    test_expr(r#"date_millis(date_parse_str("1970-01-01T00:00:01Z"))"#, int(1000.0));
    test_expr("date_diff(date_parse(0), date_parse(86400000), DATE_UNIT_DAY)", int(1.0));
    test_expr(
        r#"date_str(date_parse(0), "%Y/%m/%d %H", "en_US", "Asia/Tokyo")"#,
        text("1970/01/01 09"),
    );
    test_expr("date_before(date_parse(0), date_parse(1))", boolean(true));
    test_expr("date_after(date_parse(0), date_parse(1))", boolean(false));
}

#[test]
fn test_nanosecond_diff_in_zone() {
    test_expr(
        r#"date_diff(date_parse(0), date_add(date_parse(0), 1, DATE_UNIT_NANOSECOND), DATE_UNIT_NANOSECOND, "CET")"#,
        int(1.0),
    );
    test_missing(
        r#"date_diff(date_parse(0), date_add(date_parse(0), 1, DATE_UNIT_NANOSECOND), MISSING_NOMINAL, "CET")"#,
        ExpressionType::Integer,
    );
}

#[test]
fn test_calendar_faults() {
    expect_fault(r#"date_add(date_parse(0), 1, "fortnight")"#, FaultKind::Value);
    expect_fault(r#"date_get(date_parse(0), DATE_UNIT_DAY, "Mars/Olympus")"#, FaultKind::Value);
    expect_fault("date_set(date_parse(0), 24, DATE_UNIT_HOUR)", FaultKind::Value);
    expect_fault(r#"date_parse_str("yesterday")"#, FaultKind::Value);
    expect_fault(r#"date_str(date_parse(0), "%Y", "xx_YY")"#, FaultKind::Value);
    expect_fault(r#"time_get(time_parse_str("10:20"), DATE_UNIT_WEEK)"#, FaultKind::Value);
}

#[test]
fn test_date_add_saturates() {
    test_expr(
        "date_add(date_parse(0), INFINITY, DATE_UNIT_DAY) == date_add(date_parse(0), INFINITY, DATE_UNIT_SECOND)",
        boolean(true),
    );
    test_missing("date_add(date_parse(0), 0/0, DATE_UNIT_DAY)", ExpressionType::Instant);
}

#[test]
fn test_time_functions() {
    test_expr(r#"time_str(time_parse_str("08:15"))"#, text("08:15:00"));
    test_expr(r#"time_str(time_add(time_parse_str("23:00"), 2, DATE_UNIT_HOUR))"#, text("01:00:00"));
    test_expr(
        r#"time_diff(time_parse_str("08:00"), time_parse_str("09:30"), DATE_UNIT_MINUTE)"#,
        int(90.0),
    );
    test_expr(r#"time_get(time_parse_str("10:20"), DATE_UNIT_MINUTE)"#, int(20.0));
    test_expr(r#"time_str(time_parse_str("08:15"), "%I:%M %p")"#, text("08:15 AM"));
}

// ============================================================================
// Names and dispatch
// ============================================================================

#[test]
fn test_constants() {
    test_expr("PI", double(core::f64::consts::PI));
    test_expr("DATE_UNIT_DAY", text("day"));
    test_expr("TYPE_LOCAL_TIME", text("local_time"));
    test_expr("TRUE", boolean(true));
}

#[test]
fn test_dispatch_faults() {
    let err = expect_fault("foo(1)", FaultKind::Syntax);
    assert_eq!(err, ExpressionError::UnknownFunction { name: "foo".to_string() });
    let err = expect_fault("round(1, 2, 3)", FaultKind::Type);
    assert_eq!(err, ExpressionError::arity("round", "1 or 2", 3));
    expect_fault("unknown_name + 1", FaultKind::Syntax);
}
