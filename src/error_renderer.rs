//! Error rendering using ariadne
//!
//! Syntax faults are labelled at their line and column. Every other fault
//! belongs to the expression as a whole and is labelled across the full
//! source text.

use crate::{ExpressionError, FaultKind};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;
use std::ops::Range;

const SOURCE_ID: &str = "<expression>";

/// Render an error with formatting to stderr
pub fn render_error(source: &str, error: &ExpressionError) {
    render_error_to_writer(source, error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(
    source: &str,
    error: &ExpressionError,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    render_error_to_writer(source, error, writer, true)
}

/// Render an error to a String (useful for logs, UIs, etc.)
///
/// # Example
/// ```
/// use colexpr::{ContextBuilder, ExpressionParser, render_error_to_string_no_color};
///
/// let source = "1 + * 2";
/// let parser = ExpressionParser::new(ContextBuilder::new().build());
/// let err = parser.parse(source).unwrap_err();
/// let formatted = render_error_to_string_no_color(source, &err);
/// assert!(formatted.contains("1 + * 2"));
/// ```
pub fn render_error_to_string(source: &str, error: &ExpressionError) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Same as [`render_error_to_string`] without ANSI color codes.
pub fn render_error_to_string_no_color(source: &str, error: &ExpressionError) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn kind_code(kind: FaultKind) -> &'static str {
    match kind {
        FaultKind::Syntax => "syntax",
        FaultKind::Type => "type",
        FaultKind::Value => "value",
        FaultKind::Subexpression => "subexpression",
        FaultKind::Fatal => "fatal",
        FaultKind::Aborted => "aborted",
    }
}

/// Character offset of a 1-based line and column, clamped to the source.
fn char_offset(source: &str, line: usize, column: usize) -> usize {
    let total = source.chars().count();
    let mut offset = 0;
    for (index, text) in source.split('\n').enumerate() {
        if index + 1 == line {
            return (offset + column.saturating_sub(1)).min(total);
        }
        offset += text.chars().count() + 1;
    }
    total
}

fn error_span(source: &str, error: &ExpressionError) -> Range<usize> {
    match error {
        ExpressionError::Syntax { line, column, .. } => {
            let start = char_offset(source, *line, *column);
            let end = (start + 1).min(source.chars().count());
            start..end.max(start)
        }
        _ => 0..source.chars().count(),
    }
}

fn label_message(error: &ExpressionError) -> String {
    match error {
        ExpressionError::Syntax { message, .. } => message.clone(),
        ExpressionError::Subexpression { inner, .. } => inner.to_string(),
        other => other.to_string(),
    }
}

fn render_error_to_writer(
    source: &str,
    error: &ExpressionError,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    if source.is_empty() {
        return writeln!(writer, "Error: {error}");
    }

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let span = error_span(source, error);
    let mut report = Report::build(ReportKind::Error, (SOURCE_ID, span.clone()))
        .with_code(kind_code(error.kind()))
        .with_message(error.to_string())
        .with_config(ariadne::Config::default().with_color(use_color));

    report = report.with_label(
        Label::new((SOURCE_ID, span))
            .with_message(label_message(error))
            .with_color(colors.next()),
    );

    match error {
        ExpressionError::UnknownIdentifier { .. } => {
            report = report.with_help("write column names that are not identifiers as [name]");
        }
        ExpressionError::Aborted => {
            report = report.with_note("the host cancelled the evaluation");
        }
        _ => {}
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}
