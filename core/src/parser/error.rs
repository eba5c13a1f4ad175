use crate::errors::ExpressionError;
use crate::parser::Rule;
use pest::error::{ErrorVariant, LineColLocation};

/// Convert a pest error into a syntax fault with a 1-based line and column.
pub fn convert_pest_error(err: pest::error::Error<Rule>) -> ExpressionError {
    let (line, column) = match err.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };

    let message = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => {
            let expected = format_expected_rules(&positives);
            if negatives.is_empty() {
                format!("expected {expected}")
            } else {
                format!("expected {expected}, found {}", format_found_rules(&negatives))
            }
        }
        ErrorVariant::CustomError { message } => message,
    };

    ExpressionError::Syntax {
        line,
        column,
        message,
    }
}

/// Syntax fault for parentheses nested deeper than `max_depth`, positioned
/// at the byte `offset` of the offending parenthesis.
pub fn nesting_error(source: &str, offset: usize, max_depth: usize) -> ExpressionError {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map(|l| l.chars().count())
        .unwrap_or(0)
        + 1;
    ExpressionError::Syntax {
        line,
        column,
        message: format!("expression nesting depth exceeds maximum of {max_depth} levels"),
    }
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "something else".to_string();
    }

    // Group related rules into higher-level concepts
    let mut concepts: Vec<&'static str> = Vec::new();
    let mut note = |concept: &'static str| {
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    };

    for rule in rules {
        match rule {
            Rule::integer | Rule::float | Rule::string => note("literal"),
            Rule::ident | Rule::call => note("identifier"),
            Rule::attribute | Rule::scope | Rule::macro_expr => note("reference"),
            Rule::or
            | Rule::and
            | Rule::eq
            | Rule::ne
            | Rule::lt
            | Rule::le
            | Rule::gt
            | Rule::ge
            | Rule::add
            | Rule::sub
            | Rule::mul
            | Rule::div
            | Rule::rem
            | Rule::pow => note("operator"),
            Rule::EOI => note("end of input"),
            _ => note("expression"),
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Format found rules in a human-readable way
fn format_found_rules(rules: &[Rule]) -> String {
    match rules.first() {
        None => "unexpected token".to_string(),
        Some(Rule::ident) => "identifier".to_string(),
        Some(Rule::integer) => "integer".to_string(),
        Some(Rule::float) => "floating-point number".to_string(),
        Some(Rule::string) => "string".to_string(),
        Some(Rule::EOI) => "end of input".to_string(),
        Some(rule) => format!("{rule:?}"),
    }
}
