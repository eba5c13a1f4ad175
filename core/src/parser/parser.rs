use crate::errors::{ExpressionError, Result};
use crate::parser::error::{convert_pest_error, nesting_error};
use crate::parser::{BinaryOp, Expr, Literal, UnaryOp};
use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

/// Nesting limit used by [`parse`].
pub const DEFAULT_MAX_DEPTH: usize = 500;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::or, Assoc::Left))            // `||`
        .op(Op::infix(Rule::and, Assoc::Left))           // `&&`
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left)
        )                                                // `==`, `!=`
        .op(
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left)
        )                                                // `<`, `<=`, `>`, `>=`
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::rem, Assoc::Left)
        )                                                // `*`, `/`, `%`
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::plus) | Op::prefix(Rule::not))
        .op(Op::infix(Rule::pow, Assoc::Right))          // `^` (right-assoc)
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionGrammar;

type PestResult<T> = core::result::Result<T, pest::error::Error<Rule>>;

fn custom_error(message: impl Into<String>, span: pest::Span<'_>) -> pest::error::Error<Rule> {
    pest::error::Error::new_from_span(
        pest::error::ErrorVariant::CustomError {
            message: message.into(),
        },
        span,
    )
}

fn first_inner<'i>(pair: Pair<'i, Rule>) -> PestResult<Pair<'i, Rule>> {
    let span = pair.as_span();
    pair.into_inner()
        .next()
        .ok_or_else(|| custom_error("missing expected pair in rule", span))
}

pub fn parse_expr(pair: Pair<Rule>) -> PestResult<Expr> {
    match pair.as_rule() {
        Rule::main | Rule::grouped => parse_expr(first_inner(pair)?),

        Rule::expression => PRATT_PARSER
            .map_primary(parse_expr)
            .map_prefix(|op, rhs| {
                let op = match op.as_rule() {
                    Rule::neg => UnaryOp::Neg,
                    Rule::plus => UnaryOp::Plus,
                    Rule::not => UnaryOp::Not,
                    rule => return Err(custom_error(format!("unknown prefix operator {rule:?}"), op.as_span())),
                };
                Ok(Expr::Unary {
                    op,
                    expr: Box::new(rhs?),
                })
            })
            .map_infix(|lhs, op, rhs| {
                let op = match op.as_rule() {
                    Rule::or => BinaryOp::Or,
                    Rule::and => BinaryOp::And,
                    Rule::eq => BinaryOp::Eq,
                    Rule::ne => BinaryOp::Ne,
                    Rule::lt => BinaryOp::Lt,
                    Rule::le => BinaryOp::Le,
                    Rule::gt => BinaryOp::Gt,
                    Rule::ge => BinaryOp::Ge,
                    Rule::add => BinaryOp::Add,
                    Rule::sub => BinaryOp::Sub,
                    Rule::mul => BinaryOp::Mul,
                    Rule::div => BinaryOp::Div,
                    Rule::rem => BinaryOp::Rem,
                    Rule::pow => BinaryOp::Pow,
                    rule => return Err(custom_error(format!("unknown binary operator {rule:?}"), op.as_span())),
                };
                Ok(Expr::Binary {
                    op,
                    left: Box::new(lhs?),
                    right: Box::new(rhs?),
                })
            })
            .parse(pair.into_inner()),

        Rule::call => {
            let mut inner = pair.into_inner();
            let name = inner
                .next()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default();
            let args = inner.map(parse_expr).collect::<PestResult<_>>()?;
            Ok(Expr::Call { name, args })
        }

        Rule::integer => {
            let value = pair
                .as_str()
                .parse::<f64>()
                .map_err(|_| custom_error("invalid integer literal", pair.as_span()))?;
            Ok(Expr::Literal(Literal::Integer(value)))
        }

        Rule::float => {
            let value = pair
                .as_str()
                .parse::<f64>()
                .map_err(|_| custom_error("invalid number literal", pair.as_span()))?;
            Ok(Expr::Literal(Literal::Double(value)))
        }

        Rule::string => {
            let inner = first_inner(pair)?;
            let text = unescape(inner.as_str())
                .map_err(|message| custom_error(message, inner.as_span()))?;
            Ok(Expr::Literal(Literal::Str(text)))
        }

        Rule::attribute => {
            let inner = first_inner(pair)?;
            let name = unescape(inner.as_str())
                .map_err(|message| custom_error(message, inner.as_span()))?;
            Ok(Expr::Attribute(name))
        }

        Rule::scope => Ok(Expr::Scope(first_inner(pair)?.as_str().to_string())),

        Rule::macro_expr => Ok(Expr::Macro(first_inner(pair)?.as_str().to_string())),

        Rule::ident => Ok(Expr::Ident(pair.as_str().to_string())),

        _ => Err(custom_error(
            format!("Unhandled rule: {:?}", pair.as_rule()),
            pair.as_span(),
        )),
    }
}

/// Resolves backslash escapes of string literals and bracketed names.
fn unescape(raw: &str) -> core::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid unicode escape '\\u{hex}'"))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => return Err("dangling escape at end of literal".to_string()),
        }
    }
    Ok(out)
}

/// Operator and nesting budget of one parenthesised level.
#[derive(Default)]
struct Level {
    /// Operators in the current argument.
    ops: usize,
    /// Deepest nested level seen in the current argument.
    child: usize,
    /// Deepest finished argument.
    best: usize,
}

impl Level {
    fn argument_bound(&self) -> usize {
        self.ops + self.child.max(1)
    }
}

/// Rejects sources whose tree would nest deeper than `max_depth` before the
/// recursive descent runs.
///
/// Every prefix or binary operator can add one level to the tree, so a flat
/// run of operators is bounded the same way as nested parentheses.
fn check_nesting(source: &str, max_depth: usize) -> Result<()> {
    let bytes = source.as_bytes();
    let mut levels = vec![Level::default()];
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let offset = i;
        i += 1;
        match c {
            b'"' => i = skip_delimited(bytes, i, b'"'),
            b'[' => i = skip_delimited(bytes, i, b']'),
            b'%' | b'#' if bytes.get(i) == Some(&b'{') => i = skip_delimited(bytes, i + 1, b'}'),
            b'(' => {
                if levels.len() > max_depth {
                    return Err(nesting_error(source, offset, max_depth));
                }
                levels.push(Level::default());
            }
            b',' => {
                if let Some(level) = levels.last_mut() {
                    level.best = level.best.max(level.argument_bound());
                    level.ops = 0;
                    level.child = 0;
                }
            }
            b')' => {
                if levels.len() > 1 {
                    if let Some(closed) = levels.pop() {
                        let depth = 1 + closed.best.max(closed.argument_bound());
                        if let Some(parent) = levels.last_mut() {
                            parent.child = parent.child.max(depth);
                            if parent.argument_bound() > max_depth {
                                return Err(nesting_error(source, offset, max_depth));
                            }
                        }
                    }
                }
            }
            b'+' | b'-' if is_exponent_sign(bytes, offset) => {}
            b'|' | b'&' | b'=' | b'!' | b'<' | b'>' | b'+' | b'-' | b'*' | b'/' | b'%'
            | b'^' => {
                let pair = matches!(
                    (c, bytes.get(i)),
                    (b'|', Some(b'|'))
                        | (b'&', Some(b'&'))
                        | (b'=' | b'!' | b'<' | b'>', Some(b'='))
                );
                if pair {
                    i += 1;
                }
                if let Some(level) = levels.last_mut() {
                    level.ops += 1;
                    if level.argument_bound() > max_depth {
                        return Err(nesting_error(source, offset, max_depth));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Index just past the `close` byte that ends a literal starting at `from`.
fn skip_delimited(bytes: &[u8], mut from: usize, close: u8) -> usize {
    while from < bytes.len() {
        match bytes[from] {
            b'\\' => from += 2,
            b if b == close => return from + 1,
            _ => from += 1,
        }
    }
    from
}

/// `1e-5`: the sign belongs to the number, not to an operator.
fn is_exponent_sign(bytes: &[u8], offset: usize) -> bool {
    offset >= 2
        && matches!(bytes[offset - 1], b'e' | b'E')
        && (bytes[offset - 2].is_ascii_digit() || bytes[offset - 2] == b'.')
}

/// Parses `source` with the default nesting limit.
pub fn parse(source: &str) -> Result<Expr> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Expr> {
    check_nesting(source, max_depth)?;
    let expr = ExpressionGrammar::parse(Rule::main, source)
        .and_then(|mut pairs| {
            let pair = pairs.next().ok_or_else(|| {
                pest::error::Error::new_from_pos(
                    pest::error::ErrorVariant::CustomError {
                        message: "missing expected pair in rule".to_string(),
                    },
                    pest::Position::from_start(source),
                )
            })?;
            parse_expr(pair)
        })
        .map_err(convert_pest_error)?;
    if expr.depth() > max_depth {
        return Err(ExpressionError::Syntax {
            line: 1,
            column: 1,
            message: format!("expression nesting depth exceeds maximum of {max_depth} levels"),
        });
    }
    tracing::trace!(source, "parsed expression");
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(v: f64) -> Box<Expr> {
        Box::new(Expr::Literal(Literal::Integer(v)))
    }

    #[test]
    fn test_simple_binary_expr() {
        assert_eq!(
            parse("1 + 2").unwrap(),
            Expr::Binary {
                op: BinaryOp::Add,
                left: int(1.0),
                right: int(2.0),
            }
        );
    }

    #[test]
    fn test_function_call() {
        assert_eq!(
            parse("round(x, 2)").unwrap(),
            Expr::Call {
                name: "round".to_string(),
                args: vec![Expr::Ident("x".to_string()), Expr::Literal(Literal::Integer(2.0))],
            }
        );
        assert_eq!(
            parse("date_now()").unwrap(),
            Expr::Call {
                name: "date_now".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_references() {
        assert_eq!(
            parse("[nominal 1]").unwrap(),
            Expr::Attribute("nominal 1".to_string())
        );
        assert_eq!(
            parse("[a\\]b]").unwrap(),
            Expr::Attribute("a]b".to_string())
        );
        assert_eq!(parse("%{process_name}").unwrap(), Expr::Scope("process_name".to_string()));
        assert_eq!(parse("#{threshold}").unwrap(), Expr::Macro("threshold".to_string()));
    }

    #[test]
    fn test_modulo_is_not_a_scope_reference() {
        assert_eq!(
            parse("4%3").unwrap(),
            Expr::Binary {
                op: BinaryOp::Rem,
                left: int(4.0),
                right: int(3.0),
            }
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            parse(r#""a\"b\nA""#).unwrap(),
            Expr::Literal(Literal::Str("a\"b\nA".to_string()))
        );
        assert!(parse(r#""\u00zz""#).is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert!(parse_with_max_depth(&source, 25).is_ok());
        let err = parse_with_max_depth(&source, 10).unwrap_err();
        assert!(matches!(err, ExpressionError::Syntax { column: 11, .. }), "{err:?}");
        // Parentheses inside string literals do not count.
        assert!(parse_with_max_depth("\"((((((\"", 2).is_ok());
    }

    #[test]
    fn test_long_operator_runs_hit_the_nesting_limit() {
        let negations = format!("{}1", "-".repeat(200_000));
        assert!(matches!(parse(&negations), Err(ExpressionError::Syntax { .. })));

        let sum = vec!["1"; 200_000].join("+");
        assert!(matches!(parse(&sum), Err(ExpressionError::Syntax { .. })));

        let powers = vec!["2"; 200_000].join("^");
        assert!(matches!(parse(&powers), Err(ExpressionError::Syntax { .. })));

        let short = vec!["1"; 10].join(" <= ");
        assert_eq!(parse_with_max_depth(&short, 10).unwrap().depth(), 10);
        let err = parse_with_max_depth(&format!("--{short}"), 10).unwrap_err();
        assert!(matches!(err, ExpressionError::Syntax { column: 40, .. }), "{err:?}");
    }

    #[test]
    fn test_operator_budget_ignores_literals() {
        assert!(parse_with_max_depth("1e-5 + 2.5E+3", 2).is_ok());
        assert!(parse_with_max_depth(r#""+-*/" + [a-b] + %{x-y}"#, 3).is_ok());
        assert!(parse_with_max_depth("f(1 + 2, 3 + 4)", 3).is_ok());
        assert!(parse_with_max_depth("f(1 + 2 + 3)", 3).is_err());
    }

    #[test]
    fn test_syntax_error_position() {
        let err = parse("1 +\n  * 2").unwrap_err();
        match err {
            ExpressionError::Syntax { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, 3);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
