//! Text Package
//!
//! Functions: str, parse, cut, concat, replace, replaceAll, lower, upper, trim,
//!            length, index, char, compare, contains, equals, starts, ends,
//!            matches, finds, prefix, suffix, escape_html
//!
//! Positions and lengths count characters, not bytes. A missing argument
//! gives a missing result unless noted otherwise.

use super::{Arity, NativeFunction, Param, all_constant, check_params, constant_value, value_node};
use crate::errors::{ExpressionError, Result};
use crate::evaluator::ExpressionEvaluator;
use crate::types::ExpressionType;
use crate::values::Value;
use regex::Regex;
use std::cmp::Ordering;
use std::rc::Rc;

const GROUP: &str = "text";

fn text(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

fn number(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

/// Node yielding the missing value of `ty` whenever an argument is missing.
fn strict_node(
    ty: ExpressionType,
    args: &[ExpressionEvaluator],
    f: impl Fn(&[Value]) -> Result<Value> + 'static,
) -> ExpressionEvaluator {
    value_node(ty, args, move |v| {
        if v.iter().any(Value::is_missing) {
            Ok(Value::missing(ty))
        } else {
            f(v)
        }
    })
}

fn text_function(
    name: &'static str,
    signature: &'static str,
    params: &'static [Param],
    ty: ExpressionType,
    f: fn(&[Value]) -> Result<Value>,
) -> NativeFunction {
    NativeFunction::new(name, GROUP, signature, Arity::exact(params.len()), move |_, args| {
        check_params(name, args, params)?;
        Ok(strict_node(ty, args, f))
    })
}

fn count(function: &str, what: &str, value: f64) -> Result<usize> {
    if value.fract() != 0.0 || value < 0.0 || !value.is_finite() {
        return Err(ExpressionError::value_error(
            function,
            format!("{what} must be a non-negative whole number, was {value}"),
        ));
    }
    Ok(value as usize)
}

// ============================================================================
// Slicing
// ============================================================================

fn cut(v: &[Value]) -> Result<Value> {
    let source = text(&v[0]);
    let start = count("cut", "start", number(&v[1]))?;
    let length = count("cut", "length", number(&v[2]))?;
    let total = source.chars().count();
    let end = start.saturating_add(length);
    if end > total {
        return Err(ExpressionError::value_error(
            "cut",
            format!("range {start}..{end} is outside of a text of length {total}"),
        ));
    }
    Ok(Value::string(source.chars().skip(start).take(length).collect::<String>()))
}

fn char_at(v: &[Value]) -> Result<Value> {
    let source = text(&v[0]);
    let index = count("char", "index", number(&v[1]))?;
    match source.chars().nth(index) {
        Some(c) => Ok(Value::string(c)),
        None => Err(ExpressionError::value_error(
            "char",
            format!("index {index} is outside of a text of length {}", source.chars().count()),
        )),
    }
}

fn prefix(v: &[Value]) -> Result<Value> {
    let n = count("prefix", "length", number(&v[1]))?;
    Ok(Value::string(text(&v[0]).chars().take(n).collect::<String>()))
}

fn suffix(v: &[Value]) -> Result<Value> {
    let source = text(&v[0]);
    let n = count("suffix", "length", number(&v[1]))?;
    let skip = source.chars().count().saturating_sub(n);
    Ok(Value::string(source.chars().skip(skip).collect::<String>()))
}

fn index_of(v: &[Value]) -> Result<Value> {
    let source = text(&v[0]);
    let position = source
        .find(text(&v[1]))
        .map_or(-1.0, |byte| source[..byte].chars().count() as f64);
    Ok(Value::Integer(position))
}

fn replace(v: &[Value]) -> Result<Value> {
    let search = text(&v[1]);
    if search.is_empty() {
        return Err(ExpressionError::value_error("replace", "search text must not be empty"));
    }
    Ok(Value::string(text(&v[0]).replace(search, text(&v[2]))))
}

pub fn escape_html(source: &str) -> String {
    let mut escaped = String::with_capacity(source.len());
    for c in source.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Regular expressions
// ============================================================================

#[derive(Copy, Clone)]
enum RegexUse {
    /// `matches`: the whole text must match.
    Whole,
    /// `finds`: some substring must match.
    Find,
    /// `replaceAll`: every match is replaced by the third argument.
    Replace,
}

fn compile_regex(function: &str, pattern: &str, usage: RegexUse) -> Result<Regex> {
    let source = match usage {
        RegexUse::Whole => format!("^(?:{pattern})$"),
        RegexUse::Find | RegexUse::Replace => pattern.to_string(),
    };
    Regex::new(&source).map_err(|e| {
        ExpressionError::value_error(function, format!("invalid regular expression '{pattern}': {e}"))
    })
}

/// Builds a regex function; a constant pattern is compiled once up front.
fn regex_function(
    name: &'static str,
    signature: &'static str,
    params: &'static [Param],
    ty: ExpressionType,
    usage: RegexUse,
) -> NativeFunction {
    NativeFunction::new(name, GROUP, signature, Arity::exact(params.len()), move |_, args| {
        check_params(name, args, params)?;
        let fixed = match constant_value(&args[1])? {
            Some(Value::String(Some(pattern))) => Some(Rc::new(compile_regex(name, &pattern, usage)?)),
            _ => None,
        };
        Ok(strict_node(ty, args, move |v| {
            let regex = match &fixed {
                Some(regex) => regex.clone(),
                None => Rc::new(compile_regex(name, text(&v[1]), usage)?),
            };
            let source = text(&v[0]);
            Ok(match usage {
                RegexUse::Whole | RegexUse::Find => Value::Boolean(Some(regex.is_match(source))),
                RegexUse::Replace => Value::string(regex.replace_all(source, text(&v[2]))),
            })
        }))
    })
}

// ============================================================================
// Variadic concatenation
// ============================================================================

fn concat(ctx: &Rc<crate::api::Context>, args: &[ExpressionEvaluator]) -> Result<ExpressionEvaluator> {
    check_params("concat", args, &[Param::Text])?;
    let ctx = ctx.clone();
    let constant = all_constant(args);
    let args = args.to_vec();
    Ok(ExpressionEvaluator::text(constant, move |s| {
        if args.is_empty() {
            return Ok(Some(String::new()));
        }
        let mut joined: Option<String> = None;
        for arg in &args {
            ctx.check_cancelled()?;
            if let Some(part) = arg.text_value(s)? {
                joined.get_or_insert_with(String::new).push_str(&part);
            }
        }
        Ok(joined)
    }))
}

pub fn functions() -> Vec<NativeFunction> {
    use ExpressionType as Ty;
    const TEXT: &[Param] = &[Param::Text];
    const TEXT2: &[Param] = &[Param::Text, Param::Text];
    const TEXT3: &[Param] = &[Param::Text, Param::Text, Param::Text];
    const TEXT_NUM: &[Param] = &[Param::Text, Param::Numeric];
    const TEXT_NUM_NUM: &[Param] = &[Param::Text, Param::Numeric, Param::Numeric];

    vec![
        NativeFunction::new("str", GROUP, "str(value)", Arity::exact(1), |_, args| {
            Ok(value_node(Ty::String, args, |v| Ok(Value::String(v[0].to_text()))))
        }),
        NativeFunction::new("parse", GROUP, "parse(text)", Arity::exact(1), |_, args| {
            check_params("parse", args, TEXT)?;
            Ok(value_node(Ty::Double, args, |v| {
                let parsed = v[0].as_str().and_then(|s| s.trim().parse::<f64>().ok());
                Ok(Value::Double(parsed.unwrap_or(f64::NAN)))
            }))
        }),
        text_function("cut", "cut(text, start, length)", TEXT_NUM_NUM, Ty::String, cut),
        NativeFunction::new("concat", GROUP, "concat(text, ...)", Arity::at_least(0), concat),
        text_function("replace", "replace(text, search, replacement)", TEXT3, Ty::String, replace),
        regex_function("replaceAll", "replaceAll(text, regex, replacement)", TEXT3, Ty::String, RegexUse::Replace),
        text_function("lower", "lower(text)", TEXT, Ty::String, |v| Ok(Value::string(text(&v[0]).to_lowercase()))),
        text_function("upper", "upper(text)", TEXT, Ty::String, |v| Ok(Value::string(text(&v[0]).to_uppercase()))),
        text_function("trim", "trim(text)", TEXT, Ty::String, |v| Ok(Value::string(text(&v[0]).trim()))),
        text_function("length", "length(text)", TEXT, Ty::Integer, |v| {
            Ok(Value::Integer(text(&v[0]).chars().count() as f64))
        }),
        text_function("index", "index(text, search)", TEXT2, Ty::Integer, index_of),
        text_function("char", "char(text, index)", TEXT_NUM, Ty::String, char_at),
        text_function("compare", "compare(a, b)", TEXT2, Ty::Integer, |v| {
            Ok(Value::Integer(match text(&v[0]).cmp(text(&v[1])) {
                Ordering::Less => -1.0,
                Ordering::Equal => 0.0,
                Ordering::Greater => 1.0,
            }))
        }),
        text_function("contains", "contains(text, search)", TEXT2, Ty::Boolean, |v| {
            Ok(Value::Boolean(Some(text(&v[0]).contains(text(&v[1])))))
        }),
        text_function("equals", "equals(a, b)", TEXT2, Ty::Boolean, |v| {
            Ok(Value::Boolean(Some(text(&v[0]) == text(&v[1]))))
        }),
        text_function("starts", "starts(text, prefix)", TEXT2, Ty::Boolean, |v| {
            Ok(Value::Boolean(Some(text(&v[0]).starts_with(text(&v[1])))))
        }),
        text_function("ends", "ends(text, suffix)", TEXT2, Ty::Boolean, |v| {
            Ok(Value::Boolean(Some(text(&v[0]).ends_with(text(&v[1])))))
        }),
        regex_function("matches", "matches(text, regex)", TEXT2, Ty::Boolean, RegexUse::Whole),
        regex_function("finds", "finds(text, regex)", TEXT2, Ty::Boolean, RegexUse::Find),
        text_function("prefix", "prefix(text, length)", TEXT_NUM, Ty::String, prefix),
        text_function("suffix", "suffix(text, length)", TEXT_NUM, Ty::String, suffix),
        text_function("escape_html", "escape_html(text)", TEXT, Ty::String, |v| {
            Ok(Value::string(escape_html(text(&v[0]))))
        }),
    ]
}
