//! Evaluator nodes: the compiled form of one parse-tree node.
//!
//! A node carries its type tag, a constancy flag and exactly one lazily
//! invoked producer. The producer kind always matches the tag: `Integer` and
//! `Double` nodes carry a `Numeric` producer, every other tag its own variant.
//! Constructors are the only way to build a node, which keeps that invariant.

use super::EvalSession;
use crate::errors::{ExpressionError, Result};
use crate::types::ExpressionType;
use crate::values::{Instant, LocalTime, StringList, StringSet, Value};
use std::rc::Rc;
use core::fmt;

pub type Producer<T> = Rc<dyn Fn(&EvalSession) -> Result<T>>;

/// The single producer of a node.
#[derive(Clone)]
pub enum Callback {
    Numeric(Producer<f64>),
    Text(Producer<Option<String>>),
    Boolean(Producer<Option<bool>>),
    Instant(Producer<Option<Instant>>),
    LocalTime(Producer<Option<LocalTime>>),
    StringSet(Producer<Option<StringSet>>),
    StringList(Producer<Option<StringList>>),
}

impl Callback {
    fn kind(&self) -> &'static str {
        match self {
            Callback::Numeric(_) => "numeric",
            Callback::Text(_) => "text",
            Callback::Boolean(_) => "boolean",
            Callback::Instant(_) => "instant",
            Callback::LocalTime(_) => "local time",
            Callback::StringSet(_) => "string set",
            Callback::StringList(_) => "string list",
        }
    }
}

#[derive(Clone)]
pub struct ExpressionEvaluator {
    ty: ExpressionType,
    constant: bool,
    callback: Callback,
}

impl fmt::Debug for ExpressionEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionEvaluator")
            .field("ty", &self.ty)
            .field("constant", &self.constant)
            .field("producer", &self.callback.kind())
            .finish()
    }
}

// ============================================================================
// Construction
// ============================================================================

impl ExpressionEvaluator {
    /// Numeric node. `ty` must be `Integer` or `Double`; anything else is
    /// treated as `Double`.
    pub fn numeric(
        ty: ExpressionType,
        constant: bool,
        producer: impl Fn(&EvalSession) -> Result<f64> + 'static,
    ) -> Self {
        debug_assert!(ty.is_numeric(), "numeric producer for {ty}");
        let ty = if ty.is_numeric() {
            ty
        } else {
            ExpressionType::Double
        };
        Self {
            ty,
            constant,
            callback: Callback::Numeric(Rc::new(producer)),
        }
    }

    pub fn integer(constant: bool, producer: impl Fn(&EvalSession) -> Result<f64> + 'static) -> Self {
        Self::numeric(ExpressionType::Integer, constant, producer)
    }

    pub fn double(constant: bool, producer: impl Fn(&EvalSession) -> Result<f64> + 'static) -> Self {
        Self::numeric(ExpressionType::Double, constant, producer)
    }

    pub fn text(
        constant: bool,
        producer: impl Fn(&EvalSession) -> Result<Option<String>> + 'static,
    ) -> Self {
        Self {
            ty: ExpressionType::String,
            constant,
            callback: Callback::Text(Rc::new(producer)),
        }
    }

    pub fn boolean(
        constant: bool,
        producer: impl Fn(&EvalSession) -> Result<Option<bool>> + 'static,
    ) -> Self {
        Self {
            ty: ExpressionType::Boolean,
            constant,
            callback: Callback::Boolean(Rc::new(producer)),
        }
    }

    pub fn instant(
        constant: bool,
        producer: impl Fn(&EvalSession) -> Result<Option<Instant>> + 'static,
    ) -> Self {
        Self {
            ty: ExpressionType::Instant,
            constant,
            callback: Callback::Instant(Rc::new(producer)),
        }
    }

    pub fn local_time(
        constant: bool,
        producer: impl Fn(&EvalSession) -> Result<Option<LocalTime>> + 'static,
    ) -> Self {
        Self {
            ty: ExpressionType::LocalTime,
            constant,
            callback: Callback::LocalTime(Rc::new(producer)),
        }
    }

    pub fn string_set(
        constant: bool,
        producer: impl Fn(&EvalSession) -> Result<Option<StringSet>> + 'static,
    ) -> Self {
        Self {
            ty: ExpressionType::StringSet,
            constant,
            callback: Callback::StringSet(Rc::new(producer)),
        }
    }

    pub fn string_list(
        constant: bool,
        producer: impl Fn(&EvalSession) -> Result<Option<StringList>> + 'static,
    ) -> Self {
        Self {
            ty: ExpressionType::StringList,
            constant,
            callback: Callback::StringList(Rc::new(producer)),
        }
    }

    /// Constant node yielding `value` on every call.
    pub fn constant(value: Value) -> Self {
        match value {
            Value::Integer(v) => Self::integer(true, move |_| Ok(v)),
            Value::Double(v) => Self::double(true, move |_| Ok(v)),
            Value::String(v) => Self::text(true, move |_| Ok(v.clone())),
            Value::Boolean(v) => Self::boolean(true, move |_| Ok(v)),
            Value::Instant(v) => Self::instant(true, move |_| Ok(v)),
            Value::LocalTime(v) => Self::local_time(true, move |_| Ok(v)),
            Value::StringSet(v) => Self::string_set(true, move |_| Ok(v.clone())),
            Value::StringList(v) => Self::string_list(true, move |_| Ok(v.clone())),
        }
    }

    /// Node of type `ty` backed by a producer of generic `Value`s.
    ///
    /// The produced value must carry the tag `ty`; a mismatch is reported as
    /// a fatal fault on the offending call.
    pub fn from_values(
        ty: ExpressionType,
        constant: bool,
        producer: impl Fn(&EvalSession) -> Result<Value> + 'static,
    ) -> Self {
        fn mismatch(expected: ExpressionType, found: &Value) -> ExpressionError {
            ExpressionError::fatal(
                "evaluator",
                format!("producer declared as {expected} yielded a {} value", found.ty()),
            )
        }

        match ty {
            ExpressionType::Integer | ExpressionType::Double => {
                Self::numeric(ty, constant, move |s| match producer(s)? {
                    Value::Integer(v) | Value::Double(v) => Ok(v),
                    other => Err(mismatch(ty, &other)),
                })
            }
            ExpressionType::String => Self::text(constant, move |s| match producer(s)? {
                Value::String(v) => Ok(v),
                other => Err(mismatch(ty, &other)),
            }),
            ExpressionType::Boolean => Self::boolean(constant, move |s| match producer(s)? {
                Value::Boolean(v) => Ok(v),
                other => Err(mismatch(ty, &other)),
            }),
            ExpressionType::Instant => Self::instant(constant, move |s| match producer(s)? {
                Value::Instant(v) => Ok(v),
                other => Err(mismatch(ty, &other)),
            }),
            ExpressionType::LocalTime => Self::local_time(constant, move |s| match producer(s)? {
                Value::LocalTime(v) => Ok(v),
                other => Err(mismatch(ty, &other)),
            }),
            ExpressionType::StringSet => Self::string_set(constant, move |s| match producer(s)? {
                Value::StringSet(v) => Ok(v),
                other => Err(mismatch(ty, &other)),
            }),
            ExpressionType::StringList => {
                Self::string_list(constant, move |s| match producer(s)? {
                    Value::StringList(v) => Ok(v),
                    other => Err(mismatch(ty, &other)),
                })
            }
        }
    }

    /// Evaluates a constant node once and replaces it with its value.
    ///
    /// Value-dependent faults of constant inputs surface here, at
    /// construction time. Non-constant nodes are returned unchanged.
    pub fn fold(self) -> Result<Self> {
        if !self.constant {
            return Ok(self);
        }
        let value = self.value(&EvalSession::detached())?;
        tracing::trace!(ty = %self.ty, "folded constant node");
        Ok(Self::constant(value))
    }
}

// ============================================================================
// Access
// ============================================================================

impl ExpressionEvaluator {
    pub fn ty(&self) -> ExpressionType {
        self.ty
    }

    pub fn is_constant(&self) -> bool {
        self.constant
    }

    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    fn wrong_producer(&self, requested: &str) -> ExpressionError {
        ExpressionError::fatal(
            "evaluator",
            format!(
                "requested a {requested} producer from a {} node",
                self.ty
            ),
        )
    }

    pub fn numeric_value(&self, session: &EvalSession) -> Result<f64> {
        match &self.callback {
            Callback::Numeric(f) => f(session),
            _ => Err(self.wrong_producer("numeric")),
        }
    }

    pub fn text_value(&self, session: &EvalSession) -> Result<Option<String>> {
        match &self.callback {
            Callback::Text(f) => f(session),
            _ => Err(self.wrong_producer("text")),
        }
    }

    pub fn boolean_value(&self, session: &EvalSession) -> Result<Option<bool>> {
        match &self.callback {
            Callback::Boolean(f) => f(session),
            _ => Err(self.wrong_producer("boolean")),
        }
    }

    pub fn instant_value(&self, session: &EvalSession) -> Result<Option<Instant>> {
        match &self.callback {
            Callback::Instant(f) => f(session),
            _ => Err(self.wrong_producer("instant")),
        }
    }

    pub fn local_time_value(&self, session: &EvalSession) -> Result<Option<LocalTime>> {
        match &self.callback {
            Callback::LocalTime(f) => f(session),
            _ => Err(self.wrong_producer("local time")),
        }
    }

    pub fn string_set_value(&self, session: &EvalSession) -> Result<Option<StringSet>> {
        match &self.callback {
            Callback::StringSet(f) => f(session),
            _ => Err(self.wrong_producer("string set")),
        }
    }

    pub fn string_list_value(&self, session: &EvalSession) -> Result<Option<StringList>> {
        match &self.callback {
            Callback::StringList(f) => f(session),
            _ => Err(self.wrong_producer("string list")),
        }
    }

    /// Evaluates the node into a generic `Value`.
    pub fn value(&self, session: &EvalSession) -> Result<Value> {
        Ok(match &self.callback {
            Callback::Numeric(f) => Value::numeric(self.ty, f(session)?),
            Callback::Text(f) => Value::String(f(session)?),
            Callback::Boolean(f) => Value::Boolean(f(session)?),
            Callback::Instant(f) => Value::Instant(f(session)?),
            Callback::LocalTime(f) => Value::LocalTime(f(session)?),
            Callback::StringSet(f) => Value::StringSet(f(session)?),
            Callback::StringList(f) => Value::StringList(f(session)?),
        })
    }
}
