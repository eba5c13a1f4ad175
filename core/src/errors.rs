//! Fault taxonomy.
//!
//! Every failure surfaces to the caller as one `ExpressionError`. A missing
//! value is never an error; faults are reserved for malformed input, type
//! mismatches, out-of-domain values and internal defects.

use static_assertions::assert_impl_all;
use thiserror::Error;

pub type Result<T, E = ExpressionError> = core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Malformed expression text.
    #[error("syntax error in line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unknown identifier '{name}'")]
    UnknownIdentifier { name: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("wrong number of arguments for '{function}': expected {expected}, found {found}")]
    Arity {
        function: String,
        expected: String,
        found: usize,
    },

    /// Argument of the wrong static or runtime type.
    #[error("invalid argument type for '{function}': {message}")]
    Type { function: String, message: String },

    /// Argument of the right type but outside the accepted domain.
    #[error("invalid argument value for '{function}': {message}")]
    Value { function: String, message: String },

    /// A nested `eval` failed; `inner` is the original fault.
    #[error("error in sub-expression of '{function}': {inner}")]
    Subexpression {
        function: String,
        inner: Box<ExpressionError>,
    },

    /// Unexpected internal defect, e.g. asking a node for the wrong producer.
    #[error("internal error in {origin}: {message}")]
    Fatal { origin: String, message: String },

    /// The host cancelled the evaluation.
    #[error("evaluation aborted")]
    Aborted,
}

assert_impl_all!(ExpressionError: Send, Sync, Clone, std::error::Error);

/// Coarse classification of an `ExpressionError`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FaultKind {
    Syntax,
    Type,
    Value,
    Subexpression,
    Fatal,
    Aborted,
}

impl ExpressionError {
    pub fn kind(&self) -> FaultKind {
        match self {
            ExpressionError::Syntax { .. }
            | ExpressionError::UnknownIdentifier { .. }
            | ExpressionError::UnknownFunction { .. } => FaultKind::Syntax,
            ExpressionError::Arity { .. } | ExpressionError::Type { .. } => FaultKind::Type,
            ExpressionError::Value { .. } => FaultKind::Value,
            ExpressionError::Subexpression { .. } => FaultKind::Subexpression,
            ExpressionError::Fatal { .. } => FaultKind::Fatal,
            ExpressionError::Aborted => FaultKind::Aborted,
        }
    }

    pub fn type_error(function: &str, message: impl Into<String>) -> Self {
        ExpressionError::Type {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn value_error(function: &str, message: impl Into<String>) -> Self {
        ExpressionError::Value {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn arity(function: &str, expected: impl Into<String>, found: usize) -> Self {
        ExpressionError::Arity {
            function: function.to_string(),
            expected: expected.into(),
            found,
        }
    }

    pub fn fatal(origin: &str, message: impl Into<String>) -> Self {
        ExpressionError::Fatal {
            origin: origin.to_string(),
            message: message.into(),
        }
    }

    /// Wraps a fault raised inside a nested expression.
    ///
    /// Cancellation passes through untouched so hosts can still recognize it.
    pub fn subexpression(function: &str, inner: ExpressionError) -> Self {
        match inner {
            ExpressionError::Aborted => ExpressionError::Aborted,
            inner => ExpressionError::Subexpression {
                function: function.to_string(),
                inner: Box::new(inner),
            },
        }
    }

    /// Source line for syntax faults.
    pub fn line(&self) -> Option<usize> {
        match self {
            ExpressionError::Syntax { line, .. } => Some(*line),
            ExpressionError::Subexpression { inner, .. } => inner.line(),
            _ => None,
        }
    }
}
