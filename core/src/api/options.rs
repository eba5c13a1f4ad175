//! Configuration options for a context.

use chrono_tz::Tz;

/// Configuration options for a [`Context`](super::Context).
///
/// # Example
///
/// ```
/// use colexpr_core::api::ContextOptions;
///
/// let options = ContextOptions {
///     max_nesting_depth: 100,
///     default_time_zone: chrono_tz::Europe::Berlin,
///     ..ContextOptions::default()
/// };
/// assert_eq!(options.max_subexpression_depth, 8);
/// ```
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Maximum parenthesis and tree nesting of one expression.
    ///
    /// Deeper expressions are rejected with a syntax fault.
    ///
    /// Default: 500
    pub max_nesting_depth: usize,

    /// Maximum number of `eval` or `#{...}` re-parses active at once.
    ///
    /// Default: 8
    pub max_subexpression_depth: usize,

    /// Zone used by calendar functions called without a zone argument.
    ///
    /// Default: UTC
    pub default_time_zone: Tz,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: crate::parser::parser::DEFAULT_MAX_DEPTH,
            max_subexpression_depth: 8,
            default_time_zone: chrono_tz::UTC,
        }
    }
}
