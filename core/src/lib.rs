//! Core of the colexpr expression language.
//!
//! Expressions are parsed once into a tree of typed evaluator nodes and then
//! evaluated row by row. See [`api`] for the entry points.

pub mod api;
pub mod casting;
pub mod errors;
pub mod evaluator;
pub mod parser;
pub mod resolvers;
pub mod stdlib;
pub mod table;
pub mod types;
pub mod values;

pub use errors::{ExpressionError, FaultKind, Result};

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_nested_eval() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
