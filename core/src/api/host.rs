//! The host job a context runs inside.

/// Services of the surrounding job.
///
/// Supplying a host adds `rand` and `param` to the function table and makes
/// [`Context::check_cancelled`](super::Context::check_cancelled) poll
/// [`HostJob::is_cancelled`]. Without a host both functions are absent and
/// cancellation checks never fire.
pub trait HostJob {
    /// Current value of `parameter` on the upstream step `operator`.
    ///
    /// `None` if either name is unknown.
    fn parameter(&self, operator: &str, parameter: &str) -> Option<String>;

    /// Seed for `rand()` calls without an explicit seed.
    fn random_seed(&self) -> u64 {
        2001
    }

    fn is_cancelled(&self) -> bool {
        false
    }
}
