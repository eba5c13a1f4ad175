//! Per-call evaluation state handed to every producer.

/// Snapshot of the cursor a producer evaluates against.
///
/// The context builds a fresh session for every `evaluate_*` call, so a
/// compiled tree can be replayed across rows by advancing the context's row
/// index only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct EvalSession {
    row: usize,
}

impl EvalSession {
    pub fn new(row: usize) -> Self {
        Self { row }
    }

    /// Session used while folding constants at construction time.
    ///
    /// Constant producers never look at the row.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn row(&self) -> usize {
        self.row
    }
}
