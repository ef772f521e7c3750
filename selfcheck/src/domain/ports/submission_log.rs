//! Driven port for the per-run outcome log.

/// Append-only sink for human-readable run outcomes.
///
/// Write failures are the sink's own problem: a broken log must not abort a
/// batch, so the methods do not return errors.
#[cfg_attr(test, mockall::automock)]
pub trait SubmissionLog: Send + Sync {
    /// Record progress or a successful outcome.
    fn info(&self, text: &str);

    /// Record a failed outcome.
    fn error(&self, text: &str);
}
