//! Order runner error types.

use thiserror::Error;

/// Errors a notifier can report.
///
/// These never affect the outcome of a run; callers log them and move on.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Writing the receipt failed.
    #[error("receipt write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the report failed.
    #[error("receipt serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
