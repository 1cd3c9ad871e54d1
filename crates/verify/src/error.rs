//! Verification error types.
//!
//! These cover infrastructure failures only. A failed check is not an
//! error; it is a `Fail` outcome in the report.

use bomgate_core::error::{BomgateError, VerifyError};

/// Verification domain error.
#[derive(Debug, thiserror::Error)]
pub enum SbomVerifyError {
    /// The diff provider could not compute changed files.
    #[error("diff error: {0}")]
    Diff(String),

    /// File I/O error outside the checked conditions.
    #[error("io error: {path}: {source}")]
    Io {
        /// Related file path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Background task failure.
    #[error("task error: {0}")]
    Task(String),
}

impl From<SbomVerifyError> for BomgateError {
    fn from(err: SbomVerifyError) -> Self {
        match err {
            SbomVerifyError::Diff(msg) => BomgateError::Verify(VerifyError::DiffFailed(msg)),
            SbomVerifyError::Io { path, source } => BomgateError::Verify(VerifyError::Aborted(
                format!("io error: {path}: {source}"),
            )),
            SbomVerifyError::Task(msg) => BomgateError::Verify(VerifyError::Aborted(msg)),
        }
    }
}
