//! Enrichment error types.
//!
//! Registry lookup failures are deliberately NOT errors; a component whose
//! supplier cannot be determined is left untouched and the run continues.
//! Errors here are limited to the document itself.

use bomgate_core::error::{BomgateError, EnrichError};

/// Enrichment domain error.
#[derive(Debug, thiserror::Error)]
pub enum SbomEnrichError {
    /// The SBOM file could not be read or written.
    #[error("document io error: {path}: {reason}")]
    DocumentIo {
        /// File path.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// The SBOM file is not valid JSON.
    #[error("document parse error: {path}: {reason}")]
    DocumentParse {
        /// File path.
        path: String,
        /// Parse failure reason.
        reason: String,
    },
}

impl From<SbomEnrichError> for BomgateError {
    fn from(err: SbomEnrichError) -> Self {
        match err {
            SbomEnrichError::DocumentIo { path, reason } => BomgateError::Enrich(
                EnrichError::Document(format!("io error: {path}: {reason}")),
            ),
            SbomEnrichError::DocumentParse { path, reason } => BomgateError::Enrich(
                EnrichError::Document(format!("parse error: {path}: {reason}")),
            ),
        }
    }
}
