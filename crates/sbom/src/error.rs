//! SBOM generation error types.
//!
//! [`SbomGenError`] covers everything that can go wrong between lockfile
//! discovery and the written SBOM file. `From<SbomGenError> for
//! BomgateError` lets the CLI propagate with `?` into the single top-level
//! error surface.
//!
//! # Error categories
//!
//! - **Lockfile parsing**: `LockfileParse`
//! - **Document generation**: `Generation`
//! - **Structural validation**: `Validation`
//! - **Tool prerequisites**: `Tool`
//! - **Configuration**: `Config`
//! - **File I/O**: `Io`, `FileTooBig`

use bomgate_core::error::{BomgateError, SbomError};

/// SBOM generation domain error.
#[derive(Debug, thiserror::Error)]
pub enum SbomGenError {
    /// Lockfile parse failure.
    #[error("lockfile parse error: {path}: {reason}")]
    LockfileParse {
        /// Path of the lockfile being parsed.
        path: String,
        /// Parse failure reason.
        reason: String,
    },

    /// SBOM document generation failure.
    #[error("sbom generation error: {0}")]
    Generation(String),

    /// Generated document failed structural validation.
    #[error("sbom validation error: {0}")]
    Validation(String),

    /// A required external tool is missing or too old.
    #[error("tool check failed: {name}: {reason}")]
    Tool {
        /// Executable name.
        name: String,
        /// What went wrong (not found, version too old, unparsable output).
        reason: String,
    },

    /// Configuration error.
    #[error("config error: {field}: {reason}")]
    Config {
        /// Config field name.
        field: String,
        /// Error reason.
        reason: String,
    },

    /// File I/O error.
    #[error("io error: {path}: {source}")]
    Io {
        /// Related file path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file too large: {path}: {size} bytes (max: {max})")]
    FileTooBig {
        /// File path.
        path: String,
        /// Actual size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max: usize,
    },

    /// Background task failure.
    #[error("task error: {0}")]
    Task(String),
}

impl From<SbomGenError> for BomgateError {
    fn from(err: SbomGenError) -> Self {
        match err {
            SbomGenError::LockfileParse { path, reason } => BomgateError::Sbom(
                SbomError::ParseFailed(format!("lockfile parse error: {path}: {reason}")),
            ),
            SbomGenError::Generation(msg) => {
                BomgateError::Sbom(SbomError::GenerationFailed(msg))
            }
            SbomGenError::Validation(msg) => {
                BomgateError::Sbom(SbomError::ValidationFailed(msg))
            }
            SbomGenError::Tool { name, reason } => {
                BomgateError::Sbom(SbomError::Tooling(format!("{name}: {reason}")))
            }
            SbomGenError::Config { field, reason } => BomgateError::Sbom(
                SbomError::GenerationFailed(format!("config error: {field}: {reason}")),
            ),
            SbomGenError::Io { path, source } => BomgateError::Sbom(SbomError::GenerationFailed(
                format!("io error: {path}: {source}"),
            )),
            SbomGenError::FileTooBig { path, size, max } => {
                BomgateError::Sbom(SbomError::GenerationFailed(format!(
                    "file too large: {path}: {size} bytes (max: {max})"
                )))
            }
            SbomGenError::Task(msg) => BomgateError::Sbom(SbomError::GenerationFailed(msg)),
        }
    }
}
