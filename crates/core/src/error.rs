//! Error types -- per-domain error definitions.

/// Top-level bomgate error type.
#[derive(Debug, thiserror::Error)]
pub enum BomgateError {
    /// Configuration loading or validation error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// SBOM parsing, generation, or validation error.
    #[error("sbom error: {0}")]
    Sbom(#[from] SbomError),

    /// SBOM verification error.
    #[error("verify error: {0}")]
    Verify(#[from] VerifyError),

    /// Supplier enrichment error.
    #[error("enrich error: {0}")]
    Enrich(#[from] EnrichError),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// TOML parse failure.
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// A field holds an out-of-range or malformed value.
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// SBOM domain errors.
#[derive(Debug, thiserror::Error)]
pub enum SbomError {
    /// Lockfile or document parse failure.
    #[error("parse failed: {0}")]
    ParseFailed(String),

    /// Document generation failure.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// Structural validation failure.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// External tool prerequisite failure.
    #[error("tooling: {0}")]
    Tooling(String),
}

/// Verification errors.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The diff provider could not compute changed files.
    #[error("diff failed: {0}")]
    DiffFailed(String),

    /// The verification run itself could not complete.
    #[error("verification aborted: {0}")]
    Aborted(String),
}

/// Enrichment errors.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// Registry lookup infrastructure failure.
    #[error("registry: {0}")]
    Registry(String),

    /// The SBOM document could not be read or written.
    #[error("document: {0}")]
    Document(String),
}
