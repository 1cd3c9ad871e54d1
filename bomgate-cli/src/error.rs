//! CLI-specific error types and exit code mapping

use bomgate_core::error::BomgateError;
use bomgate_enrich::SbomEnrichError;
use bomgate_sbom::SbomGenError;
use bomgate_verify::SbomVerifyError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Verification ran and at least one check failed.
    #[error("verification failed: {0}")]
    Verification(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from bomgate-core.
    #[error("{0}")]
    Core(#[from] BomgateError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                           |
    /// |------|-----------------------------------|
    /// | 0    | Success                           |
    /// | 1    | General / command error           |
    /// | 2    | Configuration error               |
    /// | 4    | Verification checks failed        |
    /// | 10   | IO error                          |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Verification(_) => 4,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<SbomGenError> for CliError {
    fn from(e: SbomGenError) -> Self {
        match e {
            SbomGenError::Config { .. } => Self::Config(e.to_string()),
            SbomGenError::Io { .. } => Self::Io(std::io::Error::other(e.to_string())),
            _ => Self::Command(e.to_string()),
        }
    }
}

impl From<SbomVerifyError> for CliError {
    fn from(e: SbomVerifyError) -> Self {
        match e {
            SbomVerifyError::Io { .. } => Self::Io(std::io::Error::other(e.to_string())),
            _ => Self::Command(e.to_string()),
        }
    }
}

impl From<SbomEnrichError> for CliError {
    fn from(e: SbomEnrichError) -> Self {
        match e {
            SbomEnrichError::DocumentIo { .. } => Self::Io(std::io::Error::other(e.to_string())),
            SbomEnrichError::DocumentParse { .. } => Self::Command(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_verification_error() {
        let err = CliError::Verification("1 of 6 checks failed".to_owned());
        assert_eq!(
            err.exit_code(),
            4,
            "verification failure should return exit code 4"
        );
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(
            err.exit_code(),
            1,
            "command error should return exit code 1"
        );
    }

    #[test]
    fn test_exit_code_json_serialize_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid json")
            .expect_err("should fail parsing");
        let err = CliError::JsonSerialize(json_err);
        assert_eq!(
            err.exit_code(),
            1,
            "json serialize error should return exit code 1"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = format!("{}", err);
        assert!(
            display_str.contains("configuration error"),
            "should include error context"
        );
        assert!(
            display_str.contains("invalid TOML syntax"),
            "should include error message"
        );
    }

    #[test]
    fn test_error_display_command() {
        let err = CliError::Command("execution failed".to_owned());
        assert_eq!(format!("{}", err), "execution failed");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let cli_err: CliError = io_err.into();
        match cli_err {
            CliError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied);
            }
            _ => panic!("expected Io error variant"),
        }
    }

    #[test]
    fn test_from_core_error() {
        use bomgate_core::error::ConfigError;
        let config_err = ConfigError::FileNotFound {
            path: "test.toml".to_owned(),
        };
        let core_err = BomgateError::Config(config_err);
        let cli_err: CliError = core_err.into();
        match cli_err {
            CliError::Core(_) => {}
            _ => panic!("expected Core error variant"),
        }
    }

    #[test]
    fn test_from_generation_config_error() {
        let err = SbomGenError::Config {
            field: "sbom.output_format".to_owned(),
            reason: "unknown format".to_owned(),
        };
        let cli_err: CliError = err.into();
        assert_eq!(cli_err.exit_code(), 2, "config-class errors map to 2");
    }
}
