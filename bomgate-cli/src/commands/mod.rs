//! Command handlers -- one module per subcommand

use std::path::Path;

use bomgate_core::config::BomgateConfig;
use bomgate_core::error::{BomgateError, ConfigError};

use crate::error::CliError;

pub mod config;
pub mod enrich;
pub mod generate;
pub mod tools;
pub mod validate;
pub mod verify;

/// Load configuration for a command.
///
/// A missing config file is not an error: CI environments often drive
/// bomgate purely through environment variables. Defaults plus env
/// overrides apply in that case. Any other load failure is fatal.
pub(crate) async fn load_config(path: &Path) -> Result<BomgateConfig, CliError> {
    match BomgateConfig::load(path).await {
        Err(BomgateError::Config(ConfigError::FileNotFound { .. })) => {
            let mut config = BomgateConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
        other => Ok(other?),
    }
}
