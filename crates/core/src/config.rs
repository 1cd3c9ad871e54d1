//! Configuration -- `bomgate.toml` parsing and runtime settings.
//!
//! [`BomgateConfig`] is the top-level structure; each subcommand reads only
//! its own section.
//!
//! # Loading precedence
//! 1. CLI arguments (highest)
//! 2. Environment variables (`BOMGATE_SBOM_OUTPUT_PATH=...` form, plus the
//!    CI-conventional names `SBOM_OUT`, `SBOM_FILE`, `DIFF_BASE`,
//!    `SKIP_SBOM_VERIFY`, `VERBOSE`)
//! 3. Config file (`bomgate.toml`)
//! 4. Defaults (`Default` impls)
//!
//! # Example
//! ```no_run
//! # async fn example() -> Result<(), bomgate_core::error::BomgateError> {
//! use bomgate_core::config::BomgateConfig;
//!
//! // Load from file + apply env overrides
//! let config = BomgateConfig::load("bomgate.toml").await?;
//!
//! // Parse a TOML string directly
//! let config = BomgateConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BomgateError, ConfigError};
use crate::types::ToolRequirement;

/// Top-level bomgate configuration.
///
/// Represents the full `bomgate.toml` structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BomgateConfig {
    /// General settings (logging).
    #[serde(default)]
    pub general: GeneralConfig,
    /// SBOM generation settings.
    #[serde(default)]
    pub sbom: SbomGenConfig,
    /// SBOM verification settings.
    #[serde(default)]
    pub verify: VerifyConfig,
    /// Supplier enrichment settings.
    #[serde(default)]
    pub enrich: EnrichConfig,
    /// External tool prerequisites.
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl BomgateConfig {
    /// Load config from a TOML file and apply env overrides.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BomgateError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file (no env overrides).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, BomgateError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BomgateError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                BomgateError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, BomgateError> {
        toml::from_str(toml_str).map_err(|e| {
            BomgateError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// Apply environment variable overrides.
    ///
    /// Naming rule: `BOMGATE_{SECTION}_{FIELD}`, e.g.
    /// `BOMGATE_VERIFY_DIFF_BASE=origin/main`. The bare CI names the
    /// pipeline scripts already export (`SBOM_OUT`, `SBOM_FILE`,
    /// `DIFF_BASE`, `SKIP_SBOM_VERIFY`, `VERBOSE`) are honored as well and
    /// take precedence over the prefixed forms.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "BOMGATE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "BOMGATE_GENERAL_LOG_FORMAT");

        // SBOM generation
        override_csv(&mut self.sbom.scan_dirs, "BOMGATE_SBOM_SCAN_DIRS");
        override_string(&mut self.sbom.output_path, "BOMGATE_SBOM_OUTPUT_PATH");
        override_string(&mut self.sbom.output_format, "BOMGATE_SBOM_OUTPUT_FORMAT");
        override_usize(&mut self.sbom.max_file_size, "BOMGATE_SBOM_MAX_FILE_SIZE");
        override_usize(&mut self.sbom.max_packages, "BOMGATE_SBOM_MAX_PACKAGES");
        override_string(&mut self.sbom.output_path, "SBOM_OUT");

        // Verification
        override_string(&mut self.verify.sbom_file, "BOMGATE_VERIFY_SBOM_FILE");
        override_string(&mut self.verify.diff_base, "BOMGATE_VERIFY_DIFF_BASE");
        override_usize(
            &mut self.verify.min_size_bytes,
            "BOMGATE_VERIFY_MIN_SIZE_BYTES",
        );
        override_string(&mut self.verify.sbom_file, "SBOM_FILE");
        override_string(&mut self.verify.diff_base, "DIFF_BASE");
        override_flag(&mut self.verify.skip, "SKIP_SBOM_VERIFY");
        override_flag(&mut self.verify.verbose, "VERBOSE");

        // Enrichment
        override_u64(
            &mut self.enrich.request_delay_ms,
            "BOMGATE_ENRICH_REQUEST_DELAY_MS",
        );
        override_u64(&mut self.enrich.timeout_secs, "BOMGATE_ENRICH_TIMEOUT_SECS");
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), BomgateError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        let valid_sbom_formats = ["cyclonedx", "spdx"];
        if !valid_sbom_formats.contains(&self.sbom.output_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "sbom.output_format".to_owned(),
                reason: format!("must be one of: {}", valid_sbom_formats.join(", ")),
            }
            .into());
        }

        if self.sbom.max_file_size == 0 || self.sbom.max_file_size > MAX_FILE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "sbom.max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE}"),
            }
            .into());
        }

        if self.sbom.max_packages == 0 || self.sbom.max_packages > MAX_PACKAGES_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "sbom.max_packages".to_owned(),
                reason: format!("must be 1-{MAX_PACKAGES_LIMIT}"),
            }
            .into());
        }

        if self.sbom.scan_dirs.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sbom.scan_dirs".to_owned(),
                reason: "at least one scan directory required".to_owned(),
            }
            .into());
        }

        // Path traversal check: detect ParentDir components exactly
        for scan_dir in &self.sbom.scan_dirs {
            if scan_dir.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "sbom.scan_dirs".to_owned(),
                    reason: "scan directory path must not be empty".to_owned(),
                }
                .into());
            }

            if Path::new(scan_dir)
                .components()
                .any(|c| c == std::path::Component::ParentDir)
            {
                return Err(ConfigError::InvalidValue {
                    field: "sbom.scan_dirs".to_owned(),
                    reason: format!("scan directory '{scan_dir}' contains path traversal pattern '..'"),
                }
                .into());
            }
        }

        if self.verify.sbom_file.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "verify.sbom_file".to_owned(),
                reason: "sbom_file must not be empty".to_owned(),
            }
            .into());
        }

        if self.verify.diff_base.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "verify.diff_base".to_owned(),
                reason: "diff_base must not be empty".to_owned(),
            }
            .into());
        }

        if self.verify.min_size_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "verify.min_size_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.enrich.request_delay_ms > MAX_REQUEST_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                field: "enrich.request_delay_ms".to_owned(),
                reason: format!("must be 0-{MAX_REQUEST_DELAY_MS}"),
            }
            .into());
        }

        if self.enrich.timeout_secs == 0 || self.enrich.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue {
                field: "enrich.timeout_secs".to_owned(),
                reason: format!("must be 1-{MAX_TIMEOUT_SECS}"),
            }
            .into());
        }

        for tool in &self.tools.required {
            if tool.name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "tools.required".to_owned(),
                    reason: "tool name must not be empty".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Upper bounds for validation.
const MAX_FILE_SIZE: usize = 100 * 1024 * 1024; // 100 MB
const MAX_PACKAGES_LIMIT: usize = 500_000;
const MAX_REQUEST_DELAY_MS: u64 = 60_000;
const MAX_TIMEOUT_SECS: u64 = 300;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// SBOM generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SbomGenConfig {
    /// Directories scanned for lockfiles.
    ///
    /// Note: scanning is non-recursive; only direct children are examined.
    pub scan_dirs: Vec<String>,
    /// Output path for the generated SBOM.
    pub output_path: String,
    /// Output format (cyclonedx, spdx).
    pub output_format: String,
    /// Maximum accepted lockfile size in bytes.
    pub max_file_size: usize,
    /// Maximum accepted package count per lockfile.
    pub max_packages: usize,
}

impl Default for SbomGenConfig {
    fn default() -> Self {
        Self {
            scan_dirs: vec![".".to_owned()],
            output_path: "sbom.json".to_owned(),
            output_format: "cyclonedx".to_owned(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            max_packages: 50_000,
        }
    }
}

/// SBOM verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Path of the SBOM file to verify.
    pub sbom_file: String,
    /// VCS ref the working tree is diffed against.
    pub diff_base: String,
    /// Skip verification entirely (CI escape hatch).
    pub skip: bool,
    /// Emit per-check detail lines.
    pub verbose: bool,
    /// Minimum plausible SBOM size in bytes.
    pub min_size_bytes: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            sbom_file: "sbom.json".to_owned(),
            diff_base: "HEAD".to_owned(),
            skip: false,
            verbose: false,
            min_size_bytes: 128,
        }
    }
}

/// Supplier enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Delay between live registry requests, in milliseconds.
    pub request_delay_ms: u64,
    /// Network timeout for a single registry call, in seconds.
    pub timeout_secs: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 100,
            timeout_secs: 10,
        }
    }
}

/// External tool prerequisites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Tools that must be present on PATH before generation.
    pub required: Vec<ToolRequirement>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            required: vec![ToolRequirement {
                name: "git".to_owned(),
                min_version: None,
            }],
        }
    }
}

// --- env override helpers ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

/// CI flag convention: any non-empty value means "on" (`VERBOSE=1`,
/// `SKIP_SBOM_VERIFY=true`, ...), an empty value means "off".
fn override_flag(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = !val.is_empty();
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env(keys: &[&str]) {
        for key in keys {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    fn default_config_has_sane_values() {
        let config = BomgateConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.sbom.output_path, "sbom.json");
        assert_eq!(config.sbom.output_format, "cyclonedx");
        assert_eq!(config.verify.diff_base, "HEAD");
        assert!(!config.verify.skip);
        assert_eq!(config.enrich.request_delay_ms, 100);
        assert_eq!(config.tools.required.len(), 1);
        assert_eq!(config.tools.required[0].name, "git");
    }

    #[test]
    fn default_config_passes_validation() {
        let config = BomgateConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = BomgateConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.verify.sbom_file, "sbom.json");
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[verify]
diff_base = "origin/main"
"#;
        let config = BomgateConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format keeps its default
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.verify.diff_base, "origin/main");
        assert_eq!(config.verify.min_size_bytes, 128);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "pretty"

[sbom]
scan_dirs = ["src", "web"]
output_path = "artifacts/sbom.json"
output_format = "spdx"
max_file_size = 1048576
max_packages = 1000

[verify]
sbom_file = "artifacts/sbom.json"
diff_base = "origin/master"
min_size_bytes = 256

[enrich]
request_delay_ms = 250
timeout_secs = 5

[[tools.required]]
name = "git"
min_version = "2.30.0"
"#;
        let config = BomgateConfig::parse(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.sbom.scan_dirs, vec!["src", "web"]);
        assert_eq!(config.sbom.output_format, "spdx");
        assert_eq!(config.verify.min_size_bytes, 256);
        assert_eq!(config.enrich.request_delay_ms, 250);
        assert_eq!(
            config.tools.required[0].min_version.as_deref(),
            Some("2.30.0")
        );
    }

    #[test]
    fn parse_malformed_toml_fails() {
        let result = BomgateConfig::parse("[general\nlog_level = \"info\"");
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn env_overrides_apply_ci_names() {
        let keys = [
            "SBOM_OUT",
            "SBOM_FILE",
            "DIFF_BASE",
            "SKIP_SBOM_VERIFY",
            "VERBOSE",
        ];
        unsafe {
            std::env::set_var("SBOM_OUT", "artifacts/sbom.json");
            std::env::set_var("SBOM_FILE", "artifacts/sbom.json");
            std::env::set_var("DIFF_BASE", "origin/main");
            std::env::set_var("SKIP_SBOM_VERIFY", "1");
            std::env::set_var("VERBOSE", "true");
        }

        let mut config = BomgateConfig::default();
        config.apply_env_overrides();
        clear_env(&keys);

        assert_eq!(config.sbom.output_path, "artifacts/sbom.json");
        assert_eq!(config.verify.sbom_file, "artifacts/sbom.json");
        assert_eq!(config.verify.diff_base, "origin/main");
        assert!(config.verify.skip);
        assert!(config.verify.verbose);
    }

    #[test]
    #[serial]
    fn env_overrides_apply_prefixed_forms() {
        let keys = ["BOMGATE_VERIFY_DIFF_BASE", "BOMGATE_SBOM_MAX_FILE_SIZE"];
        unsafe {
            std::env::set_var("BOMGATE_VERIFY_DIFF_BASE", "origin/develop");
            std::env::set_var("BOMGATE_SBOM_MAX_FILE_SIZE", "4096");
        }

        let mut config = BomgateConfig::default();
        config.apply_env_overrides();
        clear_env(&keys);

        assert_eq!(config.verify.diff_base, "origin/develop");
        assert_eq!(config.sbom.max_file_size, 4096);
    }

    #[test]
    #[serial]
    fn ci_names_take_precedence_over_prefixed_forms() {
        let keys = ["BOMGATE_VERIFY_DIFF_BASE", "DIFF_BASE"];
        unsafe {
            std::env::set_var("BOMGATE_VERIFY_DIFF_BASE", "origin/develop");
            std::env::set_var("DIFF_BASE", "origin/main");
        }

        let mut config = BomgateConfig::default();
        config.apply_env_overrides();
        clear_env(&keys);

        assert_eq!(config.verify.diff_base, "origin/main");
    }

    #[test]
    #[serial]
    fn empty_skip_flag_means_off() {
        unsafe { std::env::set_var("SKIP_SBOM_VERIFY", "") };

        let mut config = BomgateConfig::default();
        config.verify.skip = true;
        config.apply_env_overrides();
        clear_env(&["SKIP_SBOM_VERIFY"]);

        assert!(!config.verify.skip);
    }

    #[test]
    #[serial]
    fn unparsable_numeric_env_value_is_ignored() {
        unsafe { std::env::set_var("BOMGATE_SBOM_MAX_FILE_SIZE", "lots") };

        let mut config = BomgateConfig::default();
        config.apply_env_overrides();
        clear_env(&["BOMGATE_SBOM_MAX_FILE_SIZE"]);

        assert_eq!(config.sbom.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn validate_rejects_bad_log_level() {
        let mut config = BomgateConfig::default();
        config.general.log_level = "loud".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_sbom_format() {
        let mut config = BomgateConfig::default();
        config.sbom.output_format = "xml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_max_file_size() {
        let mut config = BomgateConfig::default();
        config.sbom.max_file_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_scan_dirs() {
        let mut config = BomgateConfig::default();
        config.sbom.scan_dirs = vec![];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_path_traversal_in_scan_dirs() {
        let mut config = BomgateConfig::default();
        config.sbom.scan_dirs = vec!["../outside".to_owned()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_diff_base() {
        let mut config = BomgateConfig::default();
        config.verify.diff_base = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_min_size() {
        let mut config = BomgateConfig::default();
        config.verify.min_size_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_request_delay() {
        let mut config = BomgateConfig::default();
        config.enrich.request_delay_ms = 120_000;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn from_file_missing_returns_file_not_found() {
        let result = BomgateConfig::from_file("/nonexistent/bomgate.toml").await;
        assert!(matches!(
            result,
            Err(BomgateError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn from_file_loads_valid_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bomgate.toml");
        tokio::fs::write(&path, "[general]\nlog_level = \"debug\"\n")
            .await
            .unwrap();

        let config = BomgateConfig::from_file(&path).await.unwrap();
        assert_eq!(config.general.log_level, "debug");
    }
}
