//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Bomgate -- SBOM generation and verification for CI pipelines.
///
/// Use `bomgate <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "bomgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to the bomgate.toml configuration file.
    #[arg(short, long, default_value = "bomgate.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an SBOM from the project's lockfiles.
    Generate(GenerateArgs),

    /// Verify an existing SBOM against the working tree.
    Verify(VerifyArgs),

    /// Fill in supplier information for SBOM components.
    Enrich(EnrichArgs),

    /// Validate the structure of an SBOM document.
    Validate(ValidateArgs),

    /// Check external tool prerequisites.
    Tools(ToolsArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- generate ----

/// Generate an SBOM from lockfiles found in the configured scan directories.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Override the output path (default: from config, then SBOM_OUT).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the output format (cyclonedx, spdx).
    #[arg(long)]
    pub format: Option<String>,
}

// ---- verify ----

/// Verify an SBOM: presence, structure, freshness, and coverage.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// SBOM file to verify (default: from config, then SBOM_FILE).
    #[arg(long)]
    pub sbom_file: Option<String>,

    /// VCS ref to diff the working tree against (default: HEAD).
    #[arg(long)]
    pub diff_base: Option<String>,

    /// Show per-check detail lines.
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip verification entirely (exit 0).
    #[arg(long)]
    pub skip: bool,
}

// ---- enrich ----

/// Add supplier information to SBOM components.
#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// SBOM file to enrich.
    #[arg(default_value = "sbom.json")]
    pub input: PathBuf,

    /// Write the enriched document here instead of in place.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the delay between registry requests, in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

// ---- validate ----

/// Validate an SBOM document's structure.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// SBOM file to validate.
    #[arg(default_value = "sbom.json")]
    pub file: PathBuf,

    /// Document format (cyclonedx, spdx). Defaults to the configured
    /// output format.
    #[arg(long)]
    pub format: Option<String>,
}

// ---- tools ----

/// Check external tool prerequisites.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    #[command(subcommand)]
    pub action: ToolsAction,
}

#[derive(Subcommand, Debug)]
pub enum ToolsAction {
    /// Report each required tool's presence and version.
    Check,
}

// ---- config ----

/// Manage bomgate configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, sbom, verify, enrich, tools).
        #[arg(long)]
        section: Option<String>,
    },
}
