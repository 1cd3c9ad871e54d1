//! Shared foundation for the bomgate workspace.
//!
//! # Module Structure
//!
//! - [`error`]: Error taxonomy (`BomgateError` and domain sub-errors)
//! - [`config`]: `bomgate.toml` parsing, env overrides, validation
//! - [`types`]: Domain types (`Package`, `PackageGraph`, `Ecosystem`,
//!   `SbomFormat`, `SbomDocument`, `ToolRequirement`)
//!
//! Feature crates (`bomgate-sbom`, `bomgate-verify`, `bomgate-enrich`)
//! define their own error enums and convert into [`BomgateError`] at the
//! crate boundary, so the CLI deals with a single error surface.

pub mod config;
pub mod error;
pub mod types;

// --- Public API re-exports ---

// Errors
pub use error::{BomgateError, ConfigError, EnrichError, SbomError, VerifyError};

// Configuration
pub use config::BomgateConfig;

// Domain types
pub use types::{Ecosystem, Package, PackageGraph, SbomDocument, SbomFormat, ToolRequirement};
