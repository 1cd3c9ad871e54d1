//! SBOM generation for the bomgate workspace.
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`SbomGenError`)
//! - [`parser`]: Lockfile parsers (`LockfileParser` trait, `CargoLockParser`,
//!   `NpmLockParser`, `PipRequirementsParser`)
//! - [`discover`]: Non-recursive lockfile discovery
//! - [`document`]: SBOM document writers (`SbomGenerator`, CycloneDX, SPDX)
//! - [`validate`]: Structural document validation (`ValidationReport`)
//! - [`tools`]: External tool prerequisite checks (`ToolStatus`)
//! - [`pipeline`]: End-to-end generation (`SbomPipeline`, builder)
//!
//! # Architecture
//!
//! ```text
//! [tools] check --> scan_dirs --> LockfileDetector --> LockfileParser
//!                                                          |
//!                                                    PackageGraph*
//!                                                          |
//!                                                    SbomGenerator
//!                                                          |
//!                                        validate --> temp file + rename
//! ```

pub mod discover;
pub mod document;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod tools;
pub mod validate;

// --- Public API Re-exports ---

// Pipeline (main orchestrator)
pub use pipeline::{GenerateSummary, SbomPipeline, SbomPipelineBuilder};

// Error
pub use error::SbomGenError;

// Parser
pub use parser::{
    CargoLockParser, LockfileDetector, LockfileParser, NpmLockParser, PipRequirementsParser,
    default_parsers,
};

// Discovery
pub use discover::discover_lockfiles;

// Document generation
pub use document::SbomGenerator;

// Validation
pub use validate::{ValidationReport, Violation, validate_document};

// Tool checks
pub use tools::{ToolStatus, check_tools, ensure_tools};
