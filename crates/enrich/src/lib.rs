//! # bomgate-enrich
//!
//! Supplier enrichment for CycloneDX SBOM documents.
//!
//! Generated SBOMs describe what a project depends on but rarely who
//! supplies each dependency. This crate fills the gap after generation:
//! it walks every component, derives a `supplier` object from the purl
//! ecosystem, and writes the enriched document back out.
//!
//! - PyPI components are looked up live against the PyPI JSON API
//!   through [`PyPiClient`], with caching and rate limiting.
//! - npm and Maven components get the static registry supplier since
//!   those registries expose no comparable per-package endpoint.
//! - Components that already carry a supplier are left untouched.
//!
//! ## Example
//!
//! ```no_run
//! use bomgate_enrich::{Enricher, PyPiClient};
//!
//! # async fn run() -> Result<(), bomgate_enrich::SbomEnrichError> {
//! let mut enricher = Enricher::new(PyPiClient::default());
//! let summary = enricher.enrich_file("sbom.json", "sbom.json").await?;
//! println!("updated {} of {} components", summary.updated, summary.examined);
//! # Ok(())
//! # }
//! ```

pub mod enricher;
pub mod error;
pub mod registry;
pub mod supplier;

pub use enricher::{EnrichSummary, Enricher};
pub use error::SbomEnrichError;
pub use registry::{
    DEFAULT_REQUEST_DELAY_MS, DEFAULT_TIMEOUT_SECS, PackageInfo, PyPiClient, RegistryClient,
    RegistryMetadata, is_safe_package_name,
};
pub use supplier::{from_pypi_metadata, maven_central, npm_registry};
