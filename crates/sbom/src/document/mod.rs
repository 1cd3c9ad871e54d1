//! SBOM document generation -- CycloneDX and SPDX writers
//!
//! [`SbomGenerator`] dispatches to the format-specific writer selected at
//! construction time.

pub mod cyclonedx;
pub mod spdx;
pub mod util;

use bomgate_core::types::{PackageGraph, SbomDocument, SbomFormat};

use crate::error::SbomGenError;

/// SBOM document generator.
///
/// Holds the output format and produces one merged document from the
/// package graphs of all discovered lockfiles.
pub struct SbomGenerator {
    format: SbomFormat,
}

impl SbomGenerator {
    /// Create a generator for the given output format.
    pub fn new(format: SbomFormat) -> Self {
        Self { format }
    }

    /// Configured output format.
    pub fn format(&self) -> SbomFormat {
        self.format
    }

    /// Generate a merged SBOM document from the given package graphs.
    pub fn generate(&self, graphs: &[PackageGraph]) -> Result<SbomDocument, SbomGenError> {
        match self.format {
            SbomFormat::CycloneDx => cyclonedx::generate(graphs),
            SbomFormat::Spdx => spdx::generate(graphs),
        }
    }
}
