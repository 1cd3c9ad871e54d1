//! SBOM supplier enrichment.
//!
//! Walks a CycloneDX document and fills in the `supplier` field of every
//! component that lacks one, deriving the data from the component's purl:
//! PyPI components get a live registry lookup, npm and Maven components get
//! the static registry supplier. Components that already carry a supplier
//! are never touched.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::SbomEnrichError;
use crate::registry::RegistryClient;
use crate::supplier;

/// Summary of one enrichment run.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichSummary {
    /// Components examined (including `metadata.component`).
    pub examined: usize,
    /// Components that received a supplier.
    pub updated: usize,
    /// Path the enriched document was written to.
    pub output_path: String,
}

/// Supplier enricher over a pluggable registry client.
pub struct Enricher<C: RegistryClient> {
    client: C,
}

impl<C: RegistryClient> Enricher<C> {
    /// Create an enricher around a registry client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Enrich an SBOM file, writing to `output` (pass the input path for
    /// in-place updates).
    pub async fn enrich_file(
        &mut self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<EnrichSummary, SbomEnrichError> {
        let input = input.as_ref();
        let output = output.as_ref();

        let content =
            tokio::fs::read_to_string(input)
                .await
                .map_err(|e| SbomEnrichError::DocumentIo {
                    path: input.display().to_string(),
                    reason: e.to_string(),
                })?;

        let mut document: Value =
            serde_json::from_str(&content).map_err(|e| SbomEnrichError::DocumentParse {
                path: input.display().to_string(),
                reason: e.to_string(),
            })?;

        let (examined, updated) = self.enrich_document(&mut document).await;

        let serialized = serde_json::to_string_pretty(&document).map_err(|e| {
            SbomEnrichError::DocumentIo {
                path: output.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        tokio::fs::write(output, format!("{serialized}\n"))
            .await
            .map_err(|e| SbomEnrichError::DocumentIo {
                path: output.display().to_string(),
                reason: e.to_string(),
            })?;

        info!(
            input = %input.display(),
            output = %output.display(),
            examined,
            updated,
            "enrichment complete"
        );

        Ok(EnrichSummary {
            examined,
            updated,
            output_path: output.display().to_string(),
        })
    }

    /// Enrich a parsed document in place. Returns `(examined, updated)`.
    pub async fn enrich_document(&mut self, document: &mut Value) -> (usize, usize) {
        let mut examined = 0;
        let mut updated = 0;

        if let Some(components) = document
            .get_mut("components")
            .and_then(Value::as_array_mut)
        {
            // Indexed loop; holding an iterator across awaits fights the
            // borrow on self
            for idx in 0..components.len() {
                if let Some(component) = components.get_mut(idx) {
                    if component.is_object() {
                        examined += 1;
                        if self.enrich_component(component).await {
                            updated += 1;
                        }
                    }
                }
            }
        }

        if let Some(meta_component) = document
            .get_mut("metadata")
            .and_then(|m| m.get_mut("component"))
        {
            if meta_component.is_object() {
                examined += 1;
                if self.enrich_component(meta_component).await {
                    updated += 1;
                }
            }
        }

        (examined, updated)
    }

    /// Try to add a supplier to one component; true when one was added.
    async fn enrich_component(&mut self, component: &mut Value) -> bool {
        if component.get("supplier").is_some() {
            return false;
        }

        let name = component
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_owned();
        let purl = component
            .get("purl")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_owned();

        let Some(supplier) = self.derive_supplier(&purl, &name).await else {
            debug!(name = %name, purl = %purl, "no supplier derivable");
            return false;
        };

        component["supplier"] = supplier;
        true
    }

    /// Derive supplier info from the purl.
    async fn derive_supplier(&mut self, purl: &str, name: &str) -> Option<Value> {
        if purl.is_empty() {
            return None;
        }

        if purl.contains("pkg:pypi/") {
            let normalized = normalize_name(name);
            let meta = self.client.get_package(&normalized).await?;
            return supplier::from_pypi_metadata(&meta);
        }

        if purl.contains("pkg:npm/") {
            return Some(supplier::npm_registry());
        }

        if purl.contains("pkg:maven/") {
            return Some(supplier::maven_central());
        }

        None
    }
}

/// Strip a version specifier that leaked into a component name
/// ("requests>=2.0" becomes "requests").
fn normalize_name(name: &str) -> String {
    name.split(['<', '>', '=', '!'])
        .next()
        .unwrap_or(name)
        .trim()
        .to_owned()
}
