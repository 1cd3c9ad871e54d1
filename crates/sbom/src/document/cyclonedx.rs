//! CycloneDX 1.5 JSON SBOM generation
//!
//! Produces a JSON SBOM document per the [CycloneDX](https://cyclonedx.org/)
//! 1.5 specification. Components from all input graphs are merged,
//! de-duplicated by purl, and sorted by purl so the same dependency set
//! always produces the same component list.

use std::collections::BTreeMap;

use serde::Serialize;

use bomgate_core::types::{PackageGraph, SbomDocument, SbomFormat};

use super::util;
use crate::error::SbomGenError;

/// CycloneDX 1.5 BOM root structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxBom {
    bom_format: String,
    spec_version: String,
    serial_number: String,
    version: u32,
    metadata: CycloneDxMetadata,
    components: Vec<CycloneDxComponent>,
}

/// CycloneDX metadata.
#[derive(Serialize)]
struct CycloneDxMetadata {
    timestamp: String,
    tools: Vec<CycloneDxTool>,
}

/// CycloneDX tool entry.
#[derive(Serialize)]
struct CycloneDxTool {
    name: String,
    version: String,
}

/// CycloneDX component.
#[derive(Serialize)]
struct CycloneDxComponent {
    #[serde(rename = "type")]
    component_type: String,
    name: String,
    version: String,
    purl: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<CycloneDxHash>,
}

/// CycloneDX hash entry.
#[derive(Serialize)]
struct CycloneDxHash {
    alg: String,
    content: String,
}

/// Generate a CycloneDX 1.5 JSON SBOM from one or more package graphs.
pub fn generate(graphs: &[PackageGraph]) -> Result<SbomDocument, SbomGenError> {
    // BTreeMap keyed by purl gives de-duplication and deterministic order
    let mut by_purl: BTreeMap<String, CycloneDxComponent> = BTreeMap::new();

    for graph in graphs {
        for pkg in &graph.packages {
            let hashes = pkg
                .checksum
                .as_ref()
                .map(|c| {
                    let (algorithm, hash_value) = util::parse_checksum_algorithm(c, &pkg.ecosystem);
                    vec![CycloneDxHash {
                        alg: algorithm.to_owned(),
                        content: hash_value.to_owned(),
                    }]
                })
                .unwrap_or_default();

            by_purl.entry(pkg.purl.clone()).or_insert(CycloneDxComponent {
                component_type: "library".to_owned(),
                name: pkg.name.clone(),
                version: pkg.version.clone(),
                purl: pkg.purl.clone(),
                hashes,
            });
        }
    }

    let components: Vec<CycloneDxComponent> = by_purl.into_values().collect();
    let component_count = components.len();

    let bom = CycloneDxBom {
        bom_format: "CycloneDX".to_owned(),
        spec_version: "1.5".to_owned(),
        serial_number: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
        version: 1,
        metadata: CycloneDxMetadata {
            timestamp: util::current_timestamp(),
            tools: vec![CycloneDxTool {
                name: "bomgate".to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
            }],
        },
        components,
    };

    let content = serde_json::to_string_pretty(&bom).map_err(|e| {
        SbomGenError::Generation(format!("CycloneDX serialization failed: {e}"))
    })?;

    Ok(SbomDocument {
        format: SbomFormat::CycloneDx,
        content,
        component_count,
    })
}
