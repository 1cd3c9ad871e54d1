//! SPDX 2.3 JSON SBOM generation
//!
//! Produces a JSON SBOM document per the [SPDX](https://spdx.dev/) 2.3
//! specification. Packages are merged and sorted the same way as the
//! CycloneDX writer.

use std::collections::BTreeMap;

use serde::Serialize;

use bomgate_core::types::{PackageGraph, SbomDocument, SbomFormat};

use super::util;
use crate::error::SbomGenError;

/// SPDX 2.3 document root structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument {
    spdx_version: String,
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    data_license: String,
    document_namespace: String,
    creation_info: SpdxCreationInfo,
    packages: Vec<SpdxPackage>,
}

/// SPDX creation info.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxCreationInfo {
    created: String,
    creators: Vec<String>,
}

/// SPDX package.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    version_info: String,
    download_location: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_refs: Vec<SpdxExternalRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<SpdxChecksum>,
}

/// SPDX external reference.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalRef {
    reference_category: String,
    reference_type: String,
    reference_locator: String,
}

/// SPDX checksum.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxChecksum {
    algorithm: String,
    checksum_value: String,
}

/// Generate an SPDX 2.3 JSON SBOM from one or more package graphs.
pub fn generate(graphs: &[PackageGraph]) -> Result<SbomDocument, SbomGenError> {
    let mut by_purl: BTreeMap<String, SpdxPackage> = BTreeMap::new();

    for graph in graphs {
        for pkg in &graph.packages {
            if by_purl.contains_key(&pkg.purl) {
                continue;
            }

            // Deterministic SPDX ID from name and version
            let sanitized_name = sanitize(&pkg.name, &['.', '-']);
            let sanitized_version = sanitize(&pkg.version, &['.']);
            let spdx_id = format!("SPDXRef-Package-{sanitized_name}-{sanitized_version}");

            let external_refs = vec![SpdxExternalRef {
                reference_category: "PACKAGE-MANAGER".to_owned(),
                reference_type: "purl".to_owned(),
                reference_locator: pkg.purl.clone(),
            }];

            let checksums = pkg
                .checksum
                .as_ref()
                .map(|c| {
                    let (algorithm, hash_value) = util::parse_checksum_algorithm(c, &pkg.ecosystem);
                    vec![SpdxChecksum {
                        algorithm: algorithm.replace('-', ""), // SPDX uses "SHA256"
                        checksum_value: hash_value.to_owned(),
                    }]
                })
                .unwrap_or_default();

            by_purl.insert(
                pkg.purl.clone(),
                SpdxPackage {
                    spdx_id,
                    name: pkg.name.clone(),
                    version_info: pkg.version.clone(),
                    download_location: "NOASSERTION".to_owned(),
                    external_refs,
                    checksums,
                },
            );
        }
    }

    let packages: Vec<SpdxPackage> = by_purl.into_values().collect();
    let component_count = packages.len();

    let namespace = format!("https://bomgate.dev/spdx/{}", uuid::Uuid::new_v4());

    let doc = SpdxDocument {
        spdx_version: "SPDX-2.3".to_owned(),
        spdx_id: "SPDXRef-DOCUMENT".to_owned(),
        name: "bomgate-sbom".to_owned(),
        data_license: "CC0-1.0".to_owned(),
        document_namespace: namespace,
        creation_info: SpdxCreationInfo {
            created: util::current_timestamp(),
            creators: vec!["Tool: bomgate".to_owned()],
        },
        packages,
    };

    let content = serde_json::to_string_pretty(&doc)
        .map_err(|e| SbomGenError::Generation(format!("SPDX serialization failed: {e}")))?;

    Ok(SbomDocument {
        format: SbomFormat::Spdx,
        content,
        component_count,
    })
}

/// Replace characters outside `[A-Za-z0-9]` and `allowed` with '-'.
fn sanitize(input: &str, allowed: &[char]) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || allowed.contains(&c) {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomgate_core::types::{Ecosystem, Package};

    fn sample_graph() -> PackageGraph {
        PackageGraph {
            source_file: "Cargo.lock".to_owned(),
            ecosystem: Ecosystem::Cargo,
            packages: vec![Package {
                name: "serde".to_owned(),
                version: "1.0.204".to_owned(),
                ecosystem: Ecosystem::Cargo,
                purl: "pkg:cargo/serde@1.0.204".to_owned(),
                checksum: Some("abc123".to_owned()),
                dependencies: vec![],
            }],
            root_packages: vec![],
        }
    }

    #[test]
    fn generate_contains_required_fields() {
        let doc = generate(&[sample_graph()]).unwrap();
        assert!(doc.content.contains("SPDX-2.3"));
        assert!(doc.content.contains("SPDXRef-DOCUMENT"));
        assert!(doc.content.contains("CC0-1.0"));
        assert!(doc.content.contains("Tool: bomgate"));
        assert_eq!(doc.component_count, 1);
    }

    #[test]
    fn generate_contains_packages() {
        let doc = generate(&[sample_graph()]).unwrap();
        assert!(doc.content.contains("serde"));
        assert!(doc.content.contains("1.0.204"));
        assert!(doc.content.contains("pkg:cargo/serde@1.0.204"));
    }

    #[test]
    fn generate_includes_checksum() {
        let doc = generate(&[sample_graph()]).unwrap();
        assert!(doc.content.contains("SHA256"));
        assert!(doc.content.contains("abc123"));
    }

    #[test]
    fn generate_empty_input() {
        let doc = generate(&[]).unwrap();
        assert_eq!(doc.component_count, 0);
        assert!(doc.content.contains("SPDX"));
    }

    #[test]
    fn generate_is_valid_json() {
        let doc = generate(&[sample_graph()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        assert_eq!(parsed["spdxVersion"], "SPDX-2.3");
        assert_eq!(parsed["SPDXID"], "SPDXRef-DOCUMENT");
        assert!(parsed["packages"].is_array());
    }

    #[test]
    fn generate_unique_namespace() {
        let graph = sample_graph();
        let doc1 = generate(std::slice::from_ref(&graph)).unwrap();
        let doc2 = generate(std::slice::from_ref(&graph)).unwrap();

        let v1: serde_json::Value = serde_json::from_str(&doc1.content).unwrap();
        let v2: serde_json::Value = serde_json::from_str(&doc2.content).unwrap();

        assert_ne!(v1["documentNamespace"], v2["documentNamespace"]);
    }

    #[test]
    fn sanitize_replaces_special_characters() {
        assert_eq!(sanitize("@types/node", &['.', '-']), "-types-node");
        assert_eq!(sanitize("1.0.204", &['.']), "1.0.204");
    }
}
