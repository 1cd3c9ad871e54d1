//! Structural SBOM validation
//!
//! Validates a serialized SBOM document against the structural rules of its
//! format. All violations are collected instead of stopping at the first
//! one, so a CI log shows everything wrong with a document in one run.

use std::collections::HashSet;

use serde::Serialize;

use bomgate_core::types::SbomFormat;

/// Accepted CycloneDX spec versions.
const CYCLONEDX_SPEC_VERSIONS: [&str; 3] = ["1.4", "1.5", "1.6"];

/// A single structural violation.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Where in the document the problem is (JSON-pointer-ish path).
    pub location: String,
    /// What is wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Result of validating one document.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Collected violations, empty when the document is valid.
    pub violations: Vec<Violation>,
    /// Component count, when the document parsed far enough to count.
    pub component_count: Option<usize>,
}

impl ValidationReport {
    /// Whether the document passed all checks.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validate a serialized SBOM document.
pub fn validate_document(content: &str, format: SbomFormat) -> ValidationReport {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            return ValidationReport {
                violations: vec![Violation {
                    location: "/".to_owned(),
                    message: format!("document is not valid JSON: {e}"),
                }],
                component_count: None,
            };
        }
    };

    match format {
        SbomFormat::CycloneDx => validate_cyclonedx(&value),
        SbomFormat::Spdx => validate_spdx(&value),
    }
}

fn validate_cyclonedx(value: &serde_json::Value) -> ValidationReport {
    let mut violations = Vec::new();

    match value["bomFormat"].as_str() {
        Some("CycloneDX") => {}
        Some(other) => violations.push(Violation {
            location: "/bomFormat".to_owned(),
            message: format!("expected \"CycloneDX\", found \"{other}\""),
        }),
        None => violations.push(Violation {
            location: "/bomFormat".to_owned(),
            message: "missing or not a string".to_owned(),
        }),
    }

    match value["specVersion"].as_str() {
        Some(v) if CYCLONEDX_SPEC_VERSIONS.contains(&v) => {}
        Some(other) => violations.push(Violation {
            location: "/specVersion".to_owned(),
            message: format!(
                "unsupported spec version \"{other}\" (supported: {})",
                CYCLONEDX_SPEC_VERSIONS.join(", ")
            ),
        }),
        None => violations.push(Violation {
            location: "/specVersion".to_owned(),
            message: "missing or not a string".to_owned(),
        }),
    }

    match value["version"].as_u64() {
        Some(v) if v >= 1 => {}
        Some(other) => violations.push(Violation {
            location: "/version".to_owned(),
            message: format!("must be a positive integer, found {other}"),
        }),
        None => violations.push(Violation {
            location: "/version".to_owned(),
            message: "missing or not a positive integer".to_owned(),
        }),
    }

    match value.get("serialNumber") {
        None => {}
        Some(serde_json::Value::Null) => {}
        Some(serial) => match serial.as_str() {
            Some(s) if s.starts_with("urn:uuid:") => {}
            _ => violations.push(Violation {
                location: "/serialNumber".to_owned(),
                message: "must be a \"urn:uuid:...\" string".to_owned(),
            }),
        },
    }

    let mut component_count = None;

    match value["components"].as_array() {
        Some(components) => {
            component_count = Some(components.len());
            let mut seen_purls = HashSet::new();

            for (idx, component) in components.iter().enumerate() {
                let loc = format!("/components/{idx}");

                if component["name"].as_str().is_none_or(str::is_empty) {
                    violations.push(Violation {
                        location: format!("{loc}/name"),
                        message: "missing or empty".to_owned(),
                    });
                }

                if component["version"].as_str().is_none_or(str::is_empty) {
                    violations.push(Violation {
                        location: format!("{loc}/version"),
                        message: "missing or empty".to_owned(),
                    });
                }

                match component["purl"].as_str() {
                    Some(purl) if purl.starts_with("pkg:") => {
                        if !seen_purls.insert(purl.to_owned()) {
                            violations.push(Violation {
                                location: format!("{loc}/purl"),
                                message: format!("duplicate purl \"{purl}\""),
                            });
                        }
                    }
                    Some(purl) => violations.push(Violation {
                        location: format!("{loc}/purl"),
                        message: format!("malformed purl \"{purl}\" (must start with \"pkg:\")"),
                    }),
                    None => violations.push(Violation {
                        location: format!("{loc}/purl"),
                        message: "missing or not a string".to_owned(),
                    }),
                }
            }
        }
        None => violations.push(Violation {
            location: "/components".to_owned(),
            message: "missing or not an array".to_owned(),
        }),
    }

    ValidationReport {
        violations,
        component_count,
    }
}

fn validate_spdx(value: &serde_json::Value) -> ValidationReport {
    let mut violations = Vec::new();

    match value["spdxVersion"].as_str() {
        Some("SPDX-2.3") => {}
        Some(other) => violations.push(Violation {
            location: "/spdxVersion".to_owned(),
            message: format!("expected \"SPDX-2.3\", found \"{other}\""),
        }),
        None => violations.push(Violation {
            location: "/spdxVersion".to_owned(),
            message: "missing or not a string".to_owned(),
        }),
    }

    if value["SPDXID"].as_str() != Some("SPDXRef-DOCUMENT") {
        violations.push(Violation {
            location: "/SPDXID".to_owned(),
            message: "must be \"SPDXRef-DOCUMENT\"".to_owned(),
        });
    }

    let mut component_count = None;

    match value["packages"].as_array() {
        Some(packages) => {
            component_count = Some(packages.len());

            for (idx, package) in packages.iter().enumerate() {
                let loc = format!("/packages/{idx}");

                if package["name"].as_str().is_none_or(str::is_empty) {
                    violations.push(Violation {
                        location: format!("{loc}/name"),
                        message: "missing or empty".to_owned(),
                    });
                }

                if package["SPDXID"].as_str().is_none_or(str::is_empty) {
                    violations.push(Violation {
                        location: format!("{loc}/SPDXID"),
                        message: "missing or empty".to_owned(),
                    });
                }
            }
        }
        None => violations.push(Violation {
            location: "/packages".to_owned(),
            message: "missing or not an array".to_owned(),
        }),
    }

    ValidationReport {
        violations,
        component_count,
    }
}
