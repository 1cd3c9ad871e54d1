//! Cargo.lock parser
//!
//! [`CargoLockParser`] parses Cargo's `Cargo.lock` (format v3/v4) into a
//! [`PackageGraph`].
//!
//! # Cargo.lock format example
//!
//! ```toml
//! [[package]]
//! name = "serde"
//! version = "1.0.204"
//! source = "registry+https://github.com/rust-lang/crates.io-index"
//! checksum = "abc123..."
//! dependencies = ["serde_derive"]
//! ```

use std::path::Path;

use serde::Deserialize;

use bomgate_core::types::{Ecosystem, Package, PackageGraph};

use crate::error::SbomGenError;
use crate::parser::LockfileParser;

/// Cargo.lock parser.
pub struct CargoLockParser;

/// Cargo.lock structure (parsing only).
#[derive(Deserialize)]
struct CargoLockFile {
    #[serde(default)]
    package: Vec<CargoPackageEntry>,
}

/// A single `[[package]]` entry (parsing only).
#[derive(Deserialize)]
struct CargoPackageEntry {
    name: String,
    version: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    checksum: Option<String>,
    #[serde(default)]
    dependencies: Option<Vec<String>>,
}

impl LockfileParser for CargoLockParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "Cargo.lock")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<PackageGraph, SbomGenError> {
        let lock_file: CargoLockFile =
            toml::from_str(content).map_err(|e| SbomGenError::LockfileParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut packages = Vec::with_capacity(lock_file.package.len());
        let mut root_packages = Vec::new();

        for entry in &lock_file.package {
            // Workspace members carry no source field
            if entry.source.is_none() {
                root_packages.push(entry.name.clone());
            }

            let purl = Package::make_purl(&Ecosystem::Cargo, &entry.name, &entry.version);

            // Dependency entries may be "name" or "name version (source)";
            // the name is always the first token
            let deps: Vec<String> = entry
                .dependencies
                .as_ref()
                .map(|d| {
                    d.iter()
                        .filter_map(|dep| dep.split_whitespace().next())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default();

            packages.push(Package {
                name: entry.name.clone(),
                version: entry.version.clone(),
                ecosystem: Ecosystem::Cargo,
                purl,
                checksum: entry.checksum.clone(),
                dependencies: deps,
            });
        }

        Ok(PackageGraph {
            source_file: source_path.to_owned(),
            ecosystem: Ecosystem::Cargo,
            packages,
            root_packages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CARGO_LOCK: &str = r#"
version = 3

[[package]]
name = "my-app"
version = "0.1.0"
dependencies = [
    "serde",
    "tokio",
]

[[package]]
name = "serde"
version = "1.0.204"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "abc123"
dependencies = [
    "serde_derive 1.0.204 (registry+https://github.com/rust-lang/crates.io-index)",
]

[[package]]
name = "tokio"
version = "1.38.0"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "def456"
"#;

    #[test]
    fn can_parse_cargo_lock() {
        let parser = CargoLockParser;
        assert!(parser.can_parse(Path::new("Cargo.lock")));
        assert!(parser.can_parse(Path::new("/project/Cargo.lock")));
        assert!(!parser.can_parse(Path::new("package-lock.json")));
        assert!(!parser.can_parse(Path::new("Cargo.toml")));
    }

    #[test]
    fn parse_sample_cargo_lock() {
        let parser = CargoLockParser;
        let graph = parser.parse(SAMPLE_CARGO_LOCK, "Cargo.lock").unwrap();

        assert_eq!(graph.ecosystem, Ecosystem::Cargo);
        assert_eq!(graph.source_file, "Cargo.lock");
        assert_eq!(graph.packages.len(), 3);
        // my-app has no source, so it is a workspace root
        assert_eq!(graph.root_packages, vec!["my-app"]);

        let serde_pkg = graph.find_package("serde").unwrap();
        assert_eq!(serde_pkg.version, "1.0.204");
        assert_eq!(serde_pkg.purl, "pkg:cargo/serde@1.0.204");
        assert_eq!(serde_pkg.checksum.as_deref(), Some("abc123"));
    }

    #[test]
    fn parse_versioned_dependency_entries() {
        let parser = CargoLockParser;
        let graph = parser.parse(SAMPLE_CARGO_LOCK, "Cargo.lock").unwrap();

        // "serde_derive 1.0.204 (registry+...)" reduces to the bare name
        let serde_pkg = graph.find_package("serde").unwrap();
        assert_eq!(serde_pkg.dependencies, vec!["serde_derive"]);
    }

    #[test]
    fn parse_empty_lockfile() {
        let parser = CargoLockParser;
        let graph = parser.parse("version = 3\n", "Cargo.lock").unwrap();
        assert_eq!(graph.packages.len(), 0);
        assert!(graph.root_packages.is_empty());
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let parser = CargoLockParser;
        let result = parser.parse("[[package\nname = broken", "Cargo.lock");
        assert!(matches!(
            result,
            Err(SbomGenError::LockfileParse { .. })
        ));
    }

    #[test]
    fn ecosystem_is_cargo() {
        let parser = CargoLockParser;
        assert_eq!(parser.ecosystem(), Ecosystem::Cargo);
    }
}
