//! package-lock.json parser
//!
//! [`NpmLockParser`] parses NPM's package-lock.json (v2/v3) into a
//! [`PackageGraph`].
//!
//! # package-lock.json v3 format example
//!
//! ```json
//! {
//!   "name": "my-app",
//!   "lockfileVersion": 3,
//!   "packages": {
//!     "": { "name": "my-app", "version": "1.0.0" },
//!     "node_modules/lodash": { "version": "4.17.21", "integrity": "sha512-..." }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use bomgate_core::types::{Ecosystem, Package, PackageGraph};

use crate::error::SbomGenError;
use crate::parser::LockfileParser;

/// package-lock.json parser.
///
/// Handles NPM lockfile v2/v3.
pub struct NpmLockParser;

/// package-lock.json structure (parsing only).
#[derive(Deserialize)]
struct NpmLockFile {
    #[serde(default)]
    packages: HashMap<String, NpmPackageEntry>,
}

/// A single package entry (parsing only).
#[derive(Deserialize)]
struct NpmPackageEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    integrity: Option<String>,
    #[serde(default)]
    dependencies: Option<HashMap<String, String>>,
}

impl LockfileParser for NpmLockParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "package-lock.json")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<PackageGraph, SbomGenError> {
        let lock_file: NpmLockFile =
            serde_json::from_str(content).map_err(|e| SbomGenError::LockfileParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut packages = Vec::new();
        let mut root_packages = Vec::new();

        for (key, entry) in &lock_file.packages {
            // The root package has the empty string as its key
            if key.is_empty() {
                if let Some(ref name) = entry.name {
                    root_packages.push(name.clone());
                }
                continue;
            }

            let name = extract_package_name(key);
            let version = match &entry.version {
                Some(v) => v.clone(),
                None => continue, // entries without a version are skipped
            };

            let purl = Package::make_purl(&Ecosystem::Npm, &name, &version);

            // integrity doubles as the checksum
            let checksum = entry.integrity.clone();

            let deps: Vec<String> = entry
                .dependencies
                .as_ref()
                .map(|d| d.keys().cloned().collect())
                .unwrap_or_default();

            packages.push(Package {
                name,
                version,
                ecosystem: Ecosystem::Npm,
                purl,
                checksum,
                dependencies: deps,
            });
        }

        Ok(PackageGraph {
            source_file: source_path.to_owned(),
            ecosystem: Ecosystem::Npm,
            packages,
            root_packages,
        })
    }
}

/// Extract the package name from "node_modules/@scope/name" or
/// "node_modules/name".
fn extract_package_name(key: &str) -> String {
    // Everything after the last "node_modules/" is the name; scoped
    // packages keep the "@scope/name" form
    if let Some(pos) = key.rfind("node_modules/") {
        let after = &key[pos + "node_modules/".len()..];
        after.to_owned()
    } else {
        key.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PACKAGE_LOCK: &str = r#"{
  "name": "my-app",
  "version": "1.0.0",
  "lockfileVersion": 3,
  "packages": {
    "": {
      "name": "my-app",
      "version": "1.0.0",
      "dependencies": {
        "lodash": "^4.17.21"
      }
    },
    "node_modules/lodash": {
      "version": "4.17.21",
      "resolved": "https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz",
      "integrity": "sha512-v2kDE..."
    },
    "node_modules/express": {
      "version": "4.18.2",
      "resolved": "https://registry.npmjs.org/express/-/express-4.18.2.tgz",
      "integrity": "sha512-abc...",
      "dependencies": {
        "accepts": "~1.3.8"
      }
    }
  }
}"#;

    #[test]
    fn can_parse_package_lock_json() {
        let parser = NpmLockParser;
        assert!(parser.can_parse(Path::new("package-lock.json")));
        assert!(parser.can_parse(Path::new("/project/package-lock.json")));
        assert!(!parser.can_parse(Path::new("Cargo.lock")));
        assert!(!parser.can_parse(Path::new("package.json")));
    }

    #[test]
    fn parse_sample_package_lock() {
        let parser = NpmLockParser;
        let graph = parser
            .parse(SAMPLE_PACKAGE_LOCK, "package-lock.json")
            .unwrap();

        assert_eq!(graph.ecosystem, Ecosystem::Npm);
        assert_eq!(graph.source_file, "package-lock.json");
        // 2 packages (lodash, express), root entry is skipped
        assert_eq!(graph.packages.len(), 2);
        assert_eq!(graph.root_packages, vec!["my-app"]);

        let lodash = graph.find_package("lodash").unwrap();
        assert_eq!(lodash.version, "4.17.21");
        assert_eq!(lodash.purl, "pkg:npm/lodash@4.17.21");
        assert!(lodash.checksum.is_some());

        let express = graph.find_package("express").unwrap();
        assert_eq!(express.dependencies, vec!["accepts"]);
    }

    #[test]
    fn parse_empty_packages() {
        let parser = NpmLockParser;
        let json = r#"{ "packages": {} }"#;
        let graph = parser.parse(json, "package-lock.json").unwrap();
        assert_eq!(graph.packages.len(), 0);
    }

    #[test]
    fn parse_invalid_json_returns_error() {
        let parser = NpmLockParser;
        let result = parser.parse("not json!", "package-lock.json");
        assert!(result.is_err());
    }

    #[test]
    fn ecosystem_is_npm() {
        let parser = NpmLockParser;
        assert_eq!(parser.ecosystem(), Ecosystem::Npm);
    }

    #[test]
    fn extract_package_name_simple() {
        assert_eq!(extract_package_name("node_modules/lodash"), "lodash");
    }

    #[test]
    fn extract_package_name_scoped() {
        assert_eq!(
            extract_package_name("node_modules/@types/node"),
            "@types/node"
        );
    }

    #[test]
    fn extract_package_name_nested() {
        assert_eq!(
            extract_package_name("node_modules/express/node_modules/debug"),
            "debug"
        );
    }
}
