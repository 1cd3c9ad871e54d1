//! Domain types shared across the bomgate crates.
//!
//! Packages, dependency graphs, ecosystems, and SBOM documents. These live
//! in core because both the generator (`bomgate-sbom`) and the verifier
//! (`bomgate-verify`) consume them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Package ecosystem (language / package manager).
///
/// One variant per supported lockfile format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    /// Rust (Cargo.lock)
    Cargo,
    /// JavaScript/TypeScript (package-lock.json)
    Npm,
    /// Python (requirements.txt)
    Pip,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cargo => write!(f, "cargo"),
            Self::Npm => write!(f, "npm"),
            Self::Pip => write!(f, "pip"),
        }
    }
}

impl Ecosystem {
    /// Package URL type prefix for this ecosystem.
    ///
    /// e.g. Cargo -> "cargo", Pip -> "pypi"
    pub fn purl_type(&self) -> &str {
        match self {
            Self::Cargo => "cargo",
            Self::Npm => "npm",
            Self::Pip => "pypi",
        }
    }

    /// Parse an ecosystem name, case-insensitive and alias-tolerant.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cargo" | "rust" | "crate" | "crates" => Some(Self::Cargo),
            "npm" | "node" | "javascript" | "js" => Some(Self::Npm),
            "pip" | "python" | "pypi" => Some(Self::Pip),
            _ => None,
        }
    }
}

/// A single package parsed from a lockfile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Package ecosystem.
    pub ecosystem: Ecosystem,
    /// Package URL (e.g. `pkg:cargo/serde@1.0.204`).
    pub purl: String,
    /// Checksum, when the lockfile records one.
    pub checksum: Option<String>,
    /// Names of direct dependencies.
    pub dependencies: Vec<String>,
}

impl Package {
    /// Build a purl from ecosystem, name, and version.
    pub fn make_purl(ecosystem: &Ecosystem, name: &str, version: &str) -> String {
        format!("pkg:{}/{}@{}", ecosystem.purl_type(), name, version)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.ecosystem)
    }
}

/// The full dependency set parsed from one lockfile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageGraph {
    /// Path of the source lockfile.
    pub source_file: String,
    /// Ecosystem of the lockfile.
    pub ecosystem: Ecosystem,
    /// All packages.
    pub packages: Vec<Package>,
    /// Root package names (direct dependencies), when the format records them.
    pub root_packages: Vec<String>,
}

impl PackageGraph {
    /// Number of packages in the graph.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Look up a package by name.
    pub fn find_package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }
}

impl fmt::Display for PackageGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PackageGraph({}, {} packages, ecosystem={})",
            self.source_file,
            self.packages.len(),
            self.ecosystem,
        )
    }
}

/// SBOM output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SbomFormat {
    /// CycloneDX 1.5 JSON
    CycloneDx,
    /// SPDX 2.3 JSON
    Spdx,
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycloneDx => write!(f, "cyclonedx"),
            Self::Spdx => write!(f, "spdx"),
        }
    }
}

impl SbomFormat {
    /// Parse an SBOM format name, case-insensitive.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cyclonedx" | "cdx" => Some(Self::CycloneDx),
            "spdx" => Some(Self::Spdx),
            _ => None,
        }
    }
}

/// A generated SBOM document: format plus serialized content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SbomDocument {
    /// Document format.
    pub format: SbomFormat,
    /// JSON content.
    pub content: String,
    /// Number of components in the document.
    pub component_count: usize,
}

impl fmt::Display for SbomDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SbomDocument(format={}, components={})",
            self.format, self.component_count,
        )
    }
}

/// An external tool the pipeline requires on PATH.
///
/// Declared in the `[tools]` config section and checked before generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequirement {
    /// Executable name (resolved via PATH).
    pub name: String,
    /// Minimum acceptable version, semver. `None` means presence is enough.
    #[serde(default)]
    pub min_version: Option<String>,
}
