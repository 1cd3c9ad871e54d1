//! Lockfile parsers -- Cargo.lock, package-lock.json, requirements.txt
//!
//! The [`LockfileParser`] trait is the interface each lockfile format parser
//! implements. [`LockfileDetector`] matches file names against the supported
//! formats.
//!
//! # Supported formats
//!
//! - `Cargo.lock` (TOML) -- [`CargoLockParser`]
//! - `package-lock.json` (JSON) -- [`NpmLockParser`]
//! - `requirements.txt` (pinned pip requirements) -- [`PipRequirementsParser`]
//!
//! # Extension
//!
//! To support a new format, implement `LockfileParser` and register the
//! filename with `LockfileDetector`.

pub mod cargo;
pub mod npm;
pub mod pip;

use std::path::Path;

use bomgate_core::types::{Ecosystem, PackageGraph};

use crate::error::SbomGenError;

pub use cargo::CargoLockParser;
pub use npm::NpmLockParser;
pub use pip::PipRequirementsParser;

/// Lockfile parser trait.
///
/// Parses one package ecosystem's lockfile format into a [`PackageGraph`].
pub trait LockfileParser: Send + Sync {
    /// Ecosystem this parser handles.
    fn ecosystem(&self) -> Ecosystem;

    /// Whether this parser can handle the file at `path`.
    ///
    /// Decided by file name pattern (e.g. "Cargo.lock", "package-lock.json").
    fn can_parse(&self, path: &Path) -> bool;

    /// Parse lockfile content into a package graph.
    ///
    /// # Arguments
    ///
    /// - `content`: lockfile content (UTF-8)
    /// - `source_path`: original file path (for error messages)
    fn parse(&self, content: &str, source_path: &str) -> Result<PackageGraph, SbomGenError>;
}

/// Default parser set, in detection order.
pub fn default_parsers() -> Vec<Box<dyn LockfileParser>> {
    vec![
        Box::new(CargoLockParser),
        Box::new(NpmLockParser),
        Box::new(PipRequirementsParser),
    ]
}

/// Lockfile detector.
///
/// Matches directory entries against the known lockfile filenames.
pub struct LockfileDetector {
    /// Known lockfile filenames.
    known_filenames: Vec<(String, Ecosystem)>,
}

impl LockfileDetector {
    /// Create a detector with the default lockfile patterns.
    pub fn new() -> Self {
        Self {
            known_filenames: vec![
                ("Cargo.lock".to_owned(), Ecosystem::Cargo),
                ("package-lock.json".to_owned(), Ecosystem::Npm),
                ("requirements.txt".to_owned(), Ecosystem::Pip),
            ],
        }
    }

    /// Known lockfile filenames.
    pub fn known_filenames(&self) -> &[(String, Ecosystem)] {
        &self.known_filenames
    }

    /// Whether the path names a known lockfile.
    pub fn is_lockfile(&self, path: &Path) -> bool {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        self.known_filenames
            .iter()
            .any(|(known, _)| known == file_name)
    }

    /// Ecosystem of the lockfile at `path`, if known.
    pub fn detect_ecosystem(&self, path: &Path) -> Option<Ecosystem> {
        let file_name = path.file_name().and_then(|n| n.to_str())?;

        self.known_filenames
            .iter()
            .find(|(known, _)| known == file_name)
            .map(|(_, eco)| *eco)
    }
}

impl Default for LockfileDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detector_recognizes_cargo_lock() {
        let detector = LockfileDetector::new();
        let path = PathBuf::from("/project/Cargo.lock");
        assert!(detector.is_lockfile(&path));
        assert_eq!(detector.detect_ecosystem(&path), Some(Ecosystem::Cargo));
    }

    #[test]
    fn detector_recognizes_package_lock_json() {
        let detector = LockfileDetector::new();
        let path = PathBuf::from("/project/package-lock.json");
        assert!(detector.is_lockfile(&path));
        assert_eq!(detector.detect_ecosystem(&path), Some(Ecosystem::Npm));
    }

    #[test]
    fn detector_recognizes_requirements_txt() {
        let detector = LockfileDetector::new();
        let path = PathBuf::from("/project/requirements.txt");
        assert!(detector.is_lockfile(&path));
        assert_eq!(detector.detect_ecosystem(&path), Some(Ecosystem::Pip));
    }

    #[test]
    fn detector_rejects_unknown_file() {
        let detector = LockfileDetector::new();
        let path = PathBuf::from("/project/unknown.txt");
        assert!(!detector.is_lockfile(&path));
        assert_eq!(detector.detect_ecosystem(&path), None);
    }

    #[test]
    fn detector_rejects_empty_path() {
        let detector = LockfileDetector::new();
        let path = PathBuf::from("");
        assert!(!detector.is_lockfile(&path));
    }

    #[test]
    fn detector_known_filenames() {
        let detector = LockfileDetector::new();
        assert_eq!(detector.known_filenames().len(), 3);
    }

    #[test]
    fn default_parsers_cover_all_known_filenames() {
        let detector = LockfileDetector::new();
        let parsers = default_parsers();
        for (name, _) in detector.known_filenames() {
            let path = PathBuf::from(name);
            assert!(
                parsers.iter().any(|p| p.can_parse(&path)),
                "no parser for {name}"
            );
        }
    }
}
