//! requirements.txt parser
//!
//! [`PipRequirementsParser`] parses pip requirements files with exact pins
//! (`name==version`) into a [`PackageGraph`].
//!
//! # requirements.txt format example
//!
//! ```text
//! # production deps
//! requests==2.31.0 \
//!     --hash=sha256:942c5a75...
//! uvicorn[standard]==0.30.1 ; python_version >= "3.8"
//! ```
//!
//! Lines that are not exact pins (ranges, editable installs, `-r` includes)
//! are skipped with a warning; a requirements file is only a lockfile when
//! it pins exact versions.

use std::path::Path;

use tracing::warn;

use bomgate_core::types::{Ecosystem, Package, PackageGraph};

use crate::error::SbomGenError;
use crate::parser::LockfileParser;

/// requirements.txt parser.
pub struct PipRequirementsParser;

impl LockfileParser for PipRequirementsParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pip
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "requirements.txt")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<PackageGraph, SbomGenError> {
        let mut packages = Vec::new();
        let mut root_packages = Vec::new();

        for logical_line in join_continuations(content) {
            let line = strip_comment(&logical_line);
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            // Option lines: -r other.txt, --index-url, -e ./local
            if line.starts_with('-') {
                warn!(
                    file = source_path,
                    line = line,
                    "skipping requirements option line"
                );
                continue;
            }

            let (requirement, hashes) = split_hashes(line);

            // Environment markers come after ';'
            let requirement = requirement
                .split(';')
                .next()
                .unwrap_or(&requirement)
                .trim()
                .to_owned();

            let Some((raw_name, version)) = requirement.split_once("==") else {
                warn!(
                    file = source_path,
                    line = line,
                    "skipping requirement without exact pin"
                );
                continue;
            };

            // Extras syntax: "uvicorn[standard]" pins the base package
            let name = raw_name
                .split('[')
                .next()
                .unwrap_or(raw_name)
                .trim()
                .to_owned();
            let version = version.trim().to_owned();

            if name.is_empty() || version.is_empty() {
                warn!(file = source_path, line = line, "skipping malformed pin");
                continue;
            }

            let purl = Package::make_purl(&Ecosystem::Pip, &name, &version);

            // requirements.txt is flat, so every pin is a root
            root_packages.push(name.clone());

            packages.push(Package {
                name,
                version,
                ecosystem: Ecosystem::Pip,
                purl,
                checksum: hashes.into_iter().next(),
                dependencies: vec![],
            });
        }

        Ok(PackageGraph {
            source_file: source_path.to_owned(),
            ecosystem: Ecosystem::Pip,
            packages,
            root_packages,
        })
    }
}

/// Join backslash-continued lines into logical lines.
fn join_continuations(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for raw in content.lines() {
        let trimmed = raw.trim_end();
        if let Some(stripped) = trimmed.strip_suffix('\\') {
            current.push_str(stripped);
            current.push(' ');
        } else {
            current.push_str(trimmed);
            lines.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Remove a trailing comment, respecting `--hash=sha256:...` fragments that
/// never contain '#'.
fn strip_comment(line: &str) -> String {
    match line.find('#') {
        Some(pos) => line[..pos].to_owned(),
        None => line.to_owned(),
    }
}

/// Split `--hash=alg:value` fragments off a logical line.
///
/// Returns the requirement part and the hash values in `alg:value` form.
fn split_hashes(line: &str) -> (String, Vec<String>) {
    let mut requirement = String::new();
    let mut hashes = Vec::new();

    for token in line.split_whitespace() {
        if let Some(hash) = token.strip_prefix("--hash=") {
            hashes.push(hash.to_owned());
        } else {
            if !requirement.is_empty() {
                requirement.push(' ');
            }
            requirement.push_str(token);
        }
    }

    (requirement, hashes)
}
