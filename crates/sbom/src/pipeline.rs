//! Generation pipeline -- discovery through written SBOM file
//!
//! [`SbomPipeline`] wires the stages together:
//!
//! ```text
//! [tools] check --> scan_dirs --> LockfileDetector --> LockfileParser
//!                                                          |
//!                                                    PackageGraph*
//!                                                          |
//!                                                    SbomGenerator
//!                                                          |
//!                                        validate --> temp file + rename
//! ```
//!
//! Unlike discovery (where a missing directory is tolerated), parse,
//! generation, and validation failures are fatal; CI must not publish a
//! half-right SBOM.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use bomgate_core::config::{SbomGenConfig, ToolsConfig};
use bomgate_core::types::{PackageGraph, SbomFormat};

use crate::discover::discover_lockfiles;
use crate::document::SbomGenerator;
use crate::error::SbomGenError;
use crate::parser::{LockfileDetector, LockfileParser, default_parsers};
use crate::tools::{ToolStatus, ensure_tools};
use crate::validate::validate_document;

/// Summary of one completed generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    /// Lockfiles that contributed packages.
    pub lockfiles: Vec<String>,
    /// Total packages parsed (before de-duplication).
    pub package_count: usize,
    /// Components in the written document.
    pub component_count: usize,
    /// Path the document was written to.
    pub output_path: String,
    /// Output format name.
    pub format: String,
    /// Tool check results.
    pub tools: Vec<ToolStatus>,
}

/// SBOM generation pipeline.
pub struct SbomPipeline {
    config: SbomGenConfig,
    tools: ToolsConfig,
    parsers: Vec<Box<dyn LockfileParser>>,
    generator: SbomGenerator,
}

impl SbomPipeline {
    /// Run the full pipeline once.
    pub async fn run_once(&self) -> Result<GenerateSummary, SbomGenError> {
        // Tool prerequisites first; a broken toolchain fails fast
        let tool_reqs = self.tools.required.clone();
        let tools = tokio::task::spawn_blocking(move || ensure_tools(&tool_reqs))
            .await
            .map_err(|e| SbomGenError::Task(format!("spawn_blocking failed: {e}")))??;

        let mut graphs: Vec<PackageGraph> = Vec::new();
        let mut lockfiles = Vec::new();

        for scan_dir in &self.config.scan_dirs {
            let dir = std::path::PathBuf::from(scan_dir);
            let max_file_size = self.config.max_file_size;
            let found = tokio::task::spawn_blocking(move || {
                let detector = LockfileDetector::new();
                discover_lockfiles(&dir, &detector, max_file_size)
            })
            .await
            .map_err(|e| SbomGenError::Task(format!("spawn_blocking failed: {e}")))??;

            for (path, content) in found {
                let file_path = Path::new(&path);
                let parser = match self.parsers.iter().find(|p| p.can_parse(file_path)) {
                    Some(p) => p,
                    None => {
                        debug!(path = %path, "no parser for lockfile, skipping");
                        continue;
                    }
                };

                let graph = parser.parse(&content, &path)?;

                if graph.package_count() > self.config.max_packages {
                    return Err(SbomGenError::Generation(format!(
                        "{path}: {} packages exceeds limit of {}",
                        graph.package_count(),
                        self.config.max_packages
                    )));
                }

                info!(
                    path = %path,
                    ecosystem = %graph.ecosystem,
                    packages = graph.package_count(),
                    "parsed lockfile"
                );

                lockfiles.push(path);
                graphs.push(graph);
            }
        }

        let package_count = graphs.iter().map(PackageGraph::package_count).sum();

        let document = self.generator.generate(&graphs)?;

        // Self-check before anything touches the filesystem
        let report = validate_document(&document.content, document.format);
        if !report.is_valid() {
            let details: Vec<String> =
                report.violations.iter().map(ToString::to_string).collect();
            return Err(SbomGenError::Validation(format!(
                "generated document failed validation: {}",
                details.join("; ")
            )));
        }

        let output_path = self.config.output_path.clone();
        let content = document.content.clone();
        tokio::task::spawn_blocking(move || write_atomic(&output_path, &content))
            .await
            .map_err(|e| SbomGenError::Task(format!("spawn_blocking failed: {e}")))??;

        info!(
            output = %self.config.output_path,
            components = document.component_count,
            format = %document.format,
            "sbom written"
        );

        Ok(GenerateSummary {
            lockfiles,
            package_count,
            component_count: document.component_count,
            output_path: self.config.output_path.clone(),
            format: document.format.to_string(),
            tools,
        })
    }
}

/// Write content to `path` through a temp file in the same directory,
/// then rename. Readers never observe a partially written SBOM.
fn write_atomic(path: &str, content: &str) -> Result<(), SbomGenError> {
    let target = Path::new(path);
    let dir = target.parent().filter(|p| !p.as_os_str().is_empty());

    let mut tmp = match dir {
        Some(d) => tempfile::NamedTempFile::new_in(d),
        None => tempfile::NamedTempFile::new_in("."),
    }
    .map_err(|e| SbomGenError::Io {
        path: path.to_owned(),
        source: e,
    })?;

    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.write_all(b"\n"))
        .map_err(|e| SbomGenError::Io {
            path: path.to_owned(),
            source: e,
        })?;

    tmp.persist(target).map_err(|e| SbomGenError::Io {
        path: path.to_owned(),
        source: e.error,
    })?;

    Ok(())
}

/// SBOM pipeline builder.
pub struct SbomPipelineBuilder {
    config: SbomGenConfig,
    tools: ToolsConfig,
}

impl SbomPipelineBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: SbomGenConfig::default(),
            tools: ToolsConfig::default(),
        }
    }

    /// Set the generation config section.
    pub fn config(mut self, config: SbomGenConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the tool requirements.
    pub fn tools(mut self, tools: ToolsConfig) -> Self {
        self.tools = tools;
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<SbomPipeline, SbomGenError> {
        let format = SbomFormat::from_str_loose(&self.config.output_format).ok_or_else(|| {
            SbomGenError::Config {
                field: "sbom.output_format".to_owned(),
                reason: format!("unknown format '{}'", self.config.output_format),
            }
        })?;

        if self.config.scan_dirs.is_empty() {
            return Err(SbomGenError::Config {
                field: "sbom.scan_dirs".to_owned(),
                reason: "at least one scan directory required".to_owned(),
            });
        }

        Ok(SbomPipeline {
            config: self.config,
            tools: self.tools,
            parsers: default_parsers(),
            generator: SbomGenerator::new(format),
        })
    }
}

impl Default for SbomPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
