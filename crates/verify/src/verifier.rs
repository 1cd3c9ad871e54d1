//! SBOM verification checks.
//!
//! [`Verifier`] runs six ordered checks over an SBOM file and collects one
//! outcome per check instead of stopping at the first failure, so a CI log
//! shows the whole picture in one run:
//!
//! 1. **exists**: the SBOM file is present
//! 2. **min-size**: the file is at least `min_size_bytes`
//! 3. **well-formed**: the file parses as JSON
//! 4. **format**: `bomFormat`/`specVersion` identify a CycloneDX document
//! 5. **freshness**: dependency manifests did not change without the SBOM
//! 6. **coverage**: every lockfile package appears in `components` by purl
//!
//! Checks 3-6 are skipped when 1 or 2 fail (nothing to parse), and 4/6 are
//! skipped when 3 fails.

use std::collections::HashSet;
use std::path::{Component, Path};

use serde::Serialize;
use tracing::{info, warn};

use bomgate_core::config::{SbomGenConfig, VerifyConfig};
use bomgate_sbom::{LockfileDetector, discover_lockfiles, default_parsers};

use crate::diff::{DiffProvider, GitDiffProvider};
use crate::error::SbomVerifyError;

/// Accepted CycloneDX spec versions.
const CYCLONEDX_SPEC_VERSIONS: [&str; 3] = ["1.4", "1.5", "1.6"];

/// Outcome status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Check ran and passed.
    Pass,
    /// Check ran and failed.
    Fail,
    /// Check did not apply.
    Skip,
}

/// One check's result.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    /// Check name (exists, min-size, well-formed, format, freshness, coverage).
    pub name: String,
    /// Pass, fail, or skip.
    pub status: CheckStatus,
    /// One-line result message.
    pub message: String,
    /// Extra context shown in verbose output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckOutcome {
    fn pass(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_owned(),
            status: CheckStatus::Pass,
            message: message.into(),
            detail: None,
        }
    }

    fn fail(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_owned(),
            status: CheckStatus::Fail,
            message: message.into(),
            detail: None,
        }
    }

    fn skip(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_owned(),
            status: CheckStatus::Skip,
            message: message.into(),
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Full verification result.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    /// Path of the verified SBOM.
    pub sbom_file: String,
    /// Per-check outcomes, in check order. Empty when skipped.
    pub outcomes: Vec<CheckOutcome>,
    /// Whether verification was skipped via the skip flag.
    pub skipped: bool,
}

impl VerifyReport {
    /// Whether verification succeeded (skipped counts as success).
    pub fn passed(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.status != CheckStatus::Fail)
    }

    /// Number of failed checks.
    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == CheckStatus::Fail)
            .count()
    }
}

/// SBOM verifier.
pub struct Verifier {
    config: VerifyConfig,
    scan_dirs: Vec<String>,
    max_file_size: usize,
    diff: Box<dyn DiffProvider>,
}

impl Verifier {
    /// Run all checks and collect the report.
    pub async fn run(&self) -> Result<VerifyReport, SbomVerifyError> {
        if self.config.skip {
            info!("verification skipped by configuration");
            return Ok(VerifyReport {
                sbom_file: self.config.sbom_file.clone(),
                outcomes: vec![],
                skipped: true,
            });
        }

        let mut outcomes = Vec::with_capacity(6);
        let sbom_file = &self.config.sbom_file;

        // 1. exists
        let metadata = tokio::fs::metadata(sbom_file).await.ok();
        let exists = metadata.is_some();
        outcomes.push(if exists {
            CheckOutcome::pass("exists", format!("{sbom_file} present"))
        } else {
            CheckOutcome::fail("exists", format!("SBOM file not found: {sbom_file}"))
        });

        // 2. min-size
        let size_ok = match &metadata {
            Some(m) => {
                let size = usize::try_from(m.len()).unwrap_or(usize::MAX);
                if size >= self.config.min_size_bytes {
                    outcomes.push(
                        CheckOutcome::pass("min-size", format!("{size} bytes"))
                            .with_detail(format!("minimum: {} bytes", self.config.min_size_bytes)),
                    );
                    true
                } else {
                    outcomes.push(CheckOutcome::fail(
                        "min-size",
                        format!(
                            "SBOM file too small: {size} bytes (min {})",
                            self.config.min_size_bytes
                        ),
                    ));
                    false
                }
            }
            None => {
                outcomes.push(CheckOutcome::skip("min-size", "no file to measure"));
                false
            }
        };

        if !exists || !size_ok {
            outcomes.push(CheckOutcome::skip("well-formed", "unreadable SBOM"));
            outcomes.push(CheckOutcome::skip("format", "unreadable SBOM"));
            outcomes.push(CheckOutcome::skip("freshness", "unreadable SBOM"));
            outcomes.push(CheckOutcome::skip("coverage", "unreadable SBOM"));
            return Ok(VerifyReport {
                sbom_file: sbom_file.clone(),
                outcomes,
                skipped: false,
            });
        }

        let content =
            tokio::fs::read_to_string(sbom_file)
                .await
                .map_err(|e| SbomVerifyError::Io {
                    path: sbom_file.clone(),
                    source: e,
                })?;

        // 3. well-formed
        let document: Option<serde_json::Value> = match serde_json::from_str(&content) {
            Ok(v) => {
                outcomes.push(CheckOutcome::pass("well-formed", "valid JSON"));
                Some(v)
            }
            Err(e) => {
                outcomes.push(
                    CheckOutcome::fail("well-formed", "not valid JSON")
                        .with_detail(e.to_string()),
                );
                None
            }
        };

        // 4. format
        match &document {
            Some(doc) => outcomes.push(check_format(doc)),
            None => outcomes.push(CheckOutcome::skip("format", "unparsed document")),
        }

        // 5. freshness
        outcomes.push(self.check_freshness()?);

        // 6. coverage
        match &document {
            Some(doc) => outcomes.push(self.check_coverage(doc).await?),
            None => outcomes.push(CheckOutcome::skip("coverage", "unparsed document")),
        }

        Ok(VerifyReport {
            sbom_file: sbom_file.clone(),
            outcomes,
            skipped: false,
        })
    }

    /// Freshness: a manifest change without a matching SBOM change means
    /// the document is stale.
    fn check_freshness(&self) -> Result<CheckOutcome, SbomVerifyError> {
        let changed = self.diff.changed_files(&self.config.diff_base)?;

        let detector = LockfileDetector::new();
        let changed_manifests: Vec<&String> = changed
            .iter()
            .filter(|path| detector.is_lockfile(Path::new(path.as_str())))
            .collect();

        let sbom_path = Path::new(&self.config.sbom_file);
        let sbom_changed = changed
            .iter()
            .any(|path| names_sbom_file(sbom_path, Path::new(path)));

        let detail = format!(
            "base: {}, changed files: {}",
            self.config.diff_base,
            changed.len()
        );

        if changed_manifests.is_empty() {
            return Ok(
                CheckOutcome::skip("freshness", "no dependency manifest changes")
                    .with_detail(detail),
            );
        }

        let manifest_list: Vec<&str> = changed_manifests.iter().map(|s| s.as_str()).collect();

        if sbom_changed {
            Ok(CheckOutcome::pass(
                "freshness",
                "SBOM regenerated alongside manifest changes",
            )
            .with_detail(format!("{detail}, manifests: {}", manifest_list.join(", "))))
        } else {
            Ok(CheckOutcome::fail(
                "freshness",
                format!("SBOM is out of date: {} changed", manifest_list.join(", ")),
            )
            .with_detail(detail))
        }
    }

    /// Coverage: every package in the current lockfiles must appear in
    /// the document's components by purl.
    async fn check_coverage(
        &self,
        document: &serde_json::Value,
    ) -> Result<CheckOutcome, SbomVerifyError> {
        let component_purls: HashSet<String> = document["components"]
            .as_array()
            .map(|components| {
                components
                    .iter()
                    .filter_map(|c| c["purl"].as_str())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let mut lockfile_count = 0usize;
        let mut expected = 0usize;
        let mut missing: Vec<String> = Vec::new();

        for scan_dir in &self.scan_dirs {
            let dir = std::path::PathBuf::from(scan_dir);
            let max_file_size = self.max_file_size;
            let found = tokio::task::spawn_blocking(move || {
                let detector = LockfileDetector::new();
                discover_lockfiles(&dir, &detector, max_file_size)
            })
            .await
            .map_err(|e| SbomVerifyError::Task(format!("spawn_blocking failed: {e}")))?
            .map_err(|e| SbomVerifyError::Task(e.to_string()))?;

            let parsers = default_parsers();
            for (path, content) in found {
                let file_path = Path::new(&path);
                let Some(parser) = parsers.iter().find(|p| p.can_parse(file_path)) else {
                    continue;
                };

                let graph = match parser.parse(&content, &path) {
                    Ok(g) => g,
                    Err(e) => {
                        warn!(path = %path, error = %e, "skipping unparseable lockfile in coverage check");
                        continue;
                    }
                };

                lockfile_count += 1;
                expected += graph.package_count();

                for pkg in &graph.packages {
                    if !component_purls.contains(&pkg.purl) {
                        missing.push(pkg.purl.clone());
                    }
                }
            }
        }

        if lockfile_count == 0 {
            return Ok(CheckOutcome::skip("coverage", "no lockfiles found"));
        }

        missing.sort_unstable();
        missing.dedup();

        if missing.is_empty() {
            Ok(CheckOutcome::pass(
                "coverage",
                format!("{expected} packages covered"),
            )
            .with_detail(format!("lockfiles: {lockfile_count}")))
        } else {
            let shown: Vec<&str> = missing.iter().take(5).map(|s| s.as_str()).collect();
            let suffix = if missing.len() > shown.len() {
                format!(" (+{} more)", missing.len() - shown.len())
            } else {
                String::new()
            };
            Ok(CheckOutcome::fail(
                "coverage",
                format!("missing components: {}{suffix}", shown.join(", ")),
            )
            .with_detail(format!("{} of {expected} packages absent", missing.len())))
        }
    }
}

/// Whether a changed path from the diff names the configured SBOM file.
///
/// Diff output is repository-relative while the configured path may be
/// absolute or carry extra leading directories, so the changed path must
/// match the configured one as a trailing component sequence: a changed
/// `sbom.json` matches `/ci/work/sbom.json`, but `docs/sbom.json` does not.
fn names_sbom_file(sbom: &Path, changed: &Path) -> bool {
    let changed = normal_components(changed);
    if changed.is_empty() {
        return false;
    }
    let sbom = normal_components(sbom);
    sbom.len() >= changed.len() && sbom[sbom.len() - changed.len()..] == changed[..]
}

fn normal_components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn check_format(document: &serde_json::Value) -> CheckOutcome {
    let bom_format = document["bomFormat"].as_str();
    let spec_version = document["specVersion"].as_str();

    let format_ok = bom_format == Some("CycloneDX");
    let version_ok = spec_version.is_some_and(|v| CYCLONEDX_SPEC_VERSIONS.contains(&v));

    if format_ok && version_ok {
        CheckOutcome::pass(
            "format",
            format!("CycloneDX {}", spec_version.unwrap_or("?")),
        )
    } else {
        CheckOutcome::fail("format", "not a CycloneDX document").with_detail(format!(
            "bomFormat: {:?}, specVersion: {:?}",
            bom_format, spec_version
        ))
    }
}

/// Verifier builder.
pub struct VerifierBuilder {
    config: VerifyConfig,
    scan_dirs: Vec<String>,
    max_file_size: usize,
    diff: Option<Box<dyn DiffProvider>>,
}

impl VerifierBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: VerifyConfig::default(),
            scan_dirs: vec![".".to_owned()],
            max_file_size: SbomGenConfig::default().max_file_size,
            diff: None,
        }
    }

    /// Set the verification config section.
    pub fn config(mut self, config: VerifyConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the directories scanned for lockfiles by the coverage check.
    pub fn scan_dirs(mut self, dirs: Vec<String>) -> Self {
        self.scan_dirs = dirs;
        self
    }

    /// Set the maximum lockfile size the coverage scan accepts, so verify
    /// sees the same lockfile set as generation.
    pub fn max_file_size(mut self, max_file_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Replace the diff provider (defaults to git in the current directory).
    pub fn diff_provider(mut self, provider: Box<dyn DiffProvider>) -> Self {
        self.diff = Some(provider);
        self
    }

    /// Build the verifier.
    pub fn build(self) -> Verifier {
        Verifier {
            config: self.config,
            scan_dirs: self.scan_dirs,
            max_file_size: self.max_file_size,
            diff: self
                .diff
                .unwrap_or_else(|| Box::new(GitDiffProvider::new("."))),
        }
    }
}

impl Default for VerifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
