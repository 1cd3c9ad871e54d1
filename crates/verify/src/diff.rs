//! Changed-file detection against a VCS base ref.
//!
//! The freshness check needs to know which files changed relative to a
//! base ref. [`DiffProvider`] is the seam: [`GitDiffProvider`] shells out
//! to `git` for real repositories, [`StaticDiffProvider`] serves tests and
//! non-VCS environments.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::SbomVerifyError;

/// Source of "which files changed vs the base ref".
pub trait DiffProvider: Send + Sync {
    /// Paths changed relative to `base`, repository-relative.
    ///
    /// Includes committed differences against the base ref as well as
    /// uncommitted working-tree changes.
    fn changed_files(&self, base: &str) -> Result<Vec<String>, SbomVerifyError>;
}

/// Diff provider backed by the `git` CLI.
///
/// Combines `git diff --name-only <base>` with `git status --porcelain`
/// so both committed and uncommitted changes count.
pub struct GitDiffProvider {
    repo_dir: PathBuf,
}

impl GitDiffProvider {
    /// Create a provider rooted at `repo_dir`.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }
}

impl DiffProvider for GitDiffProvider {
    fn changed_files(&self, base: &str) -> Result<Vec<String>, SbomVerifyError> {
        let diff_out = Command::new("git")
            .args(["diff", "--name-only", base])
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| SbomVerifyError::Diff(format!("failed to run git diff: {e}")))?;

        if !diff_out.status.success() {
            let stderr = String::from_utf8_lossy(&diff_out.stderr);
            return Err(SbomVerifyError::Diff(format!(
                "git diff --name-only {base} failed: {}",
                stderr.trim()
            )));
        }

        let mut files: Vec<String> = String::from_utf8_lossy(&diff_out.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect();

        // Untracked and staged-but-uncommitted files
        let status_out = Command::new("git")
            .args(["status", "--porcelain"])
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| SbomVerifyError::Diff(format!("failed to run git status: {e}")))?;

        if status_out.status.success() {
            for line in String::from_utf8_lossy(&status_out.stdout).lines() {
                // Porcelain format: "XY path" (rename lines carry "old -> new")
                let path = line.get(3..).unwrap_or("").trim();
                let path = path.rsplit(" -> ").next().unwrap_or(path);
                if !path.is_empty() {
                    files.push(path.to_owned());
                }
            }
        }

        files.sort_unstable();
        files.dedup();

        debug!(base, changed = files.len(), "computed changed files");
        Ok(files)
    }
}

/// Fixed changed-file list, for tests and environments without a VCS.
pub struct StaticDiffProvider {
    files: Vec<String>,
}

impl StaticDiffProvider {
    /// Create a provider that always reports the given files as changed.
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    /// A provider that reports a clean tree.
    pub fn clean() -> Self {
        Self { files: vec![] }
    }
}

impl DiffProvider for StaticDiffProvider {
    fn changed_files(&self, _base: &str) -> Result<Vec<String>, SbomVerifyError> {
        Ok(self.files.clone())
    }
}
