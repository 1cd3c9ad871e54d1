//! Lockfile discovery -- directory scan and content loading
//!
//! Scans configured directories for known lockfiles and reads their
//! contents. Scanning is non-recursive; only direct children of each scan
//! directory are examined.

use std::path::Path;

use tracing::warn;

use crate::error::SbomGenError;
use crate::parser::LockfileDetector;

/// Discover lockfiles in a directory and read their contents (sync I/O).
///
/// Must be called inside `tokio::task::spawn_blocking` from async contexts.
///
/// # Returns
///
/// `(path, content)` pairs for every readable lockfile within the size
/// limit. A missing directory yields an empty result, not an error.
pub fn discover_lockfiles(
    dir: &Path,
    detector: &LockfileDetector,
    max_file_size: usize,
) -> Result<Vec<(String, String)>, SbomGenError> {
    let mut results = Vec::new();

    if !dir.exists() {
        warn!(dir = %dir.display(), "scan directory does not exist");
        return Ok(results);
    }

    let entries = std::fs::read_dir(dir).map_err(|e| SbomGenError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "failed to read directory entry");
                continue;
            }
        };

        let path = entry.path();

        if !detector.is_lockfile(&path) {
            continue;
        }

        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read file metadata");
                continue;
            }
        };

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                max = max_file_size,
                "lockfile too large, skipping"
            );
            continue;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read lockfile");
                continue;
            }
        };

        results.push((path.display().to_string(), content));
    }

    // read_dir order is platform-dependent
    results.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(results)
}
