//! External tool prerequisite checks
//!
//! Before generating an SBOM the pipeline verifies that the tools named in
//! the `[tools]` config section exist on PATH and, when a minimum version
//! is declared, that the installed version satisfies it.
//!
//! Versions are probed with `<tool> --version` and compared with semver.

use std::process::Command;

use serde::Serialize;
use tracing::{debug, warn};

use bomgate_core::types::ToolRequirement;

use crate::error::SbomGenError;

/// Result of checking one tool requirement.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    /// Executable name.
    pub name: String,
    /// Whether the executable was found and ran.
    pub found: bool,
    /// Version parsed from `--version` output, when available.
    pub version: Option<String>,
    /// Whether the requirement (presence + min version) is satisfied.
    pub satisfied: bool,
}

/// Check all tool requirements, collecting one status per tool.
///
/// Never fails on an unsatisfied requirement; callers decide whether a
/// missing tool aborts the run. See [`ensure_tools`].
pub fn check_tools(requirements: &[ToolRequirement]) -> Vec<ToolStatus> {
    requirements.iter().map(check_tool).collect()
}

/// Check all tool requirements and fail on the first unsatisfied one.
pub fn ensure_tools(requirements: &[ToolRequirement]) -> Result<Vec<ToolStatus>, SbomGenError> {
    let statuses = check_tools(requirements);

    for status in &statuses {
        if !status.satisfied {
            let reason = if !status.found {
                "not found on PATH".to_owned()
            } else {
                format!(
                    "version {} does not satisfy the minimum requirement",
                    status.version.as_deref().unwrap_or("unknown")
                )
            };
            return Err(SbomGenError::Tool {
                name: status.name.clone(),
                reason,
            });
        }
    }

    Ok(statuses)
}

fn check_tool(requirement: &ToolRequirement) -> ToolStatus {
    let output = match Command::new(&requirement.name).arg("--version").output() {
        Ok(out) => out,
        Err(e) => {
            debug!(tool = %requirement.name, error = %e, "tool probe failed");
            return ToolStatus {
                name: requirement.name.clone(),
                found: false,
                version: None,
                satisfied: false,
            };
        }
    };

    if !output.status.success() {
        warn!(tool = %requirement.name, "tool returned non-zero on --version");
        return ToolStatus {
            name: requirement.name.clone(),
            found: false,
            version: None,
            satisfied: false,
        };
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = extract_version(&stdout);

    let satisfied = match (&requirement.min_version, &version) {
        (None, _) => true,
        (Some(min), Some(found)) => version_satisfies(found, min),
        (Some(_), None) => {
            warn!(
                tool = %requirement.name,
                output = %stdout.trim(),
                "could not parse version from tool output"
            );
            false
        }
    };

    ToolStatus {
        name: requirement.name.clone(),
        found: true,
        version,
        satisfied,
    }
}

/// Pull the first semver-looking token out of `--version` output.
///
/// Handles outputs like "git version 2.39.2" and "jq-1.7.1".
fn extract_version(output: &str) -> Option<String> {
    let first_line = output.lines().next()?;

    for token in first_line.split(|c: char| c.is_whitespace() || c == '-') {
        let candidate = token.trim_start_matches('v');
        if candidate
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
            && candidate.contains('.')
        {
            return Some(candidate.to_owned());
        }
    }

    None
}

/// Compare a found version against a minimum, semver-style.
///
/// Missing components are padded with zeros, so "1.7" satisfies "1.7.0".
fn version_satisfies(found: &str, min: &str) -> bool {
    let found = match parse_lenient(found) {
        Some(v) => v,
        None => return false,
    };
    let min = match parse_lenient(min) {
        Some(v) => v,
        None => return false,
    };
    found >= min
}

fn parse_lenient(version: &str) -> Option<semver::Version> {
    // Strip anything after a build-ish suffix the tool may append
    let core: String = version
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = core.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

    Some(semver::Version::new(major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_version_git_style() {
        assert_eq!(
            extract_version("git version 2.39.2\n"),
            Some("2.39.2".to_owned())
        );
    }

    #[test]
    fn extract_version_jq_style() {
        assert_eq!(extract_version("jq-1.7.1\n"), Some("1.7.1".to_owned()));
    }

    #[test]
    fn extract_version_v_prefix() {
        assert_eq!(extract_version("v20.11.0\n"), Some("20.11.0".to_owned()));
    }

    #[test]
    fn extract_version_no_version() {
        assert_eq!(extract_version("usage: tool [options]\n"), None);
    }

    #[test]
    fn version_satisfies_exact() {
        assert!(version_satisfies("2.39.2", "2.39.2"));
    }

    #[test]
    fn version_satisfies_newer() {
        assert!(version_satisfies("2.40.0", "2.39.2"));
    }

    #[test]
    fn version_satisfies_rejects_older() {
        assert!(!version_satisfies("2.30.0", "2.39.2"));
    }

    #[test]
    fn version_satisfies_pads_missing_components() {
        assert!(version_satisfies("1.7", "1.7.0"));
        assert!(version_satisfies("1.7.0", "1.7"));
    }

    #[test]
    fn check_missing_tool_not_satisfied() {
        let req = ToolRequirement {
            name: "definitely-not-a-real-tool-xyz".to_owned(),
            min_version: None,
        };
        let status = check_tool(&req);
        assert!(!status.found);
        assert!(!status.satisfied);
    }

    #[test]
    fn ensure_tools_fails_on_missing() {
        let reqs = vec![ToolRequirement {
            name: "definitely-not-a-real-tool-xyz".to_owned(),
            min_version: None,
        }];
        let result = ensure_tools(&reqs);
        assert!(matches!(result, Err(SbomGenError::Tool { .. })));
    }

    #[test]
    fn ensure_tools_empty_requirements() {
        let statuses = ensure_tools(&[]).unwrap();
        assert!(statuses.is_empty());
    }
}
