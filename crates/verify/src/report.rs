//! Text rendering of verification reports.
//!
//! One `[PASS]`/`[FAIL]`/`[SKIP]` line per check plus a summary line. The
//! markers are stable; CI pipelines grep for them.

use crate::verifier::{CheckStatus, VerifyReport};

/// Skip marker printed when verification is bypassed.
pub const SKIP_MARKER: &str = "SBOM verification skipped";
/// Summary line for a successful run.
pub const PASS_SUMMARY: &str = "SBOM verification passed";
/// Summary line for a failed run.
pub const FAIL_SUMMARY: &str = "SBOM verification failed";

/// Render a report as grep-able text.
///
/// With `verbose`, checks that carry extra context get an indented detail
/// line under their marker line.
pub fn render(report: &VerifyReport, verbose: bool) -> String {
    if report.skipped {
        return format!("{SKIP_MARKER}\n");
    }

    let mut out = String::new();

    for outcome in &report.outcomes {
        let marker = match outcome.status {
            CheckStatus::Pass => "[PASS]",
            CheckStatus::Fail => "[FAIL]",
            CheckStatus::Skip => "[SKIP]",
        };
        out.push_str(&format!("{marker} {}: {}\n", outcome.name, outcome.message));

        if verbose {
            if let Some(ref detail) = outcome.detail {
                out.push_str(&format!("       {detail}\n"));
            }
        }
    }

    if report.passed() {
        out.push_str(PASS_SUMMARY);
    } else {
        out.push_str(&format!(
            "{FAIL_SUMMARY} ({} of {} checks failed)",
            report.failure_count(),
            report.outcomes.len()
        ));
    }
    out.push('\n');

    out
}
