//! `bomgate verify` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use bomgate_verify::{VerifierBuilder, VerifyReport, render};

use crate::cli::VerifyArgs;
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `verify` command.
///
/// Exit is zero exactly when no check failed; a skipped run counts as
/// success.
pub async fn execute(
    args: VerifyArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut config = load_config(config_path).await?;

    if let Some(sbom_file) = args.sbom_file {
        config.verify.sbom_file = sbom_file;
    }
    if let Some(diff_base) = args.diff_base {
        config.verify.diff_base = diff_base;
    }
    config.verify.verbose |= args.verbose;
    config.verify.skip |= args.skip;

    info!(
        sbom_file = %config.verify.sbom_file,
        diff_base = %config.verify.diff_base,
        "verifying SBOM"
    );

    let verbose = config.verify.verbose;
    let verifier = VerifierBuilder::new()
        .config(config.verify)
        .scan_dirs(config.sbom.scan_dirs)
        .max_file_size(config.sbom.max_file_size)
        .build();

    let report = verifier.run().await?;
    let passed = report.passed();
    let failure_count = report.failure_count();
    let check_count = report.outcomes.len();

    writer.render(&VerifyCliReport { report, verbose })?;

    if !passed {
        return Err(CliError::Verification(format!(
            "{failure_count} of {check_count} checks failed"
        )));
    }

    Ok(())
}

/// Verification report wrapper carrying the verbose flag for text output.
#[derive(Serialize)]
pub struct VerifyCliReport {
    #[serde(flatten)]
    pub report: VerifyReport,
    #[serde(skip)]
    pub verbose: bool,
}

impl Render for VerifyCliReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        write!(w, "{}", render(&self.report, self.verbose))
    }
}
