//! `bomgate enrich` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use bomgate_enrich::{EnrichSummary, Enricher, PyPiClient};

use crate::cli::EnrichArgs;
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `enrich` command.
pub async fn execute(
    args: EnrichArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = load_config(config_path).await?;

    let delay_ms = args.delay_ms.unwrap_or(config.enrich.request_delay_ms);
    let output = args.output.unwrap_or_else(|| args.input.clone());

    info!(
        input = %args.input.display(),
        output = %output.display(),
        "enriching SBOM suppliers"
    );

    let client = PyPiClient::new(delay_ms, config.enrich.timeout_secs);
    let mut enricher = Enricher::new(client);

    let summary = enricher.enrich_file(&args.input, &output).await?;

    writer.render(&EnrichReport { summary })?;

    Ok(())
}

/// Enrichment result report.
#[derive(Serialize)]
pub struct EnrichReport {
    #[serde(flatten)]
    pub summary: EnrichSummary,
}

impl Render for EnrichReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Enriched {} of {} components",
            self.summary.updated, self.summary.examined
        )?;
        writeln!(w, "Written to: {}", self.summary.output_path.bold())?;
        Ok(())
    }
}
