//! `bomgate generate` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use bomgate_sbom::{GenerateSummary, SbomPipelineBuilder};

use crate::cli::GenerateArgs;
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `generate` command.
pub async fn execute(
    args: GenerateArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut config = load_config(config_path).await?;

    // Command-line flags beat config file and env
    if let Some(output) = args.output {
        config.sbom.output_path = output.display().to_string();
    }
    if let Some(format) = args.format {
        config.sbom.output_format = format;
    }

    info!(
        output = %config.sbom.output_path,
        format = %config.sbom.output_format,
        "generating SBOM"
    );

    let pipeline = SbomPipelineBuilder::new()
        .config(config.sbom)
        .tools(config.tools)
        .build()?;

    let summary = pipeline.run_once().await?;

    writer.render(&GenerateReport { summary })?;

    Ok(())
}

/// Generation result report.
#[derive(Serialize)]
pub struct GenerateReport {
    #[serde(flatten)]
    pub summary: GenerateSummary,
}

impl Render for GenerateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "SBOM written: {} ({})",
            self.summary.output_path.bold(),
            self.summary.format
        )?;
        writeln!(
            w,
            "Components: {} ({} packages from {} lockfiles)",
            self.summary.component_count,
            self.summary.package_count,
            self.summary.lockfiles.len()
        )?;

        for lockfile in &self.summary.lockfiles {
            writeln!(w, "  {lockfile}")?;
        }

        if !self.summary.tools.is_empty() {
            writeln!(w, "Tools:")?;
            for tool in &self.summary.tools {
                let status = if tool.satisfied {
                    "OK".green()
                } else {
                    "MISSING".red()
                };
                writeln!(
                    w,
                    "  {} {} {}",
                    tool.name,
                    tool.version.as_deref().unwrap_or("-"),
                    status
                )?;
            }
        }

        Ok(())
    }
}
