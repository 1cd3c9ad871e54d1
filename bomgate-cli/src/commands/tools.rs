//! `bomgate tools` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use bomgate_sbom::tools::{ToolStatus, check_tools};

use crate::cli::{ToolsAction, ToolsArgs};
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `tools` command.
pub async fn execute(
    args: ToolsArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ToolsAction::Check => execute_check(config_path, writer).await,
    }
}

async fn execute_check(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    let config = load_config(config_path).await?;
    let requirements = config.tools.required;

    info!(count = requirements.len(), "checking tool prerequisites");

    let statuses = tokio::task::spawn_blocking(move || check_tools(&requirements))
        .await
        .map_err(|e| CliError::Command(format!("tool check task failed: {e}")))?;

    let report = ToolsReport {
        satisfied: statuses.iter().all(|s| s.satisfied),
        tools: statuses,
    };

    writer.render(&report)?;

    if !report.satisfied {
        let missing: Vec<&str> = report
            .tools
            .iter()
            .filter(|s| !s.satisfied)
            .map(|s| s.name.as_str())
            .collect();
        return Err(CliError::Command(format!(
            "unsatisfied tool requirements: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Tool check report.
#[derive(Serialize)]
pub struct ToolsReport {
    /// Whether every requirement is satisfied.
    pub satisfied: bool,
    /// Per-tool status.
    pub tools: Vec<ToolStatus>,
}

impl Render for ToolsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Tool check:")?;
        for tool in &self.tools {
            let status = if tool.satisfied {
                "OK".green().bold()
            } else if tool.found {
                "OUTDATED".yellow().bold()
            } else {
                "MISSING".red().bold()
            };
            writeln!(
                w,
                "  {:<12} {:<12} {}",
                tool.name,
                tool.version.as_deref().unwrap_or("-"),
                status
            )?;
        }

        Ok(())
    }
}
