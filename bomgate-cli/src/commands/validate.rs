//! `bomgate validate` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use bomgate_core::types::SbomFormat;
use bomgate_sbom::validate_document;

use crate::cli::ValidateArgs;
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `validate` command.
pub async fn execute(
    args: ValidateArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = load_config(config_path).await?;

    let format_name = args
        .format
        .unwrap_or_else(|| config.sbom.output_format.clone());
    let format = SbomFormat::from_str_loose(&format_name).ok_or_else(|| {
        CliError::Command(format!(
            "invalid SBOM format: {format_name} (expected: cyclonedx, spdx)"
        ))
    })?;

    info!(file = %args.file.display(), format = %format, "validating SBOM");

    let content = tokio::fs::read_to_string(&args.file).await?;
    let validation = validate_document(&content, format);

    let report = ValidateReport {
        file: args.file.display().to_string(),
        format: format.to_string(),
        valid: validation.is_valid(),
        component_count: validation.component_count,
        violations: validation
            .violations
            .iter()
            .map(ToString::to_string)
            .collect(),
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Command(format!(
            "document is invalid ({} violations)",
            report.violations.len()
        )));
    }

    Ok(())
}

/// Validation result report.
#[derive(Serialize)]
pub struct ValidateReport {
    /// Validated file path.
    pub file: String,
    /// Document format checked against.
    pub format: String,
    /// Whether the document passed all structural checks.
    pub valid: bool,
    /// Component count, when the document was parseable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_count: Option<usize>,
    /// Violation messages (empty if valid).
    pub violations: Vec<String>,
}

impl Render for ValidateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Validation: {} ({})", self.file.bold(), self.format)?;

        if let Some(count) = self.component_count {
            writeln!(w, "  Components: {count}")?;
        }

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for violation in &self.violations {
                writeln!(w, "  Violation: {}", violation.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_report_render_valid() {
        let report = ValidateReport {
            file: "sbom.json".to_owned(),
            format: "cyclonedx".to_owned(),
            valid: true,
            component_count: Some(5),
            violations: vec![],
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("VALID"), "should show valid status");
        assert!(output.contains("Components: 5"));
        assert!(!output.contains("Violation:"), "should not show violations");
    }

    #[test]
    fn test_validate_report_render_invalid() {
        let report = ValidateReport {
            file: "sbom.json".to_owned(),
            format: "cyclonedx".to_owned(),
            valid: false,
            component_count: None,
            violations: vec!["/components/0: missing name".to_owned()],
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("INVALID"), "should show invalid status");
        assert!(output.contains("missing name"), "should show violations");
    }

    #[test]
    fn test_validate_report_json_omits_missing_count() {
        let report = ValidateReport {
            file: "sbom.json".to_owned(),
            format: "spdx".to_owned(),
            valid: false,
            component_count: None,
            violations: vec!["/: not valid JSON".to_owned()],
        };

        let json = serde_json::to_string(&report).expect("JSON serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");

        assert_eq!(parsed["valid"].as_bool(), Some(false));
        assert!(parsed.get("component_count").is_none());
        assert_eq!(parsed["violations"].as_array().map(Vec::len), Some(1));
    }
}
