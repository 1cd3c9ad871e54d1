//! Integration tests for SBOM verification
//!
//! Each test mirrors one situation a CI pipeline hits: clean tree, skip
//! flag, broken or stale SBOM, uncovered packages, verbose output.

use bomgate_core::config::VerifyConfig;
use bomgate_verify::{StaticDiffProvider, Verifier, VerifierBuilder, VerifyReport, render};

const REQUIREMENTS: &str = "requests==2.31.0\nflask==3.0.3\n";

/// CycloneDX document covering both pins of [`REQUIREMENTS`].
const CURRENT_SBOM: &str = r#"{
  "bomFormat": "CycloneDX",
  "specVersion": "1.5",
  "serialNumber": "urn:uuid:11111111-2222-3333-4444-555555555555",
  "version": 1,
  "components": [
    { "type": "library", "name": "flask", "version": "3.0.3", "purl": "pkg:pypi/flask@3.0.3" },
    { "type": "library", "name": "requests", "version": "2.31.0", "purl": "pkg:pypi/requests@2.31.0" }
  ]
}"#;

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), REQUIREMENTS).unwrap();
        Self { dir }
    }

    fn write_sbom(&self, content: &str) {
        std::fs::write(self.sbom_path(), content).unwrap();
    }

    fn sbom_path(&self) -> std::path::PathBuf {
        self.dir.path().join("sbom.json")
    }

    fn verifier(&self, changed: Vec<&str>) -> Verifier {
        self.verifier_with_config(changed, VerifyConfig::default())
    }

    fn verifier_with_config(&self, changed: Vec<&str>, mut config: VerifyConfig) -> Verifier {
        config.sbom_file = self.sbom_path().display().to_string();
        VerifierBuilder::new()
            .config(config)
            .scan_dirs(vec![self.dir.path().display().to_string()])
            .diff_provider(Box::new(StaticDiffProvider::new(
                changed.into_iter().map(str::to_owned).collect(),
            )))
            .build()
    }

    async fn run(&self, changed: Vec<&str>) -> VerifyReport {
        self.verifier(changed).run().await.unwrap()
    }
}

/// 1. Clean tree with a current SBOM passes every applicable check.
#[tokio::test]
async fn clean_tree_with_current_sbom_passes() {
    let fx = Fixture::new();
    fx.write_sbom(CURRENT_SBOM);

    let report = fx.run(vec![]).await;
    assert!(report.passed());

    let text = render(&report, false);
    assert!(text.contains("[PASS] exists"));
    assert!(text.contains("[PASS] coverage"));
    assert!(text.contains("SBOM verification passed"));
}

/// 2. The skip flag bypasses all checks and succeeds.
#[tokio::test]
async fn skip_flag_bypasses_verification() {
    let fx = Fixture::new();
    // No SBOM on disk at all; skip must still succeed

    let verifier = fx.verifier_with_config(
        vec![],
        VerifyConfig {
            skip: true,
            ..Default::default()
        },
    );
    let report = verifier.run().await.unwrap();

    assert!(report.skipped);
    assert!(report.passed());
    assert!(render(&report, false).contains("SBOM verification skipped"));
}

/// 3. A missing SBOM file is reported by name.
#[tokio::test]
async fn missing_sbom_file_fails() {
    let fx = Fixture::new();

    let report = fx.run(vec![]).await;
    assert!(!report.passed());
    assert!(render(&report, false).contains("SBOM file not found"));
}

/// 4. A file below the minimum plausible size fails.
#[tokio::test]
async fn truncated_sbom_fails_min_size() {
    let fx = Fixture::new();
    fx.write_sbom("{}");

    let report = fx.run(vec![]).await;
    assert!(!report.passed());
    assert!(render(&report, false).contains("SBOM file too small"));
}

/// 5. A large-enough file that is not JSON fails well-formedness.
#[tokio::test]
async fn invalid_json_fails_well_formed() {
    let fx = Fixture::new();
    fx.write_sbom(&format!("this is not json {}", "x".repeat(200)));

    let report = fx.run(vec![]).await;
    assert!(!report.passed());
    assert!(render(&report, false).contains("not valid JSON"));
}

/// 6. Valid JSON with the wrong bomFormat fails the format check.
#[tokio::test]
async fn wrong_bom_format_fails() {
    let fx = Fixture::new();
    fx.write_sbom(&CURRENT_SBOM.replace("CycloneDX", "SomethingElse"));

    let report = fx.run(vec![]).await;
    assert!(!report.passed());
    assert!(render(&report, false).contains("not a CycloneDX document"));
}

/// 7. A changed manifest without a regenerated SBOM is stale.
#[tokio::test]
async fn manifest_change_without_sbom_is_stale() {
    let fx = Fixture::new();
    fx.write_sbom(CURRENT_SBOM);

    let report = fx.run(vec!["requirements.txt"]).await;
    assert!(!report.passed());
    assert!(render(&report, false).contains("SBOM is out of date"));
}

/// 8. Manifest and SBOM changed together passes freshness.
#[tokio::test]
async fn manifest_and_sbom_regenerated_together_passes() {
    let fx = Fixture::new();
    fx.write_sbom(CURRENT_SBOM);

    let report = fx.run(vec!["requirements.txt", "sbom.json"]).await;
    assert!(report.passed());
    assert!(render(&report, false).contains("[PASS] freshness"));
}

/// 9. Changes to unrelated files leave freshness skipped and the run green.
#[tokio::test]
async fn unrelated_changes_skip_freshness() {
    let fx = Fixture::new();
    fx.write_sbom(CURRENT_SBOM);

    let report = fx.run(vec!["src/main.rs", "README.md"]).await;
    assert!(report.passed());

    let text = render(&report, false);
    assert!(text.contains("[SKIP] freshness"));
    assert!(text.contains("no dependency manifest changes"));
}

/// 10. A lockfile package absent from components fails coverage.
#[tokio::test]
async fn uncovered_package_fails_coverage() {
    let fx = Fixture::new();
    // Drop the requests component from the document
    let partial = CURRENT_SBOM.replace("pkg:pypi/requests@2.31.0", "pkg:pypi/other@0.0.1");
    fx.write_sbom(&partial);

    let report = fx.run(vec![]).await;
    assert!(!report.passed());

    let text = render(&report, false);
    assert!(text.contains("missing components"));
    assert!(text.contains("pkg:pypi/requests@2.31.0"));
}

/// 11. Verbose rendering carries per-check detail lines.
#[tokio::test]
async fn verbose_output_includes_details() {
    let fx = Fixture::new();
    fx.write_sbom(CURRENT_SBOM);

    let report = fx.run(vec![]).await;

    let terse = render(&report, false);
    let verbose = render(&report, true);
    assert!(verbose.len() > terse.len());
    // The min-size detail names the configured minimum
    assert!(verbose.contains("minimum: 128 bytes"));
}

/// Gating: checks 3-6 are skipped once the file checks fail.
#[tokio::test]
async fn later_checks_skip_when_file_is_unreadable() {
    let fx = Fixture::new();

    let report = fx.run(vec![]).await;
    let text = render(&report, false);
    assert!(text.contains("[SKIP] well-formed"));
    assert!(text.contains("[SKIP] format"));
    assert!(text.contains("[SKIP] freshness"));
    assert!(text.contains("[SKIP] coverage"));
}

/// A changed file that merely shares the SBOM's file name is not a
/// regeneration of the configured SBOM.
#[tokio::test]
async fn same_named_file_elsewhere_is_still_stale() {
    let fx = Fixture::new();
    fx.write_sbom(CURRENT_SBOM);

    let report = fx.run(vec!["requirements.txt", "docs/sbom.json"]).await;
    assert!(!report.passed());
    assert!(render(&report, false).contains("SBOM is out of date"));
}

/// Manifest paths inside subdirectories still trigger freshness.
#[tokio::test]
async fn nested_manifest_path_counts_as_manifest_change() {
    let fx = Fixture::new();
    fx.write_sbom(CURRENT_SBOM);

    let report = fx.run(vec!["web/package-lock.json"]).await;
    assert!(!report.passed());
    assert!(render(&report, false).contains("SBOM is out of date"));
}
