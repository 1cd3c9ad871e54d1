//! SBOM verification for the bomgate workspace.
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`SbomVerifyError`)
//! - [`diff`]: Changed-file detection (`DiffProvider` trait, git and
//!   static implementations)
//! - [`verifier`]: The six ordered checks (`Verifier`, `VerifyReport`)
//! - [`report`]: Grep-able text rendering (`[PASS]`/`[FAIL]`/`[SKIP]`)
//!
//! A failed check is data, not an error: [`Verifier::run`] only errors on
//! infrastructure problems (unreadable file after the existence check, a
//! broken diff provider). Callers inspect [`VerifyReport::passed`].

pub mod diff;
pub mod error;
pub mod report;
pub mod verifier;

// --- Public API Re-exports ---

pub use diff::{DiffProvider, GitDiffProvider, StaticDiffProvider};
pub use error::SbomVerifyError;
pub use report::{FAIL_SUMMARY, PASS_SUMMARY, SKIP_MARKER, render};
pub use verifier::{CheckOutcome, CheckStatus, Verifier, VerifierBuilder, VerifyReport};
