//! JSON output for check and batch results.
//!
//! # Output Schema
//!
//! A single check:
//!
//! ```json
//! {
//!   "command": "check",
//!   "file_a": "/data/a.bin",
//!   "file_b": "/data/b.bin",
//!   "matched": true,
//!   "tier": { "kind": "sampled", "samples": 5 },
//!   "diagnostics": [],
//!   "exit_code": 0,
//!   "exit_code_name": "SC000",
//!   "generated_at": "2026-10-18T09:12:44.120Z"
//! }
//! ```
//!
//! A batch:
//!
//! ```json
//! {
//!   "root": "/archive",
//!   "matches": [
//!     { "source": "/archive/SourceFiles/a", "target": "/archive/b", "tier": { "kind": "exact" } }
//!   ],
//!   "summary": {
//!     "source_files": 2,
//!     "target_files": 3,
//!     "checks_performed": 6,
//!     "failed_checks": 0,
//!     "duration_ms": 12,
//!     "interrupted": false,
//!     "exit_code": 0,
//!     "exit_code_name": "SC000"
//!   },
//!   "diagnostics": [],
//!   "generated_at": "2026-10-18T09:12:44.120Z"
//! }
//! ```

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ReportError;
use crate::checker::{BatchReport, CheckResult, CheckTier, MatchPair};
use crate::error::ExitCode;

/// Result of one two-file command.
#[derive(Debug, Clone, Serialize)]
pub struct JsonCheckOutput {
    /// Subcommand that produced the verdict
    pub command: String,
    /// First file
    pub file_a: String,
    /// Second file
    pub file_b: String,
    /// Whether the files appear identical
    pub matched: bool,
    /// Tier that decided
    pub tier: CheckTier,
    /// Notes explaining a negative verdict
    pub diagnostics: Vec<String>,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "SC000")
    pub exit_code_name: String,
    /// When the document was produced
    pub generated_at: DateTime<Utc>,
}

impl JsonCheckOutput {
    /// Build the document for a finished check.
    #[must_use]
    pub fn new(command: &str, a: &Path, b: &Path, result: &CheckResult, exit_code: ExitCode) -> Self {
        Self {
            command: command.to_string(),
            file_a: normalize_path(a),
            file_b: normalize_path(b),
            matched: result.matched,
            tier: result.tier,
            diagnostics: result.diagnostics.clone(),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
            generated_at: Utc::now(),
        }
    }

    /// Serialize to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), ReportError> {
        write_json(self, writer, pretty)
    }
}

/// Result of the whole-file hash comparison.
#[derive(Debug, Clone, Serialize)]
pub struct JsonHashOutput {
    /// First file
    pub file_a: String,
    /// Second file
    pub file_b: String,
    /// BLAKE3 digest of the first file (hex)
    pub hash_a: String,
    /// BLAKE3 digest of the second file (hex)
    pub hash_b: String,
    /// Whether the digests are equal
    pub matched: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name
    pub exit_code_name: String,
    /// When the document was produced
    pub generated_at: DateTime<Utc>,
}

impl JsonHashOutput {
    /// Build the document from two hex digests.
    #[must_use]
    pub fn new(a: &Path, b: &Path, hash_a: String, hash_b: String) -> Self {
        let matched = hash_a == hash_b;
        let exit_code = ExitCode::from_verdict(matched);
        Self {
            file_a: normalize_path(a),
            file_b: normalize_path(b),
            hash_a,
            hash_b,
            matched,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
            generated_at: Utc::now(),
        }
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), ReportError> {
        write_json(self, writer, pretty)
    }
}

/// A matching pair in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonMatch {
    /// File from the source subfolder
    pub source: String,
    /// File from the root folder
    pub target: String,
    /// Tier that produced the verdict
    pub tier: CheckTier,
}

impl From<&MatchPair> for JsonMatch {
    fn from(pair: &MatchPair) -> Self {
        Self {
            source: normalize_path(&pair.source),
            target: normalize_path(&pair.target),
            tier: pair.tier,
        }
    }
}

/// Batch counters in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonBatchSummary {
    /// Files in the source subfolder
    pub source_files: usize,
    /// Files at the top level of the root
    pub target_files: usize,
    /// Pair checks that ran
    pub checks_performed: usize,
    /// Pair checks that ended in an error
    pub failed_checks: usize,
    /// Duration of the batch in milliseconds
    pub duration_ms: u64,
    /// Whether the batch was interrupted
    pub interrupted: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name
    pub exit_code_name: String,
}

/// Complete batch document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonBatchOutput {
    /// Root folder that was checked
    pub root: String,
    /// Matching pairs in source-major order
    pub matches: Vec<JsonMatch>,
    /// Counters
    pub summary: JsonBatchSummary,
    /// One line per failed pair
    pub diagnostics: Vec<String>,
    /// When the document was produced
    pub generated_at: DateTime<Utc>,
}

impl JsonBatchOutput {
    /// Build the document for a finished batch.
    #[must_use]
    pub fn new(report: &BatchReport, exit_code: ExitCode) -> Self {
        Self {
            root: normalize_path(&report.root),
            matches: report.matches.iter().map(JsonMatch::from).collect(),
            summary: JsonBatchSummary {
                source_files: report.source_files,
                target_files: report.target_files,
                checks_performed: report.checks_performed,
                failed_checks: report.failed_checks,
                duration_ms: report.duration.as_millis() as u64,
                interrupted: report.interrupted,
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
            diagnostics: report.diagnostics.clone(),
            generated_at: Utc::now(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), ReportError> {
        write_json(self, writer, pretty)
    }
}

fn write_json<T: Serialize, W: Write>(
    value: &T,
    writer: &mut W,
    pretty: bool,
) -> Result<(), ReportError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Canonical path string, or the path as given if it cannot be resolved.
fn normalize_path(path: &Path) -> String {
    match path.canonicalize() {
        Ok(canonical) => canonical.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
