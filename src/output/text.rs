//! Plain-text rendering of verdicts and batch reports.
//!
//! A verdict prints `True` or `False` on its own line, followed by the tier
//! and one `Message:` line per diagnostic. Colors come from `yansi` and are
//! switched off globally by `--no-color`.

use std::io::Write;
use std::path::Path;

use bytesize::ByteSize;
use yansi::Paint;

use super::ReportError;
use crate::checker::{BatchReport, CheckResult};

/// Lines describing a single verdict.
///
/// `len` is the common file length when known; it is shown next to the tier.
#[must_use]
pub fn verdict_lines(result: &CheckResult, len: Option<u64>) -> Vec<String> {
    let verdict = if result.matched {
        "True".green().bold().to_string()
    } else {
        "False".red().bold().to_string()
    };

    let mut lines = vec![verdict];
    match len {
        Some(len) => lines.push(format!("Tier: {} ({})", result.tier, ByteSize::b(len))),
        None => lines.push(format!("Tier: {}", result.tier)),
    }
    lines.extend(
        result
            .diagnostics
            .iter()
            .map(|d| format!("Message: {}", d.dim())),
    );
    lines
}

/// Lines for the hash comparison.
#[must_use]
pub fn hash_lines(a: &Path, b: &Path, hash_a: &str, hash_b: &str) -> Vec<String> {
    let verdict = if hash_a == hash_b {
        "True".green().bold().to_string()
    } else {
        "False".red().bold().to_string()
    };
    vec![
        verdict,
        format!("{}  {}", hash_a, a.display()),
        format!("{}  {}", hash_b, b.display()),
    ]
}

/// Message printed when a batch found nothing.
#[must_use]
pub fn no_match_message(root: &Path) -> String {
    format!(
        "Batch processing of files in path: {} has completed with no likely duplicate files found.",
        root.display()
    )
}

/// Lines for a finished batch: the match report (or the no-match message),
/// then any per-pair diagnostics and an interruption note.
#[must_use]
pub fn batch_lines(report: &BatchReport) -> Vec<String> {
    let mut lines = if report.has_matches() {
        report.report_lines()
    } else {
        vec![no_match_message(&report.root)]
    };

    lines.extend(
        report
            .diagnostics
            .iter()
            .map(|d| format!("Message: {}", d.yellow())),
    );

    if report.interrupted {
        lines.push(format!(
            "{} after {} of {} checks",
            "Interrupted".yellow().bold(),
            report.checks_performed,
            report.source_files * report.target_files
        ));
    }
    lines
}

/// Write lines to a writer, one per line.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if writing fails.
pub fn write_lines<W: Write>(writer: &mut W, lines: &[String]) -> Result<(), ReportError> {
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
