//! Batch checking of a source subfolder against a root folder.
//!
//! # Overview
//!
//! Every file in `<root>/<source_dir>` is checked against every file at the
//! top level of `<root>`. All |sources| x |targets| pairs are checked; there
//! is no deduplication of reported pairs and no early exit on a match.
//!
//! Pairs are independent, so they run on a bounded rayon pool. Results are
//! gathered back in source-major pair order, which keeps reports stable
//! regardless of scheduling. A pair that fails with an error is recorded as
//! a diagnostic and the batch carries on with the remaining pairs.
//!
//! # Example
//!
//! ```no_run
//! use spotcheck::checker::SpotChecker;
//! use std::path::Path;
//!
//! let report = SpotChecker::with_defaults()
//!     .batch_check(Path::new("/backups"))
//!     .unwrap();
//! for line in report.report_lines() {
//!     println!("{line}");
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::{CheckResult, CheckTier, SpotChecker};
use crate::sampler::{SampleError, SampleResult};
use crate::scanner::{batch_inputs, ScanError};

/// Header line emitted before the first reported match.
pub const MATCH_HEADER: &str = "Matches found. See detail results below.";

/// A source/target pair judged to be duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPair {
    /// File from the source subfolder
    pub source: PathBuf,
    /// File from the root folder
    pub target: PathBuf,
    /// Tier that produced the positive verdict
    pub tier: CheckTier,
}

/// Outcome of a batch check.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Root folder that was scanned
    pub root: PathBuf,
    /// Matching pairs in source-major order
    pub matches: Vec<MatchPair>,
    /// Number of files in the source subfolder
    pub source_files: usize,
    /// Number of files at the top level of the root
    pub target_files: usize,
    /// Number of pair checks that ran (including failed ones)
    pub checks_performed: usize,
    /// Number of pair checks that ended in an error
    pub failed_checks: usize,
    /// Errors encountered, one line per failed pair
    pub diagnostics: Vec<String>,
    /// Whether the batch stopped early on a shutdown request
    pub interrupted: bool,
    /// Wall-clock duration of the batch
    pub duration: Duration,
}

impl BatchReport {
    /// Whether any pair matched.
    #[must_use]
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Human-readable match report.
    ///
    /// Empty when nothing matched. Otherwise a header line followed by one
    /// `SourceFile: ...` / `TargetFile: ...` entry per match.
    ///
    /// # Example
    ///
    /// ```
    /// use spotcheck::checker::{BatchReport, CheckTier, MatchPair};
    /// use std::path::PathBuf;
    ///
    /// let report = BatchReport {
    ///     matches: vec![MatchPair {
    ///         source: PathBuf::from("/r/SourceFiles/a"),
    ///         target: PathBuf::from("/r/b"),
    ///         tier: CheckTier::Exact,
    ///     }],
    ///     ..Default::default()
    /// };
    /// let lines = report.report_lines();
    /// assert_eq!(lines[0], "Matches found. See detail results below.");
    /// assert_eq!(lines[1], "SourceFile: /r/SourceFiles/a\nTargetFile: /r/b");
    /// ```
    #[must_use]
    pub fn report_lines(&self) -> Vec<String> {
        if self.matches.is_empty() {
            return Vec::new();
        }

        std::iter::once(MATCH_HEADER.to_string())
            .chain(self.matches.iter().map(|m| {
                format!(
                    "SourceFile: {}\nTargetFile: {}",
                    m.source.display(),
                    m.target.display()
                )
            }))
            .collect()
    }
}

/// Errors that abort a whole batch.
#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    /// The input folders could not be listed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The batch configuration is unusable.
    #[error(transparent)]
    Sample(#[from] SampleError),
}

impl SpotChecker {
    /// Check every source file against every root file.
    ///
    /// # Errors
    ///
    /// - [`BatchError::Sample`] if the configured sample count is zero
    /// - [`BatchError::Scan`] if the root or source folder cannot be listed
    ///
    /// Failures of individual pairs do not abort the batch; they are
    /// reported through [`BatchReport::diagnostics`].
    pub fn batch_check(&self, root: &Path) -> Result<BatchReport, BatchError> {
        let samples = self.config.sample_count;
        if samples == 0 {
            return Err(SampleError::InvalidSampleCount { samples, len: 0 }.into());
        }

        let start = Instant::now();
        let inputs = batch_inputs(root, &self.config.source_dir)?;

        let pairs: Vec<(&PathBuf, &PathBuf)> = inputs
            .sources
            .iter()
            .flat_map(|s| inputs.targets.iter().map(move |t| (s, t)))
            .collect();

        log::info!(
            "Batch: checking {} source files against {} target files ({} pairs)",
            inputs.sources.len(),
            inputs.targets.len(),
            pairs.len()
        );

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("batch", pairs.len());
        }

        let completed = AtomicUsize::new(0);
        let run = || -> Vec<Option<SampleResult<CheckResult>>> {
            pairs
                .par_iter()
                .map(|(source, target)| {
                    if self.is_shutdown_requested() {
                        return None;
                    }

                    let outcome = self.check_with_samples(source, target, samples);

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(done, source.to_string_lossy().as_ref());
                    }

                    Some(outcome)
                })
                .collect()
        };

        // Bounded pool to limit concurrent disk access
        let outcomes = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
        {
            Ok(pool) => pool.install(run),
            Err(e) => {
                log::warn!(
                    "Failed to create batch thread pool ({}), using global pool with {} threads",
                    e,
                    rayon::current_num_threads()
                );
                run()
            }
        };

        let mut report = BatchReport {
            root: root.to_path_buf(),
            source_files: inputs.sources.len(),
            target_files: inputs.targets.len(),
            ..Default::default()
        };

        for ((source, target), outcome) in pairs.iter().zip(outcomes) {
            match outcome {
                None => report.interrupted = true,
                Some(Ok(result)) => {
                    report.checks_performed += 1;
                    if result.matched {
                        log::debug!(
                            "Match ({}): {} = {}",
                            result.tier,
                            source.display(),
                            target.display()
                        );
                        report.matches.push(MatchPair {
                            source: source.to_path_buf(),
                            target: target.to_path_buf(),
                            tier: result.tier,
                        });
                    }
                }
                Some(Err(e)) => {
                    log::warn!(
                        "Check failed for {} vs {}: {}",
                        source.display(),
                        target.display(),
                        e
                    );
                    report.checks_performed += 1;
                    report.failed_checks += 1;
                    report
                        .diagnostics
                        .push(format!("{} vs {}: {}", source.display(), target.display(), e));
                }
            }
        }

        if self.is_shutdown_requested() {
            report.interrupted = true;
            log::info!("Batch: Interrupted by shutdown signal");
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("batch");
        }

        report.duration = start.elapsed();

        log::info!(
            "Batch complete: {} checks, {} matches, {} failures in {:.2?}",
            report.checks_performed,
            report.matches.len(),
            report.failed_checks,
            report.duration
        );

        Ok(report)
    }
}
