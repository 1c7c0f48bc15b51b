//! Tiered duplicate checking.
//!
//! # Overview
//!
//! [`SpotChecker`] decides whether two files probably hold the same content:
//! 1. **Metadata gate**: files of different length are never duplicates
//! 2. **Exact tier**: files up to [`DEFAULT_EXACT_THRESHOLD`] bytes are compared byte for byte
//! 3. **Sampled tier**: larger files are compared through their sample sets
//!
//! The sampled tier is probabilistic. Equal samples do not prove equal
//! content; a difference that falls between two offsets goes unnoticed.
//!
//! Each call returns a [`CheckResult`] holding the verdict, the tier that
//! produced it and any diagnostics. No state is shared between calls.
//!
//! # Example
//!
//! ```no_run
//! use spotcheck::checker::SpotChecker;
//! use std::path::Path;
//!
//! let checker = SpotChecker::with_defaults();
//! let result = checker.check(Path::new("a.iso"), Path::new("b.iso")).unwrap();
//! println!("{} ({})", result.matched, result.tier);
//! ```

pub mod batch;
pub mod meta;
pub mod reference;

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::progress::ProgressCallback;
use crate::sampler::{first_mismatch, sample_file, SampleError, SampleResult, DEFAULT_SAMPLE_COUNT};

pub use batch::{BatchError, BatchReport, MatchPair};
pub use meta::{FileAttributes, FileKind};

/// Files at or below this length are compared in full.
pub const DEFAULT_EXACT_THRESHOLD: u64 = 5000;

/// Default name of the batch source subfolder.
pub const DEFAULT_SOURCE_DIR: &str = "SourceFiles";

/// Configuration for [`SpotChecker`].
#[derive(Clone)]
pub struct CheckerConfig {
    /// Number of samples taken per file in the sampled tier.
    pub sample_count: usize,
    /// Largest file length compared byte for byte.
    pub exact_threshold: u64,
    /// Name of the source subfolder used by batch checks.
    pub source_dir: String,
    /// Number of I/O threads for batch checks.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for CheckerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckerConfig")
            .field("sample_count", &self.sample_count)
            .field("exact_threshold", &self.exact_threshold)
            .field("source_dir", &self.source_dir)
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            source_dir: DEFAULT_SOURCE_DIR.to_string(),
            io_threads: 4,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl CheckerConfig {
    /// Set the number of samples per file.
    #[must_use]
    pub fn with_sample_count(mut self, samples: usize) -> Self {
        self.sample_count = samples;
        self
    }

    /// Set the exact comparison threshold in bytes.
    #[must_use]
    pub fn with_exact_threshold(mut self, threshold: u64) -> Self {
        self.exact_threshold = threshold;
        self
    }

    /// Set the batch source subfolder name.
    #[must_use]
    pub fn with_source_dir(mut self, name: impl Into<String>) -> Self {
        self.source_dir = name.into();
        self
    }

    /// Set the I/O thread count for batch checks.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// The comparison step that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CheckTier {
    /// Rejected by the length gate without reading content
    SizeMismatch,
    /// Rejected because file or directory attributes differ
    AttributeMismatch,
    /// Decided by length and attributes alone
    Metadata,
    /// Full byte-by-byte comparison
    Exact,
    /// Comparison of sample sets
    Sampled {
        /// Samples taken per file
        samples: usize,
    },
}

impl CheckTier {
    /// Whether a positive verdict from this tier is a guarantee.
    #[must_use]
    pub fn is_exact(self) -> bool {
        matches!(self, Self::Exact)
    }
}

impl std::fmt::Display for CheckTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SizeMismatch => write!(f, "size mismatch"),
            Self::AttributeMismatch => write!(f, "attribute mismatch"),
            Self::Metadata => write!(f, "metadata"),
            Self::Exact => write!(f, "exact"),
            Self::Sampled { samples } => write!(f, "sampled x{samples}"),
        }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Whether the files appear to hold identical content
    pub matched: bool,
    /// Tier that produced the verdict
    pub tier: CheckTier,
    /// Non-fatal notes explaining a negative verdict
    pub diagnostics: Vec<String>,
}

impl CheckResult {
    fn matched(tier: CheckTier) -> Self {
        Self {
            matched: true,
            tier,
            diagnostics: Vec::new(),
        }
    }

    fn rejected(tier: CheckTier, message: String) -> Self {
        Self {
            matched: false,
            tier,
            diagnostics: vec![message],
        }
    }
}

/// Sampling-based duplicate checker.
#[derive(Debug, Clone, Default)]
pub struct SpotChecker {
    config: CheckerConfig,
}

impl SpotChecker {
    /// Create a checker with the given configuration.
    #[must_use]
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    /// Create a checker with default settings (5 samples, 5000 byte exact threshold).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Get the checker configuration.
    #[must_use]
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Tiered check using the configured sample count.
    ///
    /// # Errors
    ///
    /// See [`SpotChecker::check_with_samples`].
    pub fn check(&self, a: &Path, b: &Path) -> SampleResult<CheckResult> {
        self.check_with_samples(a, b, self.config.sample_count)
    }

    /// Tiered check with an explicit sample count.
    ///
    /// Lengths are compared first; different lengths are rejected without
    /// opening either file. Files no longer than the exact threshold are
    /// compared in full, anything larger is sampled.
    ///
    /// # Errors
    ///
    /// - [`SampleError::InvalidSampleCount`] if `samples` is zero, or if the
    ///   sampled tier is reached with more samples than bytes
    /// - I/O variants if either file cannot be inspected or read
    pub fn check_with_samples(
        &self,
        a: &Path,
        b: &Path,
        samples: usize,
    ) -> SampleResult<CheckResult> {
        if samples == 0 {
            return Err(SampleError::InvalidSampleCount { samples, len: 0 });
        }

        let len_a = regular_file_len(a)?;
        let len_b = regular_file_len(b)?;

        if len_a != len_b {
            log::trace!(
                "Length mismatch: {} ({}) vs {} ({})",
                a.display(),
                len_a,
                b.display(),
                len_b
            );
            return Ok(CheckResult::rejected(
                CheckTier::SizeMismatch,
                format!("File length mismatch: {len_a} vs {len_b} bytes"),
            ));
        }

        if len_a <= self.config.exact_threshold {
            log::trace!("Exact comparison of {} byte files", len_a);
            return exact_compare(a, b);
        }

        log::trace!("Sampled comparison of {} byte files ({} samples)", len_a, samples);
        sampled_compare(a, b, samples)
    }

    /// Sample comparison only, with no length gate and no exact tier.
    ///
    /// This is the cheapest check and always takes
    /// [`DEFAULT_SAMPLE_COUNT`] samples, whatever the configured count.
    /// Files shorter than that cannot be sampled and produce an error.
    ///
    /// # Errors
    ///
    /// Returns a [`SampleError`] if either file cannot be sampled.
    pub fn micro_check(&self, a: &Path, b: &Path) -> SampleResult<CheckResult> {
        sampled_compare(a, b, DEFAULT_SAMPLE_COUNT)
    }

    /// Compare length and file attributes without reading content.
    ///
    /// # Errors
    ///
    /// Returns a [`SampleError`] if either path cannot be inspected.
    pub fn meta_check(&self, a: &Path, b: &Path) -> SampleResult<CheckResult> {
        let attrs_a = FileAttributes::read(a)?;
        let attrs_b = FileAttributes::read(b)?;

        if attrs_a.len != attrs_b.len {
            return Ok(CheckResult::rejected(
                CheckTier::SizeMismatch,
                format!(
                    "File length mismatch: {} vs {} bytes",
                    attrs_a.len, attrs_b.len
                ),
            ));
        }

        if !attrs_a.same_flags(&attrs_b) {
            return Ok(CheckResult::rejected(
                CheckTier::AttributeMismatch,
                format!("File attributes differ: {attrs_a} vs {attrs_b}"),
            ));
        }

        Ok(CheckResult::matched(CheckTier::Metadata))
    }

    /// The strictest check: metadata of the files and of their parent
    /// directories must agree before the tiered content check runs.
    ///
    /// # Errors
    ///
    /// Returns a [`SampleError`] if any path cannot be inspected or read.
    pub fn hard_check(&self, a: &Path, b: &Path) -> SampleResult<CheckResult> {
        let meta = self.meta_check(a, b)?;
        if !meta.matched {
            return Ok(meta);
        }

        let dir_a = FileAttributes::read(parent_dir(a))?;
        let dir_b = FileAttributes::read(parent_dir(b))?;
        if !dir_a.same_flags(&dir_b) {
            return Ok(CheckResult::rejected(
                CheckTier::AttributeMismatch,
                format!("Parent directory attributes differ: {dir_a} vs {dir_b}"),
            ));
        }

        self.check(a, b)
    }

    /// Check whether shutdown was requested through the configured flag.
    pub(crate) fn is_shutdown_requested(&self) -> bool {
        self.config.is_shutdown_requested()
    }
}

/// Length of a regular file, read from metadata only.
fn regular_file_len(path: &Path) -> SampleResult<u64> {
    let metadata = fs::metadata(path).map_err(|e| SampleError::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(SampleError::FileUnreadable {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            ),
        });
    }
    Ok(metadata.len())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn exact_compare(a: &Path, b: &Path) -> SampleResult<CheckResult> {
    let left = fs::read(a).map_err(|e| SampleError::from_io(a, e))?;
    let right = fs::read(b).map_err(|e| SampleError::from_io(b, e))?;

    if left.len() != right.len() {
        return Ok(CheckResult::rejected(
            CheckTier::Exact,
            "File length changed during comparison".to_string(),
        ));
    }

    Ok(match first_mismatch(&left, &right)? {
        None => CheckResult::matched(CheckTier::Exact),
        Some(index) => CheckResult::rejected(CheckTier::Exact, format!("Byte #{index} differs")),
    })
}

fn sampled_compare(a: &Path, b: &Path, samples: usize) -> SampleResult<CheckResult> {
    let set_a = sample_file(a, samples)?;
    let set_b = sample_file(b, samples)?;
    let tier = CheckTier::Sampled { samples };

    Ok(match first_mismatch(set_a.as_bytes(), set_b.as_bytes())? {
        None => CheckResult::matched(tier),
        Some(index) => CheckResult::rejected(
            tier,
            format!(
                "Sample #{} failed match at offset {}",
                index, set_a.offsets[index]
            ),
        ),
    })
}
