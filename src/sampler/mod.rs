//! Byte sampling primitives for spot checking file content.
//!
//! This module provides functionality for:
//! - Computing evenly distributed byte offsets within a file
//! - Extracting single bytes at those offsets
//! - Comparing two sample sets for equality
//!
//! # Architecture
//!
//! The sampler is divided into submodules:
//! - [`offsets`]: Offset calculation for a file length and sample count
//! - [`extract`]: Seek-and-read extraction from any `Read + Seek` source
//! - [`compare`]: Short-circuiting sample set comparison
//!
//! # Example
//!
//! ```no_run
//! use spotcheck::sampler::{compare_sample_sets, sample_file, DEFAULT_SAMPLE_COUNT};
//! use std::path::Path;
//!
//! let a = sample_file(Path::new("a.bin"), DEFAULT_SAMPLE_COUNT).unwrap();
//! let b = sample_file(Path::new("b.bin"), DEFAULT_SAMPLE_COUNT).unwrap();
//! println!("probable duplicate: {}", compare_sample_sets(a.as_bytes(), b.as_bytes()).unwrap());
//! ```

pub mod compare;
pub mod extract;
pub mod offsets;

use std::path::{Path, PathBuf};

// Re-export main types
pub use compare::{compare_sample_sets, first_mismatch};
pub use extract::{extract_samples, sample_file};
pub use offsets::compute_offsets;

/// Number of samples taken when the caller does not ask for a specific count.
pub const DEFAULT_SAMPLE_COUNT: usize = 5;

/// An ordered set of single bytes read at deterministic offsets.
///
/// Sample sets are ephemeral: they are built for one comparison and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSet {
    /// Offsets the bytes were read from, in extraction order
    pub offsets: Vec<u64>,
    /// The byte found at each offset
    pub bytes: Vec<u8>,
}

impl SampleSet {
    /// Number of samples in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the set holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the sampled bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Errors that can occur while sampling or comparing files.
#[derive(thiserror::Error, Debug)]
pub enum SampleError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Permission was denied when opening or reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other I/O failure while reading the file.
    #[error("Unable to read {path}: {source}")]
    FileUnreadable {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The sample count is zero or exceeds the file length.
    #[error("Invalid sample count {samples} for a file of {len} bytes")]
    InvalidSampleCount {
        /// Requested number of samples
        samples: usize,
        /// Length of the file being sampled
        len: u64,
    },

    /// Two sample sets of different lengths were compared.
    #[error("Sample set length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the left-hand set
        left: usize,
        /// Length of the right-hand set
        right: usize,
    },
}

impl SampleError {
    /// Classify an I/O error raised while working on `path`.
    #[must_use]
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::FileUnreadable {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Whether this error is an I/O failure rather than invalid input.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::PermissionDenied(_) | Self::FileUnreadable { .. }
        )
    }
}

/// Result alias for sampler operations.
pub type SampleResult<T> = Result<T, SampleError>;
