//! Whole-file BLAKE3 equality oracle.
//!
//! Hashing reads every byte of both files, so it is the baseline the
//! sampled checks are measured against in tests and benchmarks. It is not
//! used by any of the [`SpotChecker`](super::SpotChecker) tiers.

use std::path::Path;

use crate::sampler::{SampleError, SampleResult};

/// A BLAKE3 digest.
pub type Hash = [u8; 32];

/// Hash the entire content of `path`.
///
/// Large files are memory-mapped and hashed across the rayon pool.
///
/// # Errors
///
/// Returns a [`SampleError`] if the file cannot be opened or read.
pub fn content_hash(path: &Path) -> SampleResult<Hash> {
    let mut hasher = blake3::Hasher::new();
    hasher
        .update_mmap_rayon(path)
        .map_err(|e| SampleError::from_io(path, e))?;
    Ok(*hasher.finalize().as_bytes())
}

/// Whether two files have identical content according to their digests.
///
/// # Errors
///
/// Returns a [`SampleError`] if either file cannot be hashed.
///
/// # Example
///
/// ```no_run
/// use spotcheck::checker::reference::files_equal;
/// use std::path::Path;
///
/// assert!(files_equal(Path::new("a.bin"), Path::new("a.bin")).unwrap());
/// ```
pub fn files_equal(a: &Path, b: &Path) -> SampleResult<bool> {
    let hash_a = content_hash(a)?;
    let hash_b = content_hash(b)?;
    log::debug!(
        "Reference hashes: {} = {}, {} = {}",
        a.display(),
        hash_to_hex(&hash_a),
        b.display(),
        hash_to_hex(&hash_b)
    );
    Ok(hash_a == hash_b)
}

/// Render a digest as lowercase hexadecimal.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
