//! Sample set comparison.

use super::{SampleError, SampleResult};

/// Find the index of the first differing sample.
///
/// Comparison runs left to right and stops at the first mismatch, so every
/// sample before the returned index is known to be equal.
///
/// # Errors
///
/// Returns [`SampleError::LengthMismatch`] if the inputs differ in length.
/// Sets built from the same sample count never do.
pub fn first_mismatch(a: &[u8], b: &[u8]) -> SampleResult<Option<usize>> {
    if a.len() != b.len() {
        return Err(SampleError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    Ok(a.iter().zip(b).position(|(x, y)| x != y))
}

/// Compare two sample sets for exact equality.
///
/// # Errors
///
/// Returns [`SampleError::LengthMismatch`] if the inputs differ in length.
///
/// # Example
///
/// ```
/// use spotcheck::sampler::compare_sample_sets;
///
/// assert!(compare_sample_sets(&[1, 2, 3], &[1, 2, 3]).unwrap());
/// assert!(!compare_sample_sets(&[1, 2, 3], &[1, 9, 3]).unwrap());
/// assert!(compare_sample_sets(&[1, 2], &[1]).is_err());
/// ```
pub fn compare_sample_sets(a: &[u8], b: &[u8]) -> SampleResult<bool> {
    Ok(first_mismatch(a, b)?.is_none())
}
