//! Sample offset calculation.
//!
//! Offsets always start at byte 0 and end at the last byte of the file.
//! The default count of five uses fixed quarter fractions of the length;
//! every other count spreads offsets evenly using a real-valued base unit.

use super::{SampleError, SampleResult, DEFAULT_SAMPLE_COUNT};

/// Compute `samples` byte offsets into a file of `len` bytes.
///
/// # Arguments
///
/// * `len` - File length in bytes
/// * `samples` - Number of offsets to produce
///
/// # Returns
///
/// Offsets in non-decreasing order, first `0`, last `len - 1`.
/// A single sample yields `[0]`.
///
/// # Errors
///
/// Returns [`SampleError::InvalidSampleCount`] if `samples` is zero or
/// greater than `len` (which includes every empty file).
///
/// # Example
///
/// ```
/// use spotcheck::sampler::compute_offsets;
///
/// assert_eq!(compute_offsets(1000, 5).unwrap(), vec![0, 250, 500, 750, 999]);
/// assert_eq!(compute_offsets(900, 3).unwrap(), vec![0, 300, 899]);
/// assert_eq!(compute_offsets(900, 1).unwrap(), vec![0]);
/// ```
pub fn compute_offsets(len: u64, samples: usize) -> SampleResult<Vec<u64>> {
    if samples == 0 || samples as u64 > len {
        return Err(SampleError::InvalidSampleCount { samples, len });
    }

    if samples == DEFAULT_SAMPLE_COUNT {
        return Ok(quarter_offsets(len));
    }

    let base_unit = len as f64 / samples as f64;
    let last = samples - 1;

    let offsets = (0..samples)
        .map(|i| {
            if i == 0 {
                0
            } else if i == last {
                len - 1
            } else {
                // Float error near 2^53 must not push past the last byte
                ((base_unit * i as f64) as u64).min(len - 1)
            }
        })
        .collect();

    Ok(offsets)
}

/// Fixed fractions used for the default sample count.
fn quarter_offsets(len: u64) -> Vec<u64> {
    let len_f = len as f64;
    vec![
        0,
        (len_f * 0.25) as u64,
        (len_f * 0.50) as u64,
        ((len_f * 0.75) as u64).min(len - 1),
        len - 1,
    ]
}
