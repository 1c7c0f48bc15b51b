//! Sample extraction from seekable byte sources.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use super::{compute_offsets, SampleError, SampleResult, SampleSet};

/// Read the single byte at each offset, in the order given.
///
/// Offsets do not need to be sorted. Each read seeks to the absolute
/// position first, so the reader's initial position is irrelevant.
///
/// # Errors
///
/// Returns an I/O error if seeking fails or an offset lies at or past the
/// end of the source (`UnexpectedEof`).
///
/// # Example
///
/// ```
/// use spotcheck::sampler::extract_samples;
/// use std::io::Cursor;
///
/// let mut source = Cursor::new(b"abcdefgh".to_vec());
/// let set = extract_samples(&mut source, &[7, 0, 3]).unwrap();
/// assert_eq!(set.bytes, b"had".to_vec());
/// ```
pub fn extract_samples<R: Read + Seek>(reader: &mut R, offsets: &[u64]) -> io::Result<SampleSet> {
    let mut bytes = Vec::with_capacity(offsets.len());
    let mut byte = [0u8; 1];

    for &offset in offsets {
        reader.seek(SeekFrom::Start(offset))?;
        reader.read_exact(&mut byte)?;
        bytes.push(byte[0]);
    }

    Ok(SampleSet {
        offsets: offsets.to_vec(),
        bytes,
    })
}

/// Open `path` read-only and extract `samples` bytes at computed offsets.
///
/// The file handle is dropped before returning on every path.
///
/// # Errors
///
/// - [`SampleError::FileNotFound`] / [`SampleError::PermissionDenied`] /
///   [`SampleError::FileUnreadable`] for I/O failures
/// - [`SampleError::InvalidSampleCount`] if `samples` is zero or larger
///   than the file
pub fn sample_file(path: &Path, samples: usize) -> SampleResult<SampleSet> {
    let mut file = File::open(path).map_err(|e| SampleError::from_io(path, e))?;
    let len = file
        .metadata()
        .map_err(|e| SampleError::from_io(path, e))?
        .len();

    let offsets = compute_offsets(len, samples)?;
    log::trace!(
        "Sampling {} ({} bytes) at {:?}",
        path.display(),
        len,
        offsets
    );

    extract_samples(&mut file, &offsets).map_err(|e| SampleError::from_io(path, e))
}
