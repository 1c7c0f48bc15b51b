//! Top-level directory listing using walkdir.
//!
//! Only regular files directly inside the given directory are returned;
//! subdirectories (including the source subfolder itself) are skipped.
//! Symlinks are followed, so a link to a file counts as a file. Broken
//! links are skipped with a warning.
//! Results are sorted by file name so batch reports are deterministic.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::ScanError;

/// Files participating in a batch check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchInputs {
    /// Files in the source subfolder
    pub sources: Vec<PathBuf>,
    /// Files at the top level of the root folder
    pub targets: Vec<PathBuf>,
}

impl BatchInputs {
    /// Number of pairs in the cross product.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.sources.len() * self.targets.len()
    }
}

/// List regular files directly inside `dir`, sorted by file name.
///
/// # Errors
///
/// - [`ScanError::NotFound`] if `dir` does not exist
/// - [`ScanError::NotADirectory`] if `dir` is a file
/// - [`ScanError::PermissionDenied`] / [`ScanError::Io`] if it cannot be read
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let metadata = std::fs::metadata(dir).map_err(|e| classify(dir, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                return Err(match e.into_io_error() {
                    Some(io) => classify(&path, io),
                    None => ScanError::Io {
                        path,
                        source: std::io::Error::other("directory loop detected"),
                    },
                });
            }
        };

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        } else {
            log::trace!("Skipping non-file entry: {}", entry.path().display());
        }
    }

    log::debug!("Listed {} files in {}", files.len(), dir.display());
    Ok(files)
}

/// List the source and target files for a batch rooted at `root`.
///
/// Sources come from `root/<source_dir>`, targets from `root` itself.
///
/// # Errors
///
/// Returns a [`ScanError`] if either directory cannot be listed.
pub fn batch_inputs(root: &Path, source_dir: &str) -> Result<BatchInputs, ScanError> {
    let sources = list_files(&root.join(source_dir))?;
    let targets = list_files(root)?;
    Ok(BatchInputs { sources, targets })
}

fn classify(path: &Path, source: std::io::Error) -> ScanError {
    match source.kind() {
        std::io::ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
        _ => ScanError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}
