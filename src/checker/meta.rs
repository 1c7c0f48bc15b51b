//! File attribute snapshots for metadata-only comparison.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::sampler::{SampleError, SampleResult};

/// Kind of filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Anything else (device, socket, ...)
    Other,
}

/// Attributes compared by the metadata and hard checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttributes {
    /// Length in bytes
    pub len: u64,
    /// Read-only flag
    pub readonly: bool,
    /// Entry kind
    pub kind: FileKind,
    /// Raw Windows attribute word (hidden, system, archive, ...)
    #[cfg(windows)]
    pub raw: u32,
}

impl FileAttributes {
    /// Snapshot the attributes of `path`, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns a [`SampleError`] if the metadata cannot be read.
    pub fn read(path: &Path) -> SampleResult<Self> {
        let metadata = fs::metadata(path).map_err(|e| SampleError::from_io(path, e))?;
        Ok(Self::from_metadata(&metadata))
    }

    /// Build a snapshot from already loaded metadata.
    #[must_use]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        let kind = if metadata.is_file() {
            FileKind::File
        } else if metadata.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        };

        Self {
            len: metadata.len(),
            readonly: metadata.permissions().readonly(),
            kind,
            #[cfg(windows)]
            raw: {
                use std::os::windows::fs::MetadataExt;
                metadata.file_attributes()
            },
        }
    }

    /// Whether every attribute except the length matches.
    ///
    /// Directory lengths depend on the filesystem and their entries, so the
    /// parent directory comparison ignores them.
    #[must_use]
    pub fn same_flags(&self, other: &Self) -> bool {
        #[cfg(windows)]
        {
            if self.raw != other.raw {
                return false;
            }
        }

        self.readonly == other.readonly && self.kind == other.kind
    }
}

impl fmt::Display for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FileKind::File => "file",
            FileKind::Directory => "dir",
            FileKind::Other => "other",
        };
        write!(f, "{kind}")?;
        if self.readonly {
            write!(f, ", read-only")?;
        }
        #[cfg(windows)]
        {
            write!(f, ", attrs={:#x}", self.raw)?;
        }
        Ok(())
    }
}
