//! Scanner module for batch input discovery.
//!
//! Batch checks compare every file of a source subfolder against every
//! file at the top level of a root folder. This module lists both sets.
//!
//! # Architecture
//!
//! - [`lister`]: Single-level directory listing with walkdir
//!
//! # Example
//!
//! ```no_run
//! use spotcheck::scanner::batch_inputs;
//! use std::path::Path;
//!
//! let inputs = batch_inputs(Path::new("/backups"), "SourceFiles").unwrap();
//! println!("{} x {} pairs", inputs.sources.len(), inputs.targets.len());
//! ```

pub mod lister;

use std::path::PathBuf;

// Re-export main types
pub use lister::{batch_inputs, list_files, BatchInputs};

/// Errors that can occur while listing batch inputs.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while listing a directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
