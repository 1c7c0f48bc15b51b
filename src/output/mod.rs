//! Output formatters for check and batch results.
//!
//! - [`text`]: the human-readable verdict and report lines
//! - [`json`]: machine-readable documents for scripting
//!
//! # Example
//!
//! ```no_run
//! use spotcheck::checker::SpotChecker;
//! use spotcheck::error::ExitCode;
//! use spotcheck::output::json::JsonBatchOutput;
//! use std::path::Path;
//!
//! let report = SpotChecker::with_defaults()
//!     .batch_check(Path::new("/archive"))
//!     .unwrap();
//! let output = JsonBatchOutput::new(&report, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonBatchOutput, JsonCheckOutput, JsonHashOutput};

/// Errors that can occur while writing results.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error while writing results: {0}")]
    Io(#[from] std::io::Error),
}
