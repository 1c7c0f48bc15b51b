//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the SpotCheck application.
///
/// - 0: Success (completed normally, a match was found)
/// - 1: General error (unexpected failure)
/// - 2: No match (completed normally, files differ)
/// - 3: Partial success (batch completed but some pairs failed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the files (or at least one batch pair) matched.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No match: the check completed and found no duplicates.
    NoMatch = 2,
    /// Partial success: the batch completed but some pairs could not be checked.
    PartialSuccess = 3,
    /// Interrupted: the batch was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "SC000",
            Self::GeneralError => "SC001",
            Self::NoMatch => "SC002",
            Self::PartialSuccess => "SC003",
            Self::Interrupted => "SC130",
        }
    }

    /// Exit code for a single check verdict.
    #[must_use]
    pub fn from_verdict(matched: bool) -> Self {
        if matched {
            Self::Success
        } else {
            Self::NoMatch
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
