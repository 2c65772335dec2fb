//! Error types for bench-sweep
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// bench-sweep error types
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unrecognized option (CLI flag or plan-file override)
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// External benchmark could not be launched or exited non-zero.
    ///
    /// Never aborts a sweep: the orchestrator records it and moves on.
    #[error("Child process failed: {command}\n{reason}")]
    ChildProcessFailure {
        /// Echoed command line of the failed run
        command: String,
        /// Exit status or launch error
        reason: String,
    },

    /// Results file could not be created or opened for append
    #[error("Cannot write results file {}: {source}\nNo data can be recorded for this variant", path.display())]
    FileSystem {
        /// Results file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Plan file does not match the schema, or a report could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidOption`].
    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption(message.into())
    }

    /// Whether this error stops the whole invocation before any run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidOption(_) | Self::Json(_))
    }
}
