//! Error types for frame extraction.
//!
//! Only conditions that abort a run are represented here. Datagrams that are
//! not stream records and streams that fail their boundary check are filtered
//! out by the pipeline and never surface as errors.
//!
//! ## Error Categories
//!
//! - **File Errors**: the capture file is missing or unreadable
//! - **Capture Errors**: the capture container cannot be decoded
//! - **Output Errors**: reconstructed frames cannot be written
//! - **Config Errors**: the configuration file is unreadable or invalid
//! - **Pipeline Errors**: a pipeline stage task failed to complete
//!
//! ## Helper Constructors
//!
//! ```rust
//! use framecap::ExtractError;
//! use std::path::PathBuf;
//!
//! let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
//! let file_error = ExtractError::file_error(PathBuf::from("video.pcapng"), io_err);
//! assert!(file_error.is_fatal());
//!
//! let capture_error = ExtractError::capture("Block decoding", "unexpected block length");
//! for suggestion in capture_error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

/// Main error type for extraction operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtractError {
    #[error("Capture file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Capture decode error in {context}: {details}")]
    Capture { context: String, details: String },

    #[error("Output error: {path}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration {path}: {details}")]
    Config { path: PathBuf, details: String },

    #[error("Pipeline stage '{stage}' failed: {details}")]
    Pipeline { stage: &'static str, details: String },
}

impl ExtractError {
    /// Returns whether this error aborts the run.
    ///
    /// Every variant is fatal: there is no partial output once one of these
    /// has been raised.
    pub fn is_fatal(&self) -> bool {
        match self {
            ExtractError::File { .. } => true,
            ExtractError::Capture { .. } => true,
            ExtractError::Output { .. } => true,
            ExtractError::Config { .. } => true,
            ExtractError::Pipeline { .. } => true,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ExtractError::File { .. } => vec![
                "Check the capture file exists and is readable",
                "Pass the capture path as the first argument",
            ],
            ExtractError::Capture { .. } => vec![
                "Verify the file is a pcap or pcapng capture",
                "Re-export the capture from the capturing tool",
                "Check the capture was not truncated mid-block",
            ],
            ExtractError::Output { .. } => vec![
                "Check the output directory is writable",
                "Ensure sufficient disk space",
            ],
            ExtractError::Config { .. } => vec![
                "Check the configuration file is valid YAML",
                "Remove unknown keys from the configuration file",
            ],
            ExtractError::Pipeline { .. } => vec![
                "Re-run with RUST_LOG=debug to see which stage failed",
            ],
        }
    }

    /// Helper constructor for capture file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        ExtractError::File { path, source }
    }

    /// Helper constructor for capture decoding errors.
    pub fn capture(context: impl Into<String>, details: impl Into<String>) -> Self {
        ExtractError::Capture { context: context.into(), details: details.into() }
    }

    /// Helper constructor for output errors with path context.
    pub fn output_error(path: PathBuf, source: std::io::Error) -> Self {
        ExtractError::Output { path, source }
    }

    /// Helper constructor for configuration errors.
    pub fn config(path: PathBuf, details: impl Into<String>) -> Self {
        ExtractError::Config { path, details: details.into() }
    }

    /// Helper constructor for pipeline stage failures.
    pub fn pipeline(stage: &'static str, details: impl Into<String>) -> Self {
        ExtractError::Pipeline { stage, details: details.into() }
    }
}

impl From<tokio::task::JoinError> for ExtractError {
    fn from(err: tokio::task::JoinError) -> Self {
        let details = if err.is_panic() { "task panicked" } else { "task was cancelled" };
        ExtractError::pipeline("task", details)
    }
}
