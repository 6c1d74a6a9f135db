//! Error types for encode-bench operations.
//!
//! Only run-level problems are represented here. A single image that fails to
//! encode is recorded as data on its [`FileMetric`](crate::eval::FileMetric)
//! and never surfaces as an [`Error`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for encode-bench operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a benchmark run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The encoder executable does not exist.
    #[error("Encoder not found: {}", path.display())]
    EncoderNotFound {
        /// Path that was checked.
        path: PathBuf,
    },

    /// The input directory does not exist.
    #[error("Input directory does not exist: {}", path.display())]
    InputDirNotFound {
        /// Path that was checked.
        path: PathBuf,
    },

    /// The input path exists but is not a directory.
    #[error("Input path is not a directory: {}", path.display())]
    NotADirectory {
        /// Path that was checked.
        path: PathBuf,
    },

    /// No candidate images were found in the input directory.
    #[error("No images found in {}", path.display())]
    NoImages {
        /// Directory that was scanned.
        path: PathBuf,
    },

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error writing report files.
    #[error("Report error: {0}")]
    Report(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether this error was raised before any image was processed.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::EncoderNotFound { .. }
                | Self::InputDirNotFound { .. }
                | Self::NotADirectory { .. }
                | Self::NoImages { .. }
                | Self::Config(_)
        )
    }
}
