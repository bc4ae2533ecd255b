//! Error handling for cohort statistics.

pub mod util;

use std::io;
use std::path::PathBuf;

/// Specialized error type for report setup and record loading
///
/// Aggregation itself never fails: bucket specifications are validated when
/// they are built, so every error here surfaces before any records are folded.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A bucket specification would drop or double-count records
    #[error("Invalid bucket specification '{spec}': {reason}")]
    InvalidBucketSpec {
        /// Name of the offending specification
        spec: String,
        /// What makes it non-total or ambiguous
        reason: String,
    },

    /// A report definition or runtime setting is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error opening or reading a file
    #[error("IO error: {message}{}", path.as_ref().map(|p| format!(" ({})", p.display())).unwrap_or_default())]
    Io {
        /// Human readable context
        message: String,
        /// Path involved, if any
        path: Option<PathBuf>,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Structural CSV failure (quoting, encoding, inconsistent rows)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A background task could not be joined
    #[error("Task error: {0}")]
    Task(String),
}

impl Error {
    /// Build an [`Error::InvalidBucketSpec`]
    pub fn invalid_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBucketSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`Error::Config`]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type for cohort statistics operations
pub type Result<T> = std::result::Result<T, Error>;
