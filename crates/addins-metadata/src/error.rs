//! Error types for metadata reading

use std::path::PathBuf;
use thiserror::Error;

/// Result type for metadata operations
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Errors that can occur while reading module metadata
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The file is not a module this reader understands, or it is corrupt
    #[error("{} is not a readable module: {reason}", path.display())]
    BadFormat { path: PathBuf, reason: String },

    /// A version string could not be parsed
    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    /// A runtime identifier could not be parsed
    #[error("Invalid runtime identifier '{0}'")]
    InvalidRuntime(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    /// Create a new bad format error
    pub fn bad_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MetadataError::BadFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
