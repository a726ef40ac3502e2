//! Error types for manifest loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading network policies.
#[derive(Debug, Error)]
pub enum Error {
    /// A required manifest field is absent.
    #[error("document {document}: missing required field: {field}")]
    MissingField {
        /// Zero-based index of the document in the input stream.
        document: usize,
        /// Dotted path of the missing field.
        field: &'static str,
    },

    /// Document is well-formed YAML/JSON but not a usable manifest.
    #[error("document {document}: invalid manifest: {reason}")]
    InvalidManifest {
        /// Zero-based index of the document in the input stream.
        document: usize,
        /// Reason why the manifest was rejected.
        reason: String,
    },

    /// Failed to read a manifest file or directory.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates an invalid manifest error for the given document.
    pub fn invalid(document: usize, reason: impl Into<String>) -> Self {
        Self::InvalidManifest {
            document,
            reason: reason.into(),
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;
