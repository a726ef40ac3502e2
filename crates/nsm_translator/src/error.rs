//! Error types for reporting.
//!
//! Translation itself cannot fail; these cover rendering only.

use thiserror::Error;

/// Errors that can occur while rendering firewall policies.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested output format is not supported.
    #[error("unknown output format '{0}': use table, json, yaml or csv")]
    UnknownFormat(String),

    /// Rendered output could not be produced.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// YAML serialization error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// CSV serialization error.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for reporting operations.
pub type Result<T> = std::result::Result<T, Error>;
