use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the metrics store.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Reading the history file or creating its directory failed.
    #[error("metrics I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The history file exists but is not a valid metrics document.
    #[error("metrics file '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The history could not be serialized.
    #[error("failed to serialize metrics: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The temp file could not be moved over the history file.
    #[error("failed to persist metrics to '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for metrics operations.
pub type MetricsResult<T> = Result<T, MetricsError>;
