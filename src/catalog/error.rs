//! Catalog load error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the researcher catalog.
///
/// All of these are fatal at startup: no strategy can operate without data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level JSON value is not an array of records.
    #[error("catalog must be a JSON array of records")]
    NotAnArray,

    /// A record has no usable `name`.
    #[error("record at index {index} has no name")]
    MissingName { index: usize },

    /// Two records share a name; names identify records across the cache boundary.
    #[error("duplicate researcher name '{name}' at index {index}")]
    DuplicateName { name: String, index: usize },
}

/// Convenience result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
