//! Error types for loading catalog inputs.
//!
//! Only the edges of the crate can fail: reading the static layer config,
//! service metadata and state snapshots from disk, and parsing the catalog
//! configuration file. Merging, filtering and lookups are total.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for catalog loading operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while loading catalog inputs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read an input file.
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Input file is not valid JSON or does not match the expected shape.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Catalog configuration file could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configuration key holds a value of the wrong type.
    #[error("invalid value for {key}: {value}")]
    InvalidConfigValue { key: String, value: String },
}

impl CatalogError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CatalogError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CatalogError::Parse {
            path: path.into(),
            source,
        }
    }
}
