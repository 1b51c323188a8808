//! CLI error types.

use std::fmt;

use layercatalog::CatalogError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Loading the catalog or its configuration failed.
    Catalog(CatalogError),

    /// Keys passed to `find` that matched no layer.
    NotFound(Vec<String>),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Catalog(e) => write!(f, "{}", e),
            CliError::NotFound(keys) => {
                write!(f, "No layer found for: {}", keys.join(", "))
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Catalog(e) => Some(e),
            CliError::NotFound(_) => None,
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}
