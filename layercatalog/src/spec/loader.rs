//! Loading the static layer configuration.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::layer::LayerSpec;
use crate::error::{CatalogError, CatalogResult};

/// Load the static layer configuration from a JSON file.
///
/// The file holds an array of layer specs. Unknown keys anywhere in the
/// tree are rejected here, so everything past this point can assume a
/// well-formed configuration.
pub fn load_layer_specs(path: &Path) -> CatalogResult<Vec<LayerSpec>> {
    let specs: Vec<LayerSpec> = read_json(path)?;
    debug!(
        path = %path.display(),
        roots = specs.len(),
        layers = specs.iter().map(LayerSpec::subtree_len).sum::<usize>(),
        "Loaded layer config"
    );
    Ok(specs)
}

/// Parse the static layer configuration from a JSON string.
pub fn parse_layer_specs(json: &str) -> CatalogResult<Vec<LayerSpec>> {
    serde_json::from_str(json).map_err(|e| CatalogError::parse("<inline>", e))
}

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> CatalogResult<T> {
    let contents = fs::read_to_string(path).map_err(|e| CatalogError::read(path, e))?;
    serde_json::from_str(&contents).map_err(|e| CatalogError::parse(path, e))
}
