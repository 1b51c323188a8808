//! Catalog configuration file.
//!
//! The configuration is an INI file naming the catalog inputs and tuning
//! the merge:
//!
//! ```ini
//! [catalog]
//! layers = layers.json
//! services = services.json
//! state = state.json
//! region = US
//!
//! [merge]
//! max_sub_layer_depth = 32
//! max_dynamic_layers = 10000
//! ```
//!
//! Relative paths resolve against the directory holding the INI file.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::{CatalogError, CatalogResult};
use crate::merge::MergeOptions;

const CATALOG_SECTION: &str = "catalog";
const MERGE_SECTION: &str = "merge";

/// Get the default configuration file path (`~/.layercatalog/catalog.ini`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".layercatalog").join("catalog.ini"))
}

/// Settings for loading and merging a catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogConfig {
    /// Static layer config (JSON).
    pub layers: Option<PathBuf>,

    /// Service metadata registry (JSON).
    pub services: Option<PathBuf>,

    /// UI-state snapshot (JSON).
    pub state: Option<PathBuf>,

    /// Region to filter by when none is given explicitly.
    pub region: Option<String>,

    pub merge: MergeOptions,
}

impl CatalogConfig {
    /// Load the configuration from an INI file.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::read(path, e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&contents, base_dir)
    }

    /// Parse INI contents, resolving relative paths against `base_dir`.
    pub fn parse(contents: &str, base_dir: &Path) -> CatalogResult<Self> {
        let ini = Ini::load_from_str(contents).map_err(|e| CatalogError::Config(e.to_string()))?;
        let mut config = Self::default();

        if let Some(catalog) = ini.section(Some(CATALOG_SECTION)) {
            let resolve = |key: &str| catalog.get(key).map(|value| base_dir.join(value.trim()));
            config.layers = resolve("layers");
            config.services = resolve("services");
            config.state = resolve("state");
            config.region = catalog.get("region").map(|r| r.trim().to_string());
        }

        if let Some(merge) = ini.section(Some(MERGE_SECTION)) {
            if let Some(value) = merge.get("max_sub_layer_depth") {
                let depth = parse_count("max_sub_layer_depth", value)?;
                config.merge = config.merge.with_max_sub_layer_depth(depth);
            }
            if let Some(value) = merge.get("max_dynamic_layers") {
                let count = parse_count("max_dynamic_layers", value)?;
                config.merge = config.merge.with_max_dynamic_layers(count);
            }
        }

        Ok(config)
    }

    /// Set the layer config path.
    pub fn with_layers(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers = Some(path.into());
        self
    }

    /// Set the service registry path.
    pub fn with_services(mut self, path: impl Into<PathBuf>) -> Self {
        self.services = Some(path.into());
        self
    }

    /// Set the state snapshot path.
    pub fn with_state(mut self, path: impl Into<PathBuf>) -> Self {
        self.state = Some(path.into());
        self
    }

    /// Set the default region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// The layer config path, which every catalog needs.
    pub fn layers_path(&self) -> CatalogResult<&Path> {
        self.layers
            .as_deref()
            .ok_or_else(|| CatalogError::Config("no layer config given".to_string()))
    }
}

fn parse_count(key: &str, value: &str) -> CatalogResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| CatalogError::InvalidConfigValue {
            key: format!("{}.{}", MERGE_SECTION, key),
            value: value.to_string(),
        })
}
