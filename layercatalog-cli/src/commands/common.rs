//! Input resolution shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::Args;
use layercatalog::config::{default_config_path, CatalogConfig};
use layercatalog::service::{load_service_registry, ServiceRegistry};
use layercatalog::spec::load_layer_specs;
use layercatalog::state::{load_state_snapshot, StateSnapshot};
use layercatalog::LayerTree;
use tracing::{debug, info};

use crate::error::CliError;

/// Catalog input files. Each flag overrides the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Static layer config (JSON array of layer specs)
    #[arg(long, global = true, value_name = "PATH")]
    pub layers: Option<PathBuf>,

    /// Service metadata registry (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    pub services: Option<PathBuf>,

    /// UI-state snapshot (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<PathBuf>,
}

/// A merged catalog ready for display.
pub struct Catalog {
    pub config: CatalogConfig,
    pub tree: LayerTree,
    pub service_count: usize,
}

/// The configuration file to use: `--config`, else
/// `~/.layercatalog/catalog.ini` if it exists.
pub fn config_file(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| default_config_path().filter(|path| path.is_file()))
}

/// Resolve catalog settings from CLI args and the configuration file.
///
/// With no `config_path`, only the CLI args are used.
pub fn resolve_config(
    config_path: Option<&Path>,
    inputs: &InputArgs,
) -> Result<CatalogConfig, CliError> {
    let mut config = match config_path {
        Some(path) => {
            debug!(path = %path.display(), "Loading catalog config");
            CatalogConfig::load(path)?
        }
        None => CatalogConfig::default(),
    };

    // CLI takes precedence, then config
    if let Some(path) = &inputs.layers {
        config = config.with_layers(path);
    }
    if let Some(path) = &inputs.services {
        config = config.with_services(path);
    }
    if let Some(path) = &inputs.state {
        config = config.with_state(path);
    }

    Ok(config)
}

/// Load every input and merge the catalog.
///
/// Service metadata and UI state are optional; without them the tree
/// carries static fields only.
pub fn load_catalog(config_path: Option<&Path>, inputs: &InputArgs) -> Result<Catalog, CliError> {
    let config = resolve_config(config_path, inputs)?;

    let specs = load_layer_specs(config.layers_path()?)?;
    let services = match &config.services {
        Some(path) => load_service_registry(path)?,
        None => ServiceRegistry::new(),
    };
    let state = match &config.state {
        Some(path) => load_state_snapshot(path)?,
        None => StateSnapshot::new(),
    };

    let tree = LayerTree::build_with_options(specs, &services, &state, config.merge);
    info!(
        nodes = tree.node_count(),
        services = services.len(),
        "Catalog merged"
    );

    Ok(Catalog {
        config,
        tree,
        service_count: services.len(),
    })
}
