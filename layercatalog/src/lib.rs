//! LayerCatalog - Merged map layer catalogs for viewer applications
//!
//! This library builds the hierarchical layer list a map viewer renders by
//! merging three sources at read time: the author-curated static layer
//! config, metadata reported by the map services, and per-session UI state
//! (selection, expansion, opacity, info panels).
//!
//! # Overview
//!
//! ```text
//! layers.json ──► LayerSpec ─┐
//! services   ──► MapService ─┼──► Coalescer ──► LayerTree ──► filter_by_region / filter_by_name
//! UI state   ──► LayerState ─┘
//! ```
//!
//! Trees are immutable snapshots. A UI-state change rebuilds a fresh tree
//! with [`tree::LayerTree::update`]; nodes keep their [`identity::LayerKey`]
//! across rebuilds so UI state follows them.
//!
//! # Example
//!
//! ```ignore
//! use layercatalog::service::load_service_registry;
//! use layercatalog::spec::load_layer_specs;
//! use layercatalog::state::StateSnapshot;
//! use layercatalog::tree::LayerTree;
//!
//! let specs = load_layer_specs(Path::new("layers.json"))?;
//! let services = load_service_registry(Path::new("services.json"))?;
//! let tree = LayerTree::build(specs, &services, &StateSnapshot::new());
//! let us_roads = tree.filter_by_region("US").filter_by_name("road");
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod identity;
pub mod logging;
pub mod merge;
pub mod node;
pub mod service;
pub mod spec;
pub mod state;
pub mod tree;

pub use error::{CatalogError, CatalogResult};
pub use identity::LayerKey;
pub use node::{LayerNode, NodeKind};
pub use tree::LayerTree;
