//! UI-state collaborator.
//!
//! Selection, expansion, info-panel status and opacity overrides live in
//! the UI layer, keyed by [`LayerKey`]. The merge reads them through
//! [`LayerState`], which is passed explicitly into every rebuild; the
//! catalog never writes UI state.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogResult;
use crate::identity::LayerKey;
use crate::spec::read_json;

/// Read-only view of per-node UI state.
pub trait LayerState {
    /// Whether the node is selected (drawn on the map).
    fn is_selected(&self, key: &LayerKey) -> bool;

    /// Whether the node's folder is expanded in the layer list.
    fn is_expanded(&self, key: &LayerKey) -> bool;

    /// Whether the node's info panel is open.
    fn info_is_displayed(&self, key: &LayerKey) -> bool;

    /// User-chosen opacity, if the user overrode it.
    fn layer_opacity(&self, key: &LayerKey) -> Option<f64>;
}

/// A point-in-time copy of UI state.
///
/// # Example
///
/// ```ignore
/// use layercatalog::state::StateSnapshot;
///
/// let state = StateSnapshot::new()
///     .with_selected("root/roads/highways".into())
///     .with_opacity("root/roads/highways".into(), 0.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StateSnapshot {
    #[serde(default)]
    selected: HashSet<LayerKey>,

    #[serde(default)]
    expanded: HashSet<LayerKey>,

    #[serde(default)]
    info_displayed: HashSet<LayerKey>,

    #[serde(default)]
    opacity: HashMap<LayerKey, f64>,
}

impl StateSnapshot {
    /// Create an empty snapshot: nothing selected, expanded or overridden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a node selected.
    pub fn with_selected(mut self, key: LayerKey) -> Self {
        self.selected.insert(key);
        self
    }

    /// Mark a node expanded.
    pub fn with_expanded(mut self, key: LayerKey) -> Self {
        self.expanded.insert(key);
        self
    }

    /// Mark a node's info panel open.
    pub fn with_info_displayed(mut self, key: LayerKey) -> Self {
        self.info_displayed.insert(key);
        self
    }

    /// Override a node's opacity.
    pub fn with_opacity(mut self, key: LayerKey, opacity: f64) -> Self {
        self.opacity.insert(key, opacity);
        self
    }
}

impl LayerState for StateSnapshot {
    fn is_selected(&self, key: &LayerKey) -> bool {
        self.selected.contains(key)
    }

    fn is_expanded(&self, key: &LayerKey) -> bool {
        self.expanded.contains(key)
    }

    fn info_is_displayed(&self, key: &LayerKey) -> bool {
        self.info_displayed.contains(key)
    }

    fn layer_opacity(&self, key: &LayerKey) -> Option<f64> {
        self.opacity.get(key).copied().filter(|o| o.is_finite())
    }
}

/// Load a state snapshot from a JSON file.
///
/// ```text
/// {"selected": ["root/roads/highways"], "expanded": ["root/roads"],
///  "infoDisplayed": [], "opacity": {"root/roads/highways": 0.5}}
/// ```
pub fn load_state_snapshot(path: &Path) -> CatalogResult<StateSnapshot> {
    read_json(path)
}
