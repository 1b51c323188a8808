//! Merged layer data.
//!
//! [`LayerData`] is the union of service metadata, layer details, static
//! spec fields and UI-state overlays for one node. The field set is open
//! (services report arbitrary extra fields), so it is kept as a JSON object
//! and read through typed accessors. A field holding the wrong JSON type
//! reads as absent rather than failing.

use serde::Serialize;
use serde_json::{Map, Value};

/// Well-known field names.
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const DESCRIPTION: &str = "description";
    pub const AVAILABLE_IN_REGIONS: &str = "availableInRegions";
    pub const INCLUDE_ALL_LAYERS: &str = "includeAllLayers";
    pub const OPACITY: &str = "opacity";
    pub const IS_SELECTED: &str = "isSelected";
    pub const IS_EXPANDED: &str = "isExpanded";
    pub const INFO_IS_DISPLAYED: &str = "infoIsDisplayed";
}

/// The merged field object of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LayerData {
    fields: Map<String, Value>,
}

impl LayerData {
    /// Merge field sources; later sources override earlier ones per key.
    pub fn merged<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let mut fields = Map::new();
        for source in sources {
            fields.extend(source);
        }
        Self { fields }
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Remove a field.
    pub fn remove(&mut self, key: &str) {
        self.fields.remove(key);
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn bool_field(&self, key: &str) -> bool {
        self.fields
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn id(&self) -> Option<i64> {
        self.fields.get(fields::ID).and_then(Value::as_i64)
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field(fields::NAME)
    }

    /// The explicit display name, without falling back to the name.
    pub fn display_name(&self) -> Option<&str> {
        self.str_field(fields::DISPLAY_NAME)
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field(fields::DESCRIPTION)
    }

    /// Region codes the layer is offered in; `None` means everywhere.
    pub fn available_in_regions(&self) -> Option<Vec<&str>> {
        self.fields
            .get(fields::AVAILABLE_IN_REGIONS)
            .and_then(Value::as_array)
            .map(|regions| regions.iter().filter_map(Value::as_str).collect())
    }

    pub fn include_all_layers(&self) -> bool {
        self.bool_field(fields::INCLUDE_ALL_LAYERS)
    }

    pub fn opacity(&self) -> Option<f64> {
        self.fields
            .get(fields::OPACITY)
            .and_then(Value::as_f64)
            .filter(|o| o.is_finite())
    }

    pub fn is_selected(&self) -> bool {
        self.bool_field(fields::IS_SELECTED)
    }

    pub fn is_expanded(&self) -> bool {
        self.bool_field(fields::IS_EXPANDED)
    }

    pub fn info_is_displayed(&self) -> bool {
        self.bool_field(fields::INFO_IS_DISPLAYED)
    }
}

impl From<Map<String, Value>> for LayerData {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
