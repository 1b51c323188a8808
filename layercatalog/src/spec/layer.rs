//! Author-curated layer specifications.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::server::ServerSpec;

/// Key of the children list, which never takes part in field merging.
const INCLUDE_LAYERS: &str = "includeLayers";

/// One entry of the static layer configuration.
///
/// The shape is a closed contract: unknown keys are rejected when the
/// configuration is parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Service layer id this entry refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Region codes this layer is offered in. Absent means everywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_in_regions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerSpec>,

    /// Replace the declared children with the sub-layers the service reports.
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_all_layers: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_layers: Vec<LayerSpec>,

    /// Names of discovered sub-layers to suppress.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_layers: Vec<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub combine: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_db_layer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reports: Vec<ReportSpec>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A report column attached to a layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl LayerSpec {
    /// Create a spec with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set the service layer id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Restrict availability to the given regions.
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_in_regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    /// Set the server block.
    pub fn with_server(mut self, server: ServerSpec) -> Self {
        self.server = Some(server);
        self
    }

    /// Expand the service's sub-layers instead of the declared children.
    pub fn with_include_all_layers(mut self, include: bool) -> Self {
        self.include_all_layers = include;
        self
    }

    /// Append a declared child.
    pub fn with_child(mut self, child: LayerSpec) -> Self {
        self.include_layers.push(child);
        self
    }

    /// Suppress a discovered sub-layer by name.
    pub fn with_excluded(mut self, name: impl Into<String>) -> Self {
        self.exclude_layers.push(name.into());
        self
    }

    /// Set the static opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Declared children, in author order.
    pub fn children(&self) -> &[LayerSpec] {
        &self.include_layers
    }

    /// The author's explicit fields as a JSON object.
    ///
    /// Absent options are left out so they never shadow fetched metadata;
    /// the children list is left out because children become nodes.
    pub fn to_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut fields)) => {
                fields.remove(INCLUDE_LAYERS);
                fields
            }
            _ => Map::new(),
        }
    }

    /// Total number of specs in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .include_layers
            .iter()
            .map(LayerSpec::subtree_len)
            .sum::<usize>()
    }
}
