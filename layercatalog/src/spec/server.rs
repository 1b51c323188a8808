//! Server blocks referenced by static layer specs.

use serde::{Deserialize, Serialize};

/// Map server protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    /// ArcGIS Server REST endpoint.
    Ags,
    /// OGC Web Map Service.
    Wms,
}

/// How the viewer draws layers from a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerType {
    /// Server-rendered dynamic map images.
    Dynamic,
    /// Pre-rendered tile cache.
    Tiled,
    /// Client-rendered feature layer.
    FeatureLayer,
}

/// Reference to the server/service backing a layer.
///
/// Every field is optional: a nested layer may specify only what differs
/// from its parent's server block and inherit the rest via
/// [`ServerSpec::inherit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub server_type: Option<ServerType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_type: Option<LayerType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_gp_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_db_path: Option<String>,
}

impl ServerSpec {
    /// Create a server block pointing at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Set the server name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the server protocol.
    pub fn with_type(mut self, server_type: ServerType) -> Self {
        self.server_type = Some(server_type);
        self
    }

    /// Set the layer drawing type.
    pub fn with_layer_type(mut self, layer_type: LayerType) -> Self {
        self.layer_type = Some(layer_type);
        self
    }

    /// Fill fields missing here from the enclosing server block.
    pub fn inherit(&self, parent: &ServerSpec) -> ServerSpec {
        ServerSpec {
            name: self.name.clone().or_else(|| parent.name.clone()),
            server_type: self.server_type.or(parent.server_type),
            layer_type: self.layer_type.or(parent.layer_type),
            url: self.url.clone().or_else(|| parent.url.clone()),
            report_gp_url: self
                .report_gp_url
                .clone()
                .or_else(|| parent.report_gp_url.clone()),
            report_db_path: self
                .report_db_path
                .clone()
                .or_else(|| parent.report_db_path.clone()),
        }
    }

    /// Key used to resolve this server to a service: url, else name.
    pub fn lookup_key(&self) -> Option<&str> {
        self.url.as_deref().or(self.name.as_deref())
    }
}
