//! Map service collaborator.
//!
//! The catalog never talks to a map server itself. Whatever fetched the
//! service metadata (ArcGIS REST `layers` listings, WMS capabilities, ...)
//! exposes it through [`MapService`], and a [`ServiceDirectory`] resolves a
//! layer's server block to the service that describes it. Every lookup is a
//! synchronous read of data that was fetched before the tree is rebuilt.
//!
//! # Architecture
//!
//! ```text
//! LayerSpec.server ──► ServiceDirectory ──► MapService ──► ServiceLayer + details
//!                      (ServiceRegistry)    (InMemoryService)
//! ```

mod memory;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::spec::{LayerSpec, ServerSpec};

pub use memory::{load_service_registry, InMemoryService, NoServices, ServiceRegistry};

/// A layer as reported by a map service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLayer {
    /// Layer id, unique within its service.
    pub id: i64,

    pub name: String,

    /// Ids of nested layers. `None` for leaf layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_layer_ids: Option<Vec<i64>>,

    /// Server-specific fields (extent, scale range, geometry type, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ServiceLayer {
    /// Create a service layer with no extra fields.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sub_layer_ids: None,
            fields: Map::new(),
        }
    }

    /// Set the nested layer ids.
    pub fn with_sub_layers(mut self, ids: impl Into<Vec<i64>>) -> Self {
        self.sub_layer_ids = Some(ids.into());
        self
    }

    /// Add a server-specific field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// All fields of this layer as one JSON object.
    pub fn to_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        }
    }
}

/// Read access to one map service's already-fetched metadata.
pub trait MapService {
    /// Find the service layer a static spec refers to.
    fn find_service_layer(&self, spec: &LayerSpec) -> Option<&ServiceLayer>;

    /// Find a service layer by its id.
    fn find_service_layer_by_id(&self, id: i64) -> Option<&ServiceLayer>;

    /// Richer per-layer details, when the service has fetched them.
    fn layer_details(&self, layer: &ServiceLayer) -> Option<&Map<String, Value>>;
}

/// Resolves a server block to the service describing it.
pub trait ServiceDirectory {
    /// The service for `server`, if it is known.
    fn service(&self, server: &ServerSpec) -> Option<&dyn MapService>;
}
