//! In-memory map services.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{MapService, ServiceDirectory, ServiceLayer};
use crate::error::CatalogResult;
use crate::spec::{read_json, LayerSpec, ServerSpec};

/// Metadata of one map service, held in memory.
///
/// Static specs resolve by their `id` when they carry one, otherwise by
/// name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryService {
    layers: Vec<ServiceLayer>,
    details: HashMap<i64, Map<String, Value>>,
}

impl InMemoryService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer listing entry.
    pub fn with_layer(mut self, layer: ServiceLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add detail fields for the layer with `id`.
    pub fn with_details(mut self, id: i64, details: Map<String, Value>) -> Self {
        self.details.insert(id, details);
        self
    }
}

impl MapService for InMemoryService {
    fn find_service_layer(&self, spec: &LayerSpec) -> Option<&ServiceLayer> {
        match (spec.id, spec.name.as_deref()) {
            (Some(id), _) => self.find_service_layer_by_id(id),
            (None, Some(name)) => self.layers.iter().find(|layer| layer.name == name),
            (None, None) => None,
        }
    }

    fn find_service_layer_by_id(&self, id: i64) -> Option<&ServiceLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    fn layer_details(&self, layer: &ServiceLayer) -> Option<&Map<String, Value>> {
        self.details.get(&layer.id)
    }
}

/// Directory of in-memory services keyed by server url and name.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: Vec<InMemoryService>,
    index: HashMap<String, usize>,
}

/// One registry entry as stored on disk.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryEntry {
    server: ServerSpec,
    #[serde(default)]
    layers: Vec<ServiceLayer>,
    #[serde(default)]
    details: HashMap<i64, Map<String, Value>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under the server's url and name.
    pub fn register(&mut self, server: &ServerSpec, service: InMemoryService) {
        let slot = self.services.len();
        self.services.push(service);
        for key in [server.url.as_deref(), server.name.as_deref()]
            .into_iter()
            .flatten()
        {
            self.index.insert(key.to_string(), slot);
        }
    }

    /// Builder form of [`ServiceRegistry::register`].
    pub fn with_service(mut self, server: &ServerSpec, service: InMemoryService) -> Self {
        self.register(server, service);
        self
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no service is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceDirectory for ServiceRegistry {
    fn service(&self, server: &ServerSpec) -> Option<&dyn MapService> {
        [server.url.as_deref(), server.name.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|key| self.index.get(key))
            .and_then(|&slot| self.services.get(slot))
            .map(|service| service as &dyn MapService)
    }
}

/// A directory that knows no services.
///
/// Trees merged against it carry static fields and UI state only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoServices;

impl ServiceDirectory for NoServices {
    fn service(&self, _server: &ServerSpec) -> Option<&dyn MapService> {
        None
    }
}

/// Load a service registry from a JSON file.
///
/// The file holds an array of `{"server": {...}, "layers": [...],
/// "details": {"<id>": {...}}}` entries.
pub fn load_service_registry(path: &Path) -> CatalogResult<ServiceRegistry> {
    let entries: Vec<RegistryEntry> = read_json(path)?;
    let mut registry = ServiceRegistry::new();
    for entry in entries {
        debug!(
            server = entry.server.lookup_key().unwrap_or("<unnamed>"),
            layers = entry.layers.len(),
            "Registered service"
        );
        let service = InMemoryService {
            layers: entry.layers,
            details: entry.details,
        };
        registry.register(&entry.server, service);
    }
    Ok(registry)
}
