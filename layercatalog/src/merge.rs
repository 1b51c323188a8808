//! Coalescing static specs, service metadata and UI state into nodes.
//!
//! # Merge order
//!
//! For every static spec the node's fields are, later overriding earlier:
//!
//! ```text
//! service layer ─► layer details ─► static spec ─► UI state overlay
//! ```
//!
//! The static spec wins over fetched metadata because it carries the
//! curator's overrides. The node key is computed from the merged
//! name/display name before the UI overlay, so it never depends on UI
//! state.
//!
//! # Children
//!
//! A spec with `includeAllLayers` whose service layer reports sub-layer
//! ids gets the service's sub-layers as children, discovered recursively.
//! Every other spec gets its declared children. Dynamic expansion skips
//! ids already on the current path (starting with the expanding layer
//! itself) and ids repeated within one listing. It stops at
//! [`MergeOptions::max_sub_layer_depth`] levels and after
//! [`MergeOptions::max_dynamic_layers`] nodes, so neither a cyclic nor a
//! heavily shared service listing can run away.

use std::collections::HashSet;
use std::iter;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::data::{fields, LayerData};
use crate::identity::LayerKey;
use crate::node::LayerNode;
use crate::service::{MapService, ServiceDirectory, ServiceLayer};
use crate::spec::{LayerSpec, ServerSpec};
use crate::state::LayerState;

/// Default bound on nested dynamic sub-layer levels.
pub const DEFAULT_MAX_SUB_LAYER_DEPTH: usize = 32;

/// Default bound on sub-layer nodes discovered under one static layer.
pub const DEFAULT_MAX_DYNAMIC_LAYERS: usize = 10_000;

/// Tuning for the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Deepest chain of dynamically discovered sub-layers to expand.
    pub max_sub_layer_depth: usize,

    /// Most sub-layer nodes a single static layer may expand into.
    pub max_dynamic_layers: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_sub_layer_depth: DEFAULT_MAX_SUB_LAYER_DEPTH,
            max_dynamic_layers: DEFAULT_MAX_DYNAMIC_LAYERS,
        }
    }
}

impl MergeOptions {
    /// Set the dynamic sub-layer depth bound.
    pub fn with_max_sub_layer_depth(mut self, depth: usize) -> Self {
        self.max_sub_layer_depth = depth;
        self
    }

    /// Set the per-layer bound on discovered sub-layer nodes.
    pub fn with_max_dynamic_layers(mut self, count: usize) -> Self {
        self.max_dynamic_layers = count;
        self
    }
}

/// Where a node being built hangs in the tree.
#[derive(Clone, Copy)]
struct Parent<'p> {
    key: &'p LayerKey,
    server: Option<&'p Arc<ServerSpec>>,
}

/// Context shared by one dynamically expanded subtree.
struct Expansion<'s> {
    service: &'s dyn MapService,
    /// Sub-layer names suppressed by the static spec that started the expansion.
    excluded: &'s [String],
    /// Service layer ids from the expanding static layer down to the
    /// current node; the first entry is the static layer's own id.
    path: Vec<i64>,
    /// Sub-layer nodes built so far.
    built: usize,
    budget_exhausted: bool,
}

/// Builds merged node trees.
///
/// Both collaborators are read-only snapshots: the same inputs always
/// produce the same tree.
///
/// # Example
///
/// ```ignore
/// use layercatalog::merge::Coalescer;
///
/// let roots = Coalescer::new(&registry, &state).coalesce(&specs);
/// ```
pub struct Coalescer<'a> {
    services: &'a dyn ServiceDirectory,
    state: &'a dyn LayerState,
    options: MergeOptions,
}

impl<'a> Coalescer<'a> {
    /// Create a coalescer over the given collaborators.
    pub fn new(services: &'a dyn ServiceDirectory, state: &'a dyn LayerState) -> Self {
        Self {
            services,
            state,
            options: MergeOptions::default(),
        }
    }

    /// Use non-default merge options.
    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Merge a sequence of root specs.
    pub fn coalesce(&self, specs: &[LayerSpec]) -> Vec<Arc<LayerNode>> {
        let roots = self.coalesce_children(None, specs);
        debug!(
            roots = roots.len(),
            nodes = roots.iter().map(|root| root.subtree_len()).sum::<usize>(),
            "Coalesced layer tree"
        );
        roots
    }

    fn coalesce_children(
        &self,
        parent: Option<Parent<'_>>,
        specs: &[LayerSpec],
    ) -> Vec<Arc<LayerNode>> {
        let nodes: Vec<_> = specs
            .iter()
            .map(|spec| Arc::new(self.coalesce_layer_node(parent, spec)))
            .collect();
        warn_duplicate_keys(&nodes);
        nodes
    }

    /// Merge one static spec and its subtree.
    fn coalesce_layer_node(&self, parent: Option<Parent<'_>>, spec: &LayerSpec) -> LayerNode {
        let server = effective_server(spec.server.as_ref(), parent.and_then(|p| p.server));
        let service = server.as_deref().and_then(|s| self.services.service(s));
        let service_layer = service.and_then(|s| s.find_service_layer(spec));
        let details = service.zip(service_layer).and_then(|(s, l)| s.layer_details(l));

        let mut data = LayerData::merged(
            service_layer
                .map(ServiceLayer::to_fields)
                .into_iter()
                .chain(details.cloned())
                .chain(iter::once(spec.to_fields())),
        );

        let parent_key = parent.map(|p| p.key);
        let key = LayerKey::child(parent_key, data.name(), data.display_name());
        self.overlay_state(&key, &mut data);

        let here = Parent {
            key: &key,
            server: server.as_ref(),
        };
        let sub_layers = service_layer
            .and_then(|l| l.sub_layer_ids.as_deref().map(|ids| (l.id, ids)));
        let children = match (spec.include_all_layers, service, sub_layers) {
            (true, Some(service), Some((layer_id, ids))) => {
                let mut expansion = Expansion {
                    service,
                    excluded: &spec.exclude_layers,
                    path: vec![layer_id],
                    built: 0,
                    budget_exhausted: false,
                };
                self.expand_sub_layers(here, ids, &mut expansion)
            }
            _ => self.coalesce_children(Some(here), spec.children()),
        };

        LayerNode::new(key, parent_key.cloned(), data, server, children)
    }

    fn expand_sub_layers(
        &self,
        parent: Parent<'_>,
        ids: &[i64],
        expansion: &mut Expansion<'_>,
    ) -> Vec<Arc<LayerNode>> {
        let mut listed = HashSet::with_capacity(ids.len());
        let nodes: Vec<_> = ids
            .iter()
            .filter(|&&id| {
                let first = listed.insert(id);
                if !first {
                    debug!(
                        parent = %parent.key,
                        sub_layer_id = id,
                        "Repeated sub-layer id, skipping"
                    );
                }
                first
            })
            .filter_map(|&id| self.coalesce_sub_layer(parent, id, expansion))
            .map(Arc::new)
            .collect();
        warn_duplicate_keys(&nodes);
        nodes
    }

    /// Build a node for a sub-layer that exists only in service metadata.
    fn coalesce_sub_layer(
        &self,
        parent: Parent<'_>,
        id: i64,
        expansion: &mut Expansion<'_>,
    ) -> Option<LayerNode> {
        if expansion.path.contains(&id) {
            warn!(
                parent = %parent.key,
                sub_layer_id = id,
                "Sub-layer cycle detected, skipping"
            );
            return None;
        }
        // The path holds the static layer plus one id per dynamic level above `id`.
        if expansion.path.len() > self.options.max_sub_layer_depth {
            warn!(
                parent = %parent.key,
                sub_layer_id = id,
                max_depth = self.options.max_sub_layer_depth,
                "Sub-layer nesting too deep, skipping"
            );
            return None;
        }
        if expansion.built >= self.options.max_dynamic_layers {
            if !expansion.budget_exhausted {
                warn!(
                    parent = %parent.key,
                    max_layers = self.options.max_dynamic_layers,
                    "Too many discovered sub-layers, skipping the rest"
                );
                expansion.budget_exhausted = true;
            }
            return None;
        }

        let service = expansion.service;
        let Some(service_layer) = service.find_service_layer_by_id(id) else {
            debug!(
                parent = %parent.key,
                sub_layer_id = id,
                "Sub-layer not reported by service"
            );
            return None;
        };
        if expansion.excluded.contains(&service_layer.name) {
            debug!(parent = %parent.key, name = %service_layer.name, "Sub-layer excluded");
            return None;
        }

        expansion.built += 1;

        let details = service.layer_details(service_layer);
        let mut data =
            LayerData::merged(iter::once(service_layer.to_fields()).chain(details.cloned()));
        // Discovered group layers count as include-all.
        data.set(fields::INCLUDE_ALL_LAYERS, service_layer.sub_layer_ids.is_some());

        let key = LayerKey::child(Some(parent.key), data.name(), data.display_name());
        self.overlay_state(&key, &mut data);

        let children = match service_layer.sub_layer_ids.as_deref() {
            Some(ids) => {
                expansion.path.push(id);
                let here = Parent {
                    key: &key,
                    server: parent.server,
                };
                let children = self.expand_sub_layers(here, ids, expansion);
                expansion.path.pop();
                children
            }
            None => Vec::new(),
        };

        Some(LayerNode::new(
            key,
            Some(parent.key.clone()),
            data,
            parent.server.cloned(),
            children,
        ))
    }

    fn overlay_state(&self, key: &LayerKey, data: &mut LayerData) {
        data.set(fields::IS_SELECTED, self.state.is_selected(key));
        data.set(fields::IS_EXPANDED, self.state.is_expanded(key));
        data.set(fields::INFO_IS_DISPLAYED, self.state.info_is_displayed(key));
        match self.state.layer_opacity(key).or(data.opacity()) {
            Some(opacity) => data.set(fields::OPACITY, opacity),
            None => data.remove(fields::OPACITY),
        }
    }
}

/// A spec's own server block, completed from the inherited one.
fn effective_server(
    own: Option<&ServerSpec>,
    inherited: Option<&Arc<ServerSpec>>,
) -> Option<Arc<ServerSpec>> {
    match (own, inherited) {
        (Some(own), Some(parent)) => Some(Arc::new(own.inherit(parent))),
        (Some(own), None) => Some(Arc::new(own.clone())),
        (None, inherited) => inherited.cloned(),
    }
}

fn warn_duplicate_keys(nodes: &[Arc<LayerNode>]) {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.key()) {
            warn!(key = %node.key(), "Sibling layers share a key, their UI state is shared");
        }
    }
}
