//! Merged, renderable layer nodes.

use std::sync::Arc;

use crate::data::LayerData;
use crate::identity::LayerKey;
use crate::spec::ServerSpec;

/// Opacity reported for nodes with neither an override nor a configured value.
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Shape of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A group with at least one child, in display order.
    Folder(Vec<Arc<LayerNode>>),
    /// A selectable layer.
    Leaf,
}

/// One node of a [`LayerTree`](crate::tree::LayerTree).
///
/// Nodes are immutable. The parent is recorded by key only, so a subtree
/// can be shared between trees without ownership cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    key: LayerKey,
    parent: Option<LayerKey>,
    data: Arc<LayerData>,
    server: Option<Arc<ServerSpec>>,
    kind: NodeKind,
}

impl LayerNode {
    /// Create a node; an empty child list makes a leaf.
    pub fn new(
        key: LayerKey,
        parent: Option<LayerKey>,
        data: LayerData,
        server: Option<Arc<ServerSpec>>,
        children: Vec<Arc<LayerNode>>,
    ) -> Self {
        let kind = if children.is_empty() {
            NodeKind::Leaf
        } else {
            NodeKind::Folder(children)
        };
        Self {
            key,
            parent,
            data: Arc::new(data),
            server,
            kind,
        }
    }

    /// A copy of this folder holding `children` instead of its own.
    ///
    /// The copy shares this node's data. Returns `None` when `children`
    /// is empty, since a folder never renders empty.
    pub fn with_children(&self, children: Vec<Arc<LayerNode>>) -> Option<LayerNode> {
        if children.is_empty() {
            return None;
        }
        Some(Self {
            key: self.key.clone(),
            parent: self.parent.clone(),
            data: Arc::clone(&self.data),
            server: self.server.clone(),
            kind: NodeKind::Folder(children),
        })
    }

    pub fn key(&self) -> &LayerKey {
        &self.key
    }

    /// Key of the parent node; `None` for roots.
    pub fn parent_key(&self) -> Option<&LayerKey> {
        self.parent.as_ref()
    }

    pub fn data(&self) -> &LayerData {
        &self.data
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Effective server block (after inheritance from ancestors).
    pub fn service(&self) -> Option<&ServerSpec> {
        self.server.as_deref()
    }

    /// Children in display order; empty for leaves.
    pub fn children(&self) -> &[Arc<LayerNode>] {
        match &self.kind {
            NodeKind::Folder(children) => children,
            NodeKind::Leaf => &[],
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder(_))
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_folder()
    }

    pub fn is_selected(&self) -> bool {
        self.data.is_selected()
    }

    pub fn is_expanded(&self) -> bool {
        self.data.is_expanded()
    }

    pub fn info_is_displayed(&self) -> bool {
        self.data.info_is_displayed()
    }

    pub fn opacity(&self) -> f64 {
        self.data.opacity().unwrap_or(DEFAULT_OPACITY)
    }

    /// Display name, falling back to the name.
    pub fn display_name(&self) -> &str {
        self.data
            .display_name()
            .or(self.data.name())
            .unwrap_or_default()
    }

    /// Whether the layer is offered in `region`.
    ///
    /// Layers without a region list are offered everywhere.
    pub fn is_available_in_region(&self, region: &str) -> bool {
        self.data
            .available_in_regions()
            .map_or(true, |regions| regions.contains(&region))
    }

    /// Find `key` in this subtree, checking this node before its children.
    pub fn find_layer(&self, key: &LayerKey) -> Option<&LayerNode> {
        if &self.key == key {
            return Some(self);
        }
        if !key.is_descendant_of(&self.key) {
            return None;
        }
        self.children()
            .iter()
            .find_map(|child| child.find_layer(key))
    }

    /// Visit this subtree pre-order, depth-first.
    pub fn walk<'a, F>(&'a self, callback: &mut F)
    where
        F: FnMut(&'a LayerNode),
    {
        callback(self);
        for child in self.children() {
            child.walk(callback);
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|child| child.subtree_len())
            .sum::<usize>()
    }
}
