//! Immutable layer tree snapshots.
//!
//! A [`LayerTree`] is what the viewer renders. Every operation that changes
//! what the tree shows returns a new tree and leaves the receiver as it
//! was:
//!
//! ```text
//! specs ──► LayerTree::build ──► tree ──► update(services, state) ──► tree'
//!                                  │
//!                                  ├──► filter_by_region("US") ──► tree''
//!                                  └──► filter_by_name("road") ──► tree'''
//! ```
//!
//! Filtered trees keep the full static config, so updating a filtered tree
//! yields the full, unfiltered tree for the new state.

use std::sync::Arc;

use crate::identity::LayerKey;
use crate::merge::{Coalescer, MergeOptions};
use crate::node::{LayerNode, NodeKind};
use crate::service::ServiceDirectory;
use crate::spec::LayerSpec;
use crate::state::LayerState;

/// An immutable snapshot of the layer catalog.
#[derive(Debug, Clone)]
pub struct LayerTree {
    specs: Arc<[LayerSpec]>,
    roots: Vec<Arc<LayerNode>>,
    options: MergeOptions,
}

impl LayerTree {
    /// A tree with no layers.
    pub fn empty() -> Self {
        Self {
            specs: Arc::from(Vec::new()),
            roots: Vec::new(),
            options: MergeOptions::default(),
        }
    }

    /// Merge `specs` against the given service metadata and UI state.
    pub fn build(
        specs: Vec<LayerSpec>,
        services: &dyn ServiceDirectory,
        state: &dyn LayerState,
    ) -> Self {
        Self::build_with_options(specs, services, state, MergeOptions::default())
    }

    /// [`LayerTree::build`] with non-default merge options.
    pub fn build_with_options(
        specs: Vec<LayerSpec>,
        services: &dyn ServiceDirectory,
        state: &dyn LayerState,
        options: MergeOptions,
    ) -> Self {
        let specs: Arc<[LayerSpec]> = Arc::from(specs);
        let roots = Coalescer::new(services, state)
            .with_options(options)
            .coalesce(&specs);
        Self {
            specs,
            roots,
            options,
        }
    }

    /// Rebuild from the unchanged static config against new inputs.
    pub fn update(&self, services: &dyn ServiceDirectory, state: &dyn LayerState) -> Self {
        let roots = Coalescer::new(services, state)
            .with_options(self.options)
            .coalesce(&self.specs);
        Self {
            specs: Arc::clone(&self.specs),
            roots,
            options: self.options,
        }
    }

    /// Root nodes in display order.
    pub fn children(&self) -> &[Arc<LayerNode>] {
        &self.roots
    }

    /// The static config this tree was merged from.
    pub fn specs(&self) -> &[LayerSpec] {
        &self.specs
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|root| root.subtree_len()).sum()
    }

    /// Visit every node pre-order, depth-first.
    pub fn walk<'a, F>(&'a self, mut callback: F)
    where
        F: FnMut(&'a LayerNode),
    {
        for root in &self.roots {
            root.walk(&mut callback);
        }
    }

    /// Selected leaves in walk order. Folders are never returned.
    pub fn selected_leaf_nodes(&self) -> Vec<&LayerNode> {
        let mut selected = Vec::new();
        self.walk(|node| {
            if node.is_leaf() && node.is_selected() {
                selected.push(node);
            }
        });
        selected
    }

    /// Find a node by key.
    pub fn find_layer(&self, key: &LayerKey) -> Option<&LayerNode> {
        self.roots.iter().find_map(|root| root.find_layer(key))
    }

    /// Find several nodes, keeping the order of `keys` and dropping misses.
    pub fn find_layers(&self, keys: &[LayerKey]) -> Vec<&LayerNode> {
        keys.iter().filter_map(|key| self.find_layer(key)).collect()
    }

    /// Keep only layers offered in `region`.
    ///
    /// An unavailable node drops with its whole subtree. Folders left
    /// without children drop too.
    pub fn filter_by_region(&self, region: &str) -> Self {
        self.derive(filter_nodes(&self.roots, &|node: &LayerNode| {
            node.is_available_in_region(region)
        }))
    }

    /// Keep only leaves whose display name contains `text`, ignoring case.
    ///
    /// Folders stay iff a descendant leaf matches. Empty `text` returns the
    /// tree as is.
    pub fn filter_by_name(&self, text: &str) -> Self {
        if text.is_empty() {
            return self.clone();
        }
        let needle = text.to_lowercase();
        self.derive(filter_nodes(&self.roots, &|node: &LayerNode| {
            node.is_folder() || node.display_name().to_lowercase().contains(&needle)
        }))
    }

    fn derive(&self, roots: Vec<Arc<LayerNode>>) -> Self {
        Self {
            specs: Arc::clone(&self.specs),
            roots,
            options: self.options,
        }
    }
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for LayerTree {
    fn eq(&self, other: &Self) -> bool {
        self.roots == other.roots
    }
}

/// Prune `nodes` to those passing `keep`, pruning folders bottom-up.
fn filter_nodes<F>(nodes: &[Arc<LayerNode>], keep: &F) -> Vec<Arc<LayerNode>>
where
    F: Fn(&LayerNode) -> bool,
{
    nodes
        .iter()
        .filter_map(|node| filter_node(node, keep))
        .collect()
}

fn filter_node<F>(node: &Arc<LayerNode>, keep: &F) -> Option<Arc<LayerNode>>
where
    F: Fn(&LayerNode) -> bool,
{
    if !keep(node.as_ref()) {
        return None;
    }
    match node.kind() {
        NodeKind::Leaf => Some(Arc::clone(node)),
        NodeKind::Folder(children) => node
            .with_children(filter_nodes(children, keep))
            .map(Arc::new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::NoServices;
    use crate::state::StateSnapshot;

    fn roads_spec() -> Vec<LayerSpec> {
        vec![
            LayerSpec::new("roads")
                .with_regions(["US"])
                .with_child(LayerSpec::new("highways"))
                .with_child(LayerSpec::new("local").with_display_name("Local Roads")),
            LayerSpec::new("rivers").with_regions(["US", "EU"]),
        ]
    }

    fn roads_tree(state: &StateSnapshot) -> LayerTree {
        LayerTree::build(roads_spec(), &NoServices, state)
    }

    fn keys(tree: &LayerTree) -> Vec<String> {
        let mut keys = Vec::new();
        tree.walk(|node| keys.push(node.key().to_string()));
        keys
    }

    #[test]
    fn test_build_and_walk() {
        let tree = roads_tree(&StateSnapshot::new());
        assert_eq!(
            keys(&tree),
            vec!["root/roads", "root/roads/highways", "root/roads/local", "root/rivers"]
        );
        assert_eq!(tree.node_count(), 4);
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_empty_tree() {
        let tree = LayerTree::empty();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree, LayerTree::default());
    }

    #[test]
    fn test_update_applies_state() {
        let tree = roads_tree(&StateSnapshot::new());
        let state = StateSnapshot::new().with_selected("root/roads/highways".into());

        let updated = tree.update(&NoServices, &state);

        assert!(updated
            .find_layer(&"root/roads/highways".into())
            .unwrap()
            .is_selected());
        assert!(!tree
            .find_layer(&"root/roads/highways".into())
            .unwrap()
            .is_selected());
    }

    #[test]
    fn test_selected_leaf_nodes_skip_folders() {
        let state = StateSnapshot::new()
            .with_selected("root/roads".into())
            .with_selected("root/roads/local".into())
            .with_selected("root/rivers".into());
        let tree = roads_tree(&state);

        let selected: Vec<_> = tree
            .selected_leaf_nodes()
            .iter()
            .map(|n| n.key().to_string())
            .collect();
        assert_eq!(selected, vec!["root/roads/local", "root/rivers"]);
    }

    #[test]
    fn test_find_layers_keeps_order_and_drops_misses() {
        let tree = roads_tree(&StateSnapshot::new());
        let found = tree.find_layers(&[
            LayerKey::from("root/rivers"),
            LayerKey::from("root/lakes"),
            LayerKey::from("root/roads/highways"),
        ]);
        let names: Vec<_> = found.iter().map(|n| n.display_name()).collect();
        assert_eq!(names, vec!["rivers", "highways"]);
    }

    #[test]
    fn test_filter_by_region() {
        let tree = roads_tree(&StateSnapshot::new());

        let eu = tree.filter_by_region("EU");
        assert_eq!(keys(&eu), vec!["root/rivers"]);

        let us = tree.filter_by_region("US");
        assert_eq!(us, tree);

        assert!(tree.filter_by_region("AU").is_empty());
    }

    #[test]
    fn test_filter_by_region_reuses_leaves() {
        let tree = roads_tree(&StateSnapshot::new());
        let us = tree.filter_by_region("US");
        assert!(Arc::ptr_eq(&tree.children()[1], &us.children()[1]));
        assert!(Arc::ptr_eq(
            &tree.children()[0].children()[0],
            &us.children()[0].children()[0]
        ));
    }

    #[test]
    fn test_filter_by_name_matches_display_name() {
        let tree = roads_tree(&StateSnapshot::new());

        let filtered = tree.filter_by_name("local roads");
        assert_eq!(keys(&filtered), vec!["root/roads", "root/roads/local"]);

        // "local" is the name, but matching is on the display name only.
        let by_display = tree.filter_by_name("LOCAL");
        assert_eq!(keys(&by_display), vec!["root/roads", "root/roads/local"]);
    }

    #[test]
    fn test_filter_by_name_ignores_folder_names() {
        let tree = roads_tree(&StateSnapshot::new());
        // "roads" matches the folder and "Local Roads"; only the leaf counts.
        let filtered = tree.filter_by_name("roads");
        assert_eq!(keys(&filtered), vec!["root/roads", "root/roads/local"]);
    }

    #[test]
    fn test_filter_by_name_empty_is_identity() {
        let tree = roads_tree(&StateSnapshot::new());
        let same = tree.filter_by_name("");
        assert_eq!(same, tree);
        assert!(Arc::ptr_eq(&same.children()[0], &tree.children()[0]));
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let tree = roads_tree(&StateSnapshot::new());
        assert!(tree.filter_by_name("railways").is_empty());
    }

    #[test]
    fn test_update_of_filtered_tree_is_full() {
        let tree = roads_tree(&StateSnapshot::new());
        let filtered = tree.filter_by_region("EU");
        let updated = filtered.update(&NoServices, &StateSnapshot::new());
        assert_eq!(updated, tree);
    }

    #[test]
    fn test_operations_leave_receiver_unchanged() {
        let tree = roads_tree(&StateSnapshot::new());
        let before = tree.children().to_vec();

        let _ = tree.filter_by_region("EU");
        let _ = tree.filter_by_name("high");
        let _ = tree.update(
            &NoServices,
            &StateSnapshot::new().with_selected("root/rivers".into()),
        );

        assert_eq!(tree.children(), before.as_slice());
        for (now, then) in tree.children().iter().zip(&before) {
            assert!(Arc::ptr_eq(now, then));
        }
    }
}
