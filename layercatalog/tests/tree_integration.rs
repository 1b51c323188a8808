//! End-to-end tests for building, updating and filtering layer trees.

use std::fs;
use std::sync::Arc;

use layercatalog::config::CatalogConfig;
use layercatalog::service::{
    load_service_registry, InMemoryService, NoServices, ServiceLayer, ServiceRegistry,
};
use layercatalog::spec::{load_layer_specs, parse_layer_specs, LayerSpec, ServerSpec};
use layercatalog::state::{load_state_snapshot, StateSnapshot};
use layercatalog::{LayerKey, LayerNode, LayerTree};
use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const ROADS_URL: &str = "https://maps.example.com/arcgis/rest/services/Roads/MapServer";

fn roads_specs() -> Vec<LayerSpec> {
    parse_layer_specs(
        r#"[{
            "name": "roads",
            "availableInRegions": ["US"],
            "includeLayers": [{"name": "highways"}, {"name": "local"}]
        }]"#,
    )
    .unwrap()
}

fn roads_registry() -> ServiceRegistry {
    let service = InMemoryService::new()
        .with_layer(
            ServiceLayer::new(0, "roads")
                .with_sub_layers(vec![1, 2])
                .with_field("description", "Road network")
                .with_field("opacity", 0.3),
        )
        .with_layer(ServiceLayer::new(1, "Highways"))
        .with_layer(ServiceLayer::new(2, "Collectors"));
    ServiceRegistry::new().with_service(&ServerSpec::new(ROADS_URL), service)
}

fn keys(tree: &LayerTree) -> Vec<String> {
    let mut keys = Vec::new();
    tree.walk(|node| keys.push(node.key().to_string()));
    keys
}

fn leaf_keys(tree: &LayerTree) -> Vec<LayerKey> {
    let mut keys = Vec::new();
    tree.walk(|node| {
        if node.is_leaf() {
            keys.push(node.key().clone());
        }
    });
    keys
}

#[test]
fn test_region_filter_example() {
    let tree = LayerTree::build(roads_specs(), &NoServices, &StateSnapshot::new());

    assert!(tree.filter_by_region("EU").children().is_empty());

    let us = tree.filter_by_region("US");
    assert_eq!(
        keys(&us),
        vec!["root/roads", "root/roads/highways", "root/roads/local"]
    );

    let high = us.filter_by_name("high");
    assert_eq!(keys(&high), vec!["root/roads", "root/roads/highways"]);
}

#[test]
fn test_selected_leaf_nodes_example() {
    let state = StateSnapshot::new().with_selected("root/roads/highways".into());
    let tree = LayerTree::build(roads_specs(), &NoServices, &state);

    let selected = tree.selected_leaf_nodes();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].key().as_str(), "root/roads/highways");
}

#[test]
fn test_identity_stable_across_inputs() {
    let specs = vec![LayerSpec::new("roads")
        .with_server(ServerSpec::new(ROADS_URL))
        .with_child(LayerSpec::new("highways"))
        .with_child(LayerSpec::new("local"))];

    let plain = LayerTree::build(specs.clone(), &NoServices, &StateSnapshot::new());
    let state = StateSnapshot::new()
        .with_selected("root/roads/local".into())
        .with_opacity("root/roads".into(), 0.5);
    let rich = LayerTree::build(specs, &roads_registry(), &state);

    assert_eq!(keys(&plain), keys(&rich));
    assert_ne!(plain, rich);
}

#[test]
fn test_static_spec_wins_over_service() {
    let specs = vec![LayerSpec::new("roads")
        .with_server(ServerSpec::new(ROADS_URL))
        .with_opacity(0.8)];
    let tree = LayerTree::build(specs, &roads_registry(), &StateSnapshot::new());

    let roads = tree.find_layer(&"root/roads".into()).unwrap();
    assert_eq!(roads.opacity(), 0.8);
    assert_eq!(roads.data().description(), Some("Road network"));
}

#[test]
fn test_opacity_override_wins() {
    let specs = vec![LayerSpec::new("roads")
        .with_server(ServerSpec::new(ROADS_URL))
        .with_opacity(0.8)];
    let state = StateSnapshot::new().with_opacity("root/roads".into(), 0.25);
    let tree = LayerTree::build(specs, &roads_registry(), &state);

    assert_eq!(tree.find_layer(&"root/roads".into()).unwrap().opacity(), 0.25);
}

#[test]
fn test_dynamic_children_override_static() {
    let mut specs = roads_specs();
    specs[0].server = Some(ServerSpec::new(ROADS_URL));
    specs[0].include_all_layers = true;

    let tree = LayerTree::build(specs, &roads_registry(), &StateSnapshot::new());

    assert_eq!(
        keys(&tree),
        vec!["root/roads", "root/roads/Highways", "root/roads/Collectors"]
    );
}

#[test]
fn test_update_follows_state() {
    let tree = LayerTree::build(roads_specs(), &NoServices, &StateSnapshot::new());
    assert!(tree.selected_leaf_nodes().is_empty());

    let state = StateSnapshot::new()
        .with_selected("root/roads".into())
        .with_selected("root/roads/local".into());
    let updated = tree.update(&NoServices, &state);

    let selected: Vec<_> = updated
        .selected_leaf_nodes()
        .iter()
        .map(|n| n.key().to_string())
        .collect();
    assert_eq!(selected, vec!["root/roads/local"]);
    assert!(tree.selected_leaf_nodes().is_empty());
}

#[test]
fn test_catalog_from_files() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("layers.json"),
        json!([{
            "name": "roads",
            "server": {"url": ROADS_URL, "type": "ags", "layerType": "dynamic"},
            "includeAllLayers": true,
            "excludeLayers": ["Collectors"]
        }])
        .to_string(),
    )
    .unwrap();
    fs::write(
        temp.path().join("services.json"),
        json!([{
            "server": {"url": ROADS_URL},
            "layers": [
                {"id": 0, "name": "roads", "subLayerIds": [1, 2]},
                {"id": 1, "name": "Highways", "subLayerIds": null},
                {"id": 2, "name": "Collectors", "subLayerIds": null}
            ],
            "details": {"1": {"maxScale": 5000}}
        }])
        .to_string(),
    )
    .unwrap();
    fs::write(
        temp.path().join("state.json"),
        json!({"selected": ["root/roads/Highways"], "opacity": {"root/roads": 0.6}}).to_string(),
    )
    .unwrap();
    let ini = temp.path().join("catalog.ini");
    fs::write(
        &ini,
        "[catalog]\nlayers = layers.json\nservices = services.json\nstate = state.json\n",
    )
    .unwrap();

    let config = CatalogConfig::load(&ini).unwrap();
    let specs = load_layer_specs(config.layers_path().unwrap()).unwrap();
    let registry = load_service_registry(config.services.as_deref().unwrap()).unwrap();
    let state = load_state_snapshot(config.state.as_deref().unwrap()).unwrap();

    let tree = LayerTree::build_with_options(specs, &registry, &state, config.merge);

    assert_eq!(keys(&tree), vec!["root/roads", "root/roads/Highways"]);
    let roads = &tree.children()[0];
    assert_eq!(roads.opacity(), 0.6);
    let highways = tree.find_layer(&"root/roads/Highways".into()).unwrap();
    assert!(highways.is_selected());
    assert_eq!(highways.data().get("maxScale"), Some(&json!(5000)));
    assert_eq!(highways.parent_key(), Some(roads.key()));
}

// Property tests over generated static configs.

fn arb_regions() -> impl Strategy<Value = Option<Vec<String>>> {
    prop::option::of(prop::collection::vec(
        prop::sample::select(vec!["US", "EU", "AU"]).prop_map(String::from),
        0..3,
    ))
}

fn make_spec(name: String, regions: Option<Vec<String>>, children: Vec<LayerSpec>) -> LayerSpec {
    let mut spec = LayerSpec::new(name);
    spec.available_in_regions = regions;
    spec.include_layers = children;
    spec
}

fn arb_spec() -> impl Strategy<Value = LayerSpec> {
    let leaf = ("[A-Za-z]{1,8}", arb_regions())
        .prop_map(|(name, regions)| make_spec(name, regions, Vec::new()));
    leaf.prop_recursive(3, 32, 4, |inner| {
        (
            "[A-Za-z]{1,8}",
            arb_regions(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, regions, children)| make_spec(name, regions, children))
    })
}

fn arb_tree() -> impl Strategy<Value = LayerTree> {
    prop::collection::vec(arb_spec(), 0..5)
        .prop_map(|specs| LayerTree::build(specs, &NoServices, &StateSnapshot::new()))
}

/// Leaves in walk order whose ancestors and selves are all available.
fn available_leaves(nodes: &[Arc<LayerNode>], region: &str, out: &mut Vec<LayerKey>) {
    for node in nodes {
        if !node.is_available_in_region(region) {
            continue;
        }
        if node.is_leaf() {
            out.push(node.key().clone());
        } else {
            available_leaves(node.children(), region, out);
        }
    }
}

proptest! {
    #[test]
    fn test_region_filter_properties(
        tree in arb_tree(),
        region in prop::sample::select(vec!["US", "EU", "AU"])
    ) {
        let filtered = tree.filter_by_region(region);

        prop_assert!(filtered.node_count() <= tree.node_count());

        let mut violations = 0;
        filtered.walk(|node| {
            if !node.is_available_in_region(region) {
                violations += 1;
            }
            if node.is_folder() && node.children().is_empty() {
                violations += 1;
            }
        });
        prop_assert_eq!(violations, 0);

        let mut expected = Vec::new();
        available_leaves(tree.children(), region, &mut expected);
        prop_assert_eq!(leaf_keys(&filtered), expected);
    }

    #[test]
    fn test_name_filter_empty_is_identity(tree in arb_tree()) {
        prop_assert_eq!(tree.filter_by_name(""), tree);
    }

    #[test]
    fn test_name_filter_ignores_case(tree in arb_tree(), text in "[a-z]{1,2}") {
        let lower = tree.filter_by_name(&text);
        let upper = tree.filter_by_name(&text.to_uppercase());
        prop_assert_eq!(keys(&lower), keys(&upper));
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn test_name_filter_keeps_matching_leaves(tree in arb_tree(), text in "[a-z]{1,2}") {
        let filtered = tree.filter_by_name(&text);

        let mut expected = Vec::new();
        tree.walk(|node| {
            if node.is_leaf() && node.display_name().to_lowercase().contains(&text) {
                expected.push(node.key().clone());
            }
        });
        prop_assert_eq!(leaf_keys(&filtered), expected);

        let mut empty_folders = 0;
        filtered.walk(|node| {
            if node.is_folder() && node.children().is_empty() {
                empty_folders += 1;
            }
        });
        prop_assert_eq!(empty_folders, 0);
    }

    #[test]
    fn test_filters_leave_receiver_unchanged(tree in arb_tree(), text in "[a-z]{1,2}") {
        let before = tree.clone();
        let _ = tree.filter_by_region("US");
        let _ = tree.filter_by_name(&text);
        let _ = tree.update(&NoServices, &StateSnapshot::new());
        prop_assert_eq!(tree, before);
    }
}
