//! Lookup commands: `selected` and `find`.

use std::path::Path;

use layercatalog::LayerKey;

use super::common::{load_catalog, InputArgs};
use super::output::format_node;
use crate::error::CliError;

/// Print the selected leaves in tree order.
pub fn run_selected(config: Option<&Path>, inputs: &InputArgs) -> Result<(), CliError> {
    let catalog = load_catalog(config, inputs)?;
    let selected = catalog.tree.selected_leaf_nodes();

    if selected.is_empty() {
        println!("No layers selected.");
    }
    for node in selected {
        println!("{}", format_node(node, 0));
    }
    Ok(())
}

/// Print the layers named by `keys`, in argument order.
///
/// Fails after printing if any key matched nothing.
pub fn run_find(
    config: Option<&Path>,
    inputs: &InputArgs,
    keys: &[LayerKey],
) -> Result<(), CliError> {
    let catalog = load_catalog(config, inputs)?;

    let mut missing = Vec::new();
    for key in keys {
        match catalog.tree.find_layer(key) {
            Some(node) => println!("{}", format_node(node, 0)),
            None => missing.push(key.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CliError::NotFound(missing))
    }
}
