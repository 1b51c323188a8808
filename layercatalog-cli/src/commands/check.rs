//! Check command: load every input and report what was merged.

use std::path::Path;

use super::common::{load_catalog, InputArgs};
use crate::error::CliError;

/// Run the check command.
pub fn run(config: Option<&Path>, inputs: &InputArgs) -> Result<(), CliError> {
    let catalog = load_catalog(config, inputs)?;
    let tree = &catalog.tree;

    let mut folders = 0;
    let mut leaves = 0;
    tree.walk(|node| {
        if node.is_folder() {
            folders += 1;
        } else {
            leaves += 1;
        }
    });

    println!("Catalog OK");
    println!("  Static layers: {}", tree.specs().len());
    println!("  Services:      {}", catalog.service_count);
    println!("  Nodes:         {}", tree.node_count());
    println!("  Folders:       {}", folders);
    println!("  Leaves:        {}", leaves);
    println!("  Selected:      {}", tree.selected_leaf_nodes().len());
    if let Some(region) = &catalog.config.region {
        println!(
            "  In {}:  {}",
            region,
            tree.filter_by_region(region).node_count()
        );
    }
    Ok(())
}
