//! Show command: print the merged, optionally filtered layer tree.

use std::path::Path;

use clap::Args;
use tracing::debug;

use super::common::{load_catalog, InputArgs};
use super::output::render_tree;
use crate::error::CliError;

/// Arguments for `show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Keep only layers offered in this region (defaults to the configured region)
    #[arg(long)]
    pub region: Option<String>,

    /// Keep only layers whose display name contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,
}

/// Run the show command.
pub fn run(config: Option<&Path>, inputs: &InputArgs, args: ShowArgs) -> Result<(), CliError> {
    let catalog = load_catalog(config, inputs)?;
    let mut tree = catalog.tree;

    if let Some(region) = args.region.or(catalog.config.region) {
        debug!(region = %region, "Filtering by region");
        tree = tree.filter_by_region(&region);
    }
    if let Some(text) = args.filter {
        tree = tree.filter_by_name(&text);
    }

    if tree.is_empty() {
        println!("No layers.");
    } else {
        print!("{}", render_tree(&tree));
    }
    Ok(())
}
