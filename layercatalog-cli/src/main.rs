//! LayerCatalog CLI - Command-line interface
//!
//! Loads a static layer config together with service metadata and a
//! UI-state snapshot, merges them, and prints the resulting layer tree.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use layercatalog::logging::{init_logging, LogLevel};
use layercatalog::LayerKey;

use commands::common::InputArgs;
use commands::show::ShowArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "layercatalog", version, about = "Inspect merged map layer catalogs")]
struct Cli {
    /// Catalog configuration file (INI)
    #[arg(long, global = true, value_name = "INI")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    inputs: InputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the merged layer tree
    Show(ShowArgs),

    /// Print the selected leaf layers
    Selected,

    /// Look up layers by key
    Find {
        /// Layer keys, e.g. root/roads/highways
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<LayerKey>,
    },

    /// Load all inputs and report counts
    Check,
}

fn main() {
    let cli = Cli::parse();
    init_logging(LogLevel::from_verbosity(cli.verbose));

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_file = commands::common::config_file(cli.config);
    let config = config_file.as_deref();
    let inputs = &cli.inputs;

    match cli.command {
        Commands::Show(args) => commands::show::run(config, inputs, args),
        Commands::Selected => commands::query::run_selected(config, inputs),
        Commands::Find { keys } => commands::query::run_find(config, inputs, &keys),
        Commands::Check => commands::check::run(config, inputs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show_with_inputs() {
        let cli = Cli::try_parse_from([
            "layercatalog",
            "show",
            "--layers",
            "layers.json",
            "--region",
            "US",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.inputs.layers, Some(PathBuf::from("layers.json")));
        match cli.command {
            Commands::Show(args) => assert_eq!(args.region.as_deref(), Some("US")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_find_requires_keys() {
        assert!(Cli::try_parse_from(["layercatalog", "find"]).is_err());

        let cli = Cli::try_parse_from(["layercatalog", "find", "root/a", "root/b"]).unwrap();
        match cli.command {
            Commands::Find { keys } => {
                assert_eq!(keys, vec![LayerKey::from("root/a"), LayerKey::from("root/b")])
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
