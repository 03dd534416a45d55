#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use econ_cli::indexes::{self, IndexesArgs};
use econ_cli::product_space::{self, ProductSpaceArgs};
use econ_cli::settings::{self, ConfigCommands};
use econ_common::config::Config;
use econ_common::logging;

/// `econci` - Economic Complexity Indexes and the product space.
#[derive(Parser, Debug)]
#[command(name = "econci")]
#[command(version)]
#[command(about = "Economic Complexity Indexes (ECI/PCI), RCA, and product space export.", long_about = None)]
struct Cli {
    /// Config file (default: ~/.econci/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute RCA, diversity, ubiquity, ECI, and PCI from a trade table
    Indexes(IndexesArgs),

    /// Build the product space and export its graphs as node/edge CSV files
    #[command(name = "product-space")]
    ProductSpace(ProductSpaceArgs),

    /// Inspect or initialize the configuration file
    Config {
        #[command(subcommand)]
        config_command: ConfigCommands,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management must work even when the file is broken
    if let Commands::Config { config_command } = &cli.command {
        return settings::handle_command(config_command, cli.config.as_deref());
    }

    let mut config = Config::load_and_validate(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    logging::init_from_config(&config.observability);

    match cli.command {
        Commands::Config { .. } => unreachable!(),

        Commands::Indexes(args) => {
            let summary = indexes::run(&args, &config)?;
            indexes::print_summary(&summary);
            Ok(())
        }

        Commands::ProductSpace(args) => {
            let summary = product_space::run(&args, &config)?;
            product_space::print_summary(&summary);
            Ok(())
        }
    }
}
