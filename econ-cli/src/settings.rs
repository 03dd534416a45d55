//! `econci config`: inspect and initialize the configuration file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Subcommand;
use econ_common::config::{self, Config};
use econ_common::validation::Validate;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration (file, then ECON_* overrides)
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check the configuration file for invalid values
    Validate,
}

fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(config::config_path, Path::to_path_buf)
}

pub fn handle_command(command: &ConfigCommands, explicit: Option<&Path>) -> Result<()> {
    let path = resolve_path(explicit);
    match command {
        ConfigCommands::Show => {
            let config = Config::load_with_env(explicit)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Init { force } => {
            init(&path, *force)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        ConfigCommands::Validate => {
            let config = Config::load_with_env(explicit)?;
            match config.validate() {
                Ok(()) => {
                    println!("Configuration is valid");
                    Ok(())
                }
                Err(e) => bail!("Invalid configuration: {e}"),
            }
        }
    }
}

/// Write defaults to `path` unless a file is already there.
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    Config::default().save_to(path)
}
