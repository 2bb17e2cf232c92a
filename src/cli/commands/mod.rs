//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed arguments
//! and returns an `anyhow::Result<()>`.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config;

mod replay;
mod session;

use replay::cmd_replay;
use session::cmd_session;

/// PlayWise CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the OS config directory)
    #[arg(long, global = true, env = "PLAYWISE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Apply a JSON array of operations to a fresh catalog
    Replay {
        /// Path to the script file
        script: PathBuf,
        /// Pretty-print responses
        #[arg(long)]
        pretty: bool,
        /// Skip the final snapshot
        #[arg(long)]
        no_snapshot: bool,
    },
    /// Read one JSON operation per line from stdin
    Session,
    /// Show the effective configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was
/// specified (meaning usage should be printed).
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let load_config = || match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };

    match &cli.command {
        Some(Commands::Replay {
            script,
            pretty,
            no_snapshot,
        }) => {
            cmd_replay(&load_config(), script, *pretty, !*no_snapshot)?;
            Ok(true)
        }
        Some(Commands::Session) => {
            cmd_session(&load_config())?;
            Ok(true)
        }
        Some(Commands::Config { init }) => {
            cmd_config(cli.config.as_deref(), *init)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Print the config path and contents, optionally writing defaults.
///
/// Unlike the other commands, a broken config file is an error here.
fn cmd_config(explicit: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?,
    };

    let config = match config::try_load(&path)? {
        Some(config) => config,
        None if init => {
            let config = config::Config::default();
            let written = match explicit {
                Some(p) => config::save_to(&config, p).map(|()| p.to_path_buf())?,
                None => config::save(&config)?,
            };
            println!("Wrote default config to {}", written.display());
            config
        }
        None => {
            println!("No config at {}, showing defaults", path.display());
            config::Config::default()
        }
    };

    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
