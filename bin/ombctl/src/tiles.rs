//! ---
//! omb_section: "05-networking-external-interfaces"
//! omb_subsection: "binary"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Control CLI for operators bootstrapping OMB deployments."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use omb_common::EnvDir;
use omb_logging::LogSink;
use omb_tiles::registry;

/// Top-level tile commands.
#[derive(Debug, Subcommand)]
pub enum TilesCommand {
    /// List registered tiles with their footprint-resolved definitions.
    List(ListOptions),
}

/// Shared options for tile introspection.
#[derive(Debug, Args)]
pub struct ListOptions {
    /// Environment directory produced by provisioning.
    #[arg(long = "env-dir", value_name = "DIR", env = "OMB_ENV_DIR")]
    pub env_dir: PathBuf,
}

/// Execute the supplied tile command.
pub fn run(command: TilesCommand) -> Result<()> {
    omb_logging::init(LogSink::Stdout);
    match command {
        TilesCommand::List(opts) => list(&opts),
    }
}

fn list(opts: &ListOptions) -> Result<()> {
    let env = EnvDir::new(&opts.env_dir)
        .env_config()
        .context("loading environment sizing configuration")?;
    for tile in registry() {
        let definition = tile.definition(&env);
        println!(
            "{:<24} {:<12} built-in: {}",
            definition.name,
            definition.version,
            tile.built_in()
        );
    }
    Ok(())
}
