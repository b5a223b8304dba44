//! ---
//! omb_section: "05-networking-external-interfaces"
//! omb_subsection: "binary"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Control CLI for operators bootstrapping OMB deployments."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use anyhow::Result;
use clap::{Parser, Subcommand};

mod remote;
mod tiles;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "OMB administrative control utility",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run an ombctl command on the jumpbox from outside the network")]
    Remote(remote::RemoteCommand),
    #[command(subcommand, about = "Tile registry introspection")]
    Tiles(tiles::TilesCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Remote(cmd) => remote::run(cmd),
        Commands::Tiles(cmd) => tiles::run(cmd),
    }
}
