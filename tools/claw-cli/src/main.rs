//! Claw CLI - Archive and level tool for OpenClaw
//!
//! # Commands
//!
//! - `claw list` - List the entries of a REZ archive
//! - `claw extract` - Extract one archive entry
//! - `claw extract-all` - Extract every archive entry into a directory
//! - `claw pack` - Build a REZ archive from a directory tree
//! - `claw level` - Summarize or dump a level as JSON
//! - `claw probe` - Step a box through a level and report collisions
//!
//! # Usage
//!
//! ```bash
//! claw list CLAW.REZ --prefix levels
//! claw extract-all CLAW.REZ -o extracted/
//! claw level CLAW.REZ --name retail01 --json
//! claw probe CLAW.REZ --name retail01 --tileset tiles.toml --x 64 --y 0
//! ```

mod archive;
mod level;
mod probe;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Claw CLI - Archive and level tool for OpenClaw
#[derive(Parser)]
#[command(name = "claw")]
#[command(about = "Inspect, extract and pack OpenClaw assets")]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List archive entries
    List(archive::ListArgs),

    /// Extract one archive entry
    Extract(archive::ExtractArgs),

    /// Extract every archive entry into a directory
    ExtractAll(archive::ExtractAllArgs),

    /// Build an archive from a directory tree
    Pack(archive::PackArgs),

    /// Summarize a level or dump it as JSON
    Level(level::LevelArgs),

    /// Step a box through a level and print the collision outcome
    Probe(probe::ProbeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    match cli.command {
        Commands::List(args) => archive::list(args),
        Commands::Extract(args) => archive::extract(args),
        Commands::ExtractAll(args) => archive::extract_all(args),
        Commands::Pack(args) => archive::pack(args),
        Commands::Level(args) => level::execute(args),
        Commands::Probe(args) => probe::execute(args),
    }
}
