//! schemadiff CLI
//!
//! Command-line interface for diffing and committing schema snapshots

use clap::{Parser, Subcommand};
use schemadiff_core::config::EngineConfig;
use schemadiff_core::logging_facility;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "schemadiff")]
#[command(about = "schemadiff - Structural diff for schema diagram snapshots", long_about = None)]
struct Cli {
    /// YAML engine configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff two snapshot files
    Diff(commands::diff::DiffArgs),
    /// Validate a snapshot file
    Check(commands::check::CheckArgs),
    /// Commit a snapshot file to the ledger
    Commit(commands::snapshot::CommitArgs),
    /// Print the ledger head
    Head(commands::snapshot::HeadArgs),
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_ref())?;
    logging_facility::init(config.log_profile);

    match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Commit(args) => commands::snapshot::execute_commit(args, &config),
        Commands::Head(args) => commands::snapshot::execute_head(args),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
