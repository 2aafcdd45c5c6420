//! Diff command

use clap::{Args, ValueEnum};
use schemadiff_core::diff::{compute_diff, render_human_summary};
use std::path::PathBuf;

use super::read_snapshot;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Structured diff map and change indices
    Json,
    /// Markdown summary grouped by table
    Summary,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Authoritative snapshot
    pub old: PathBuf,

    /// Candidate snapshot
    pub new: PathBuf,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let old = read_snapshot(&args.old)?;
    let new = read_snapshot(&args.new)?;

    let diff = compute_diff(&old, &new);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
        OutputFormat::Summary => print!("{}", render_human_summary(&diff)),
    }

    Ok(())
}
