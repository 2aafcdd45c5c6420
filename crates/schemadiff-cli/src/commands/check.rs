//! Check command

use clap::Args;
use std::path::PathBuf;

use super::read_snapshot;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Snapshot file to validate
    pub file: PathBuf,
}

/// Parsing already enforces the integrity rules; report counts on success.
pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = read_snapshot(&args.file)?;
    let field_count: usize = snapshot.tables.iter().map(|t| t.fields.len()).sum();
    println!(
        "OK: {} tables, {} fields, {} relationships",
        snapshot.tables.len(),
        field_count,
        snapshot.relationships.len()
    );
    Ok(())
}
