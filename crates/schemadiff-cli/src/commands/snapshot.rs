//! Snapshot ledger commands

use clap::Args;
use schemadiff_core::config::EngineConfig;
use schemadiff_core::reconcile::CommitMode;
use schemadiff_store::SqliteSnapshotStore;
use std::path::PathBuf;

use super::read_snapshot;

#[derive(Debug, Args)]
pub struct CommitArgs {
    /// Snapshot file to commit
    pub file: PathBuf,

    #[arg(long, default_value = ".schemadiff/store.db")]
    pub db: PathBuf,

    /// Skip the write when the head already holds this snapshot
    #[arg(long)]
    pub incremental: bool,
}

#[derive(Debug, Args)]
pub struct HeadArgs {
    #[arg(long, default_value = ".schemadiff/store.db")]
    pub db: PathBuf,
}

pub fn execute_commit(
    args: CommitArgs,
    config: &EngineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = read_snapshot(&args.file)?;
    let mode = if args.incremental {
        CommitMode::Incremental
    } else {
        config.commit_mode
    };

    let mut store = SqliteSnapshotStore::open(&args.db)?;
    let receipt = store.commit(&snapshot, mode)?;

    if receipt.written {
        println!("Snapshot committed:");
    } else {
        println!("Snapshot unchanged (head already matches):");
    }
    println!("  snapshot_id: {}", receipt.snapshot_id);

    Ok(())
}

pub fn execute_head(args: HeadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteSnapshotStore::open(&args.db)?;
    match store.head_row()? {
        Some(row) => {
            let snapshot = row.snapshot()?;
            eprintln!("snapshot_id: {}", row.snapshot_id);
            eprintln!("digest: {}", row.digest);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        None => println!("No snapshot committed"),
    }
    Ok(())
}
