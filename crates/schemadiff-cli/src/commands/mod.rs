pub mod check;
pub mod diff;
pub mod snapshot;

use schemadiff_core::model::Snapshot;
use schemadiff_core::parser::{JsonSnapshotParser, SchemaParser};
use std::path::Path;

/// Read and parse a snapshot file, naming the file in any error
pub fn read_snapshot(path: &Path) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let snapshot = JsonSnapshotParser
        .parse(&text)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(snapshot)
}
