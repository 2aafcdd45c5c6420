//! Read-only snapshot ledger queries.

use rusqlite::{Connection, OptionalExtension, Row};
use schemadiff_core::errors::{ExError, ExErrorKind};
use schemadiff_core::model::Snapshot;

use crate::errors::{from_rusqlite, serialization_error, Result};

/// A raw row from the `snapshots` ledger table.
#[derive(Debug, Clone)]
pub struct SnapshotRow {
    /// Unique snapshot identifier (UUIDv7)
    pub snapshot_id: String,
    /// SHA-256 of `body`
    pub digest: String,
    /// Creation timestamp, milliseconds since epoch
    pub created_at: i64,
    /// Previous head at commit time
    pub parent_snapshot_id: Option<String>,
    /// `incremental` or `force_full`
    pub commit_mode: String,
    /// Snapshot JSON
    pub body: String,
}

impl SnapshotRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            snapshot_id: row.get(0)?,
            digest: row.get(1)?,
            created_at: row.get(2)?,
            parent_snapshot_id: row.get(3)?,
            commit_mode: row.get(4)?,
            body: row.get(5)?,
        })
    }

    /// Decode the stored snapshot body
    pub fn snapshot(&self) -> Result<Snapshot> {
        serde_json::from_str(&self.body).map_err(|e| {
            serialization_error("decode_snapshot", e).with_entity_id(self.snapshot_id.clone())
        })
    }
}

const SELECT_ROW: &str = "SELECT snapshot_id, digest, created_at, parent_snapshot_id, commit_mode, body FROM snapshots";

/// The most recently committed row, if any
pub fn fetch_head(conn: &Connection) -> Result<Option<SnapshotRow>> {
    conn.query_row(
        &format!("{} ORDER BY id DESC LIMIT 1", SELECT_ROW),
        [],
        SnapshotRow::from_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Fetch one row by snapshot id.
///
/// # Errors
///
/// - `NotFound`: no row with this snapshot id
/// - `Persistence`: query failed
pub fn fetch_by_id(conn: &Connection, snapshot_id: &str) -> Result<SnapshotRow> {
    conn.query_row(
        &format!("{} WHERE snapshot_id = ?1", SELECT_ROW),
        [snapshot_id],
        SnapshotRow::from_row,
    )
    .optional()
    .map_err(from_rusqlite)?
    .ok_or_else(|| {
        ExError::new(ExErrorKind::NotFound)
            .with_op("fetch_snapshot")
            .with_entity_id(snapshot_id)
            .with_message("Snapshot not found")
    })
}

/// All rows, oldest first
pub fn list_snapshots(conn: &Connection) -> Result<Vec<SnapshotRow>> {
    let mut stmt = conn
        .prepare(&format!("{} ORDER BY id", SELECT_ROW))
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], SnapshotRow::from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}
