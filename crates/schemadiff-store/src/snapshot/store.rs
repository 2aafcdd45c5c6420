use rusqlite::Connection;
use schemadiff_core::errors::ExError;
use schemadiff_core::model::Snapshot;
use schemadiff_core::reconcile::{CommitMode, CommitReceipt, SnapshotCommitter};
use std::path::Path;

use crate::db;
use crate::errors::Result;
use crate::migrations::apply_migrations;
use crate::snapshot::persist::commit_snapshot;
use crate::snapshot::query::{self, SnapshotRow};

/// SQLite-backed snapshot ledger, migrated on open
pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = db::open(path)?;
        db::configure(&conn)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn commit(&mut self, snapshot: &Snapshot, mode: CommitMode) -> Result<CommitReceipt> {
        commit_snapshot(&mut self.conn, snapshot, mode)
    }

    /// The current authoritative snapshot, if anything was ever committed
    pub fn load_head(&self) -> Result<Option<Snapshot>> {
        query::fetch_head(&self.conn)?
            .map(|row| row.snapshot())
            .transpose()
    }

    pub fn head_row(&self) -> Result<Option<SnapshotRow>> {
        query::fetch_head(&self.conn)
    }

    pub fn load(&self, snapshot_id: &str) -> Result<Snapshot> {
        query::fetch_by_id(&self.conn, snapshot_id)?.snapshot()
    }

    pub fn history(&self) -> Result<Vec<SnapshotRow>> {
        query::list_snapshots(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SnapshotCommitter for SqliteSnapshotStore {
    fn commit(
        &mut self,
        snapshot: &Snapshot,
        mode: CommitMode,
    ) -> std::result::Result<CommitReceipt, ExError> {
        SqliteSnapshotStore::commit(self, snapshot, mode)
    }
}
