//! schemadiff store - SQLite persistence for accepted schema snapshots
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - A snapshot ledger with content digests and a head pointer
//! - `SqliteSnapshotStore`, the commit collaborator used on accept

pub mod db;
pub mod errors;
pub mod migrations;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use snapshot::{SnapshotRow, SqliteSnapshotStore};
