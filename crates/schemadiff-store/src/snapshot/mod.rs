//! Snapshot ledger: persistence, queries and the store facade.

pub mod persist;
pub mod query;
mod store;

pub use persist::{commit_snapshot, snapshot_digest};
pub use query::SnapshotRow;
pub use store::SqliteSnapshotStore;
