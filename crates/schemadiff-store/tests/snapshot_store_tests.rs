// Integration tests for the snapshot ledger and its commit contract

use schemadiff_core::errors::ExErrorKind;
use schemadiff_core::model::{Field, Snapshot, Table};
use schemadiff_core::reconcile::{CommitMode, Reconciler};
use schemadiff_core::session::DiffSession;
use schemadiff_store::snapshot::snapshot_digest;
use schemadiff_store::SqliteSnapshotStore;

fn users() -> Snapshot {
    Snapshot::new().with_table(
        Table::new("t1", "users").with_field(Field::new("f1", "id", "INT").primary()),
    )
}

fn users_and_posts() -> Snapshot {
    users().with_table(Table::new("t2", "posts"))
}

#[test]
fn test_empty_store_has_no_head() {
    let store = SqliteSnapshotStore::open_in_memory().expect("open");
    assert!(store.load_head().unwrap().is_none());
    assert!(store.history().unwrap().is_empty());
}

#[test]
fn test_commit_then_load_head_round_trips() {
    // Given: an empty store
    let mut store = SqliteSnapshotStore::open_in_memory().unwrap();

    // When: a snapshot is committed
    let receipt = store.commit(&users(), CommitMode::ForceFull).unwrap();

    // Then: it is the head, byte for byte
    assert!(receipt.written);
    assert_eq!(store.load_head().unwrap(), Some(users()));
    let row = store.head_row().unwrap().expect("head row");
    assert_eq!(row.snapshot_id, receipt.snapshot_id);
    assert_eq!(row.digest, snapshot_digest(&users()).unwrap());
    assert_eq!(row.commit_mode, "force_full");
    assert!(row.parent_snapshot_id.is_none());
}

#[test]
fn test_history_links_parents() {
    let mut store = SqliteSnapshotStore::open_in_memory().unwrap();
    let first = store.commit(&users(), CommitMode::ForceFull).unwrap();
    let second = store.commit(&users_and_posts(), CommitMode::ForceFull).unwrap();

    let history = store.history().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].snapshot_id, second.snapshot_id);
    assert_eq!(history[1].parent_snapshot_id.as_deref(), Some(first.snapshot_id.as_str()));
    assert_eq!(store.load(&first.snapshot_id).unwrap(), users());
}

#[test]
fn test_incremental_skips_identical_head() {
    let mut store = SqliteSnapshotStore::open_in_memory().unwrap();
    let first = store.commit(&users(), CommitMode::Incremental).unwrap();
    let second = store.commit(&users(), CommitMode::Incremental).unwrap();

    assert!(first.written);
    assert!(!second.written);
    assert_eq!(second.snapshot_id, first.snapshot_id);
    assert_eq!(store.history().unwrap().len(), 1);
}

#[test]
fn test_force_full_always_writes() {
    let mut store = SqliteSnapshotStore::open_in_memory().unwrap();
    store.commit(&users(), CommitMode::ForceFull).unwrap();
    let again = store.commit(&users(), CommitMode::ForceFull).unwrap();

    assert!(again.written);
    assert_eq!(store.history().unwrap().len(), 2);
}

#[test]
fn test_incremental_writes_when_head_differs() {
    let mut store = SqliteSnapshotStore::open_in_memory().unwrap();
    store.commit(&users(), CommitMode::Incremental).unwrap();
    let receipt = store
        .commit(&users_and_posts(), CommitMode::Incremental)
        .unwrap();
    assert!(receipt.written);
    assert_eq!(store.load_head().unwrap(), Some(users_and_posts()));
}

#[test]
fn test_load_unknown_snapshot_is_not_found() {
    let store = SqliteSnapshotStore::open_in_memory().unwrap();
    let err = store.load("missing").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.entity_id(), Some("missing"));
}

#[test]
fn test_file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("schema.db");

    {
        let mut store = SqliteSnapshotStore::open(&path).unwrap();
        store.commit(&users_and_posts(), CommitMode::ForceFull).unwrap();
    }

    let reopened = SqliteSnapshotStore::open(&path).unwrap();
    assert_eq!(reopened.load_head().unwrap(), Some(users_and_posts()));
}

#[test]
fn test_reconciler_accept_through_sqlite_store() {
    // Given: a reconciler backed by the SQLite store
    let store = SqliteSnapshotStore::open_in_memory().unwrap();
    let mut reconciler = Reconciler::new(users(), store);
    let mut session = DiffSession::new();

    // When: a candidate is calculated and accepted
    reconciler.calculate(&mut session, users_and_posts());
    reconciler.accept(&mut session).expect("accept");

    // Then: the store head is the accepted candidate
    assert_eq!(
        reconciler.committer().load_head().unwrap(),
        Some(users_and_posts())
    );
    assert!(!session.has_diff());
}
