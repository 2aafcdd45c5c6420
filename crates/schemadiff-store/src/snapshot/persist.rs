//! Snapshot persistence operations.
//!
//! Writes accepted snapshots to the `snapshots` ledger. The newest row is the
//! head; every row records its parent so history stays linear.

use rusqlite::Connection;
use schemadiff_core::errors::{ExError, ExErrorKind};
use schemadiff_core::model::Snapshot;
use schemadiff_core::reconcile::{CommitMode, CommitReceipt};

use crate::errors::{serialization_error, Result};
use crate::migrations::sha256_hex;
use crate::snapshot::query::fetch_head;

fn mode_label(mode: CommitMode) -> &'static str {
    match mode {
        CommitMode::Incremental => "incremental",
        CommitMode::ForceFull => "force_full",
    }
}

fn encode(snapshot: &Snapshot) -> Result<String> {
    serde_json::to_string(snapshot).map_err(|e| serialization_error("encode_snapshot", e))
}

/// SHA-256 of the snapshot's JSON body (hex-encoded, 64 characters)
///
/// Array order is part of the body, so a reordered snapshot has a
/// different digest even though it diffs as empty.
pub fn snapshot_digest(snapshot: &Snapshot) -> Result<String> {
    Ok(sha256_hex(encode(snapshot)?.as_bytes()))
}

/// Commit a snapshot to the ledger.
///
/// ## Modes
///
/// - `ForceFull`: always writes a new ledger row with the exact body given.
/// - `Incremental`: returns the current head without writing when its
///   digest equals the new snapshot's digest.
///
/// ## Errors
///
/// - `ExErrorKind::Serialization`: snapshot could not be encoded
/// - `ExErrorKind::Persistence`: database error
pub fn commit_snapshot(
    conn: &mut Connection,
    snapshot: &Snapshot,
    mode: CommitMode,
) -> Result<CommitReceipt> {
    let body = encode(snapshot)?;
    let digest = sha256_hex(body.as_bytes());

    let tx = conn.transaction().map_err(|e| {
        ExError::new(ExErrorKind::Persistence)
            .with_op("commit_snapshot")
            .with_message(format!("Failed to start transaction: {}", e))
    })?;

    let head = fetch_head(&tx)?;

    if mode == CommitMode::Incremental {
        if let Some(head) = head.as_ref().filter(|h| h.digest == digest) {
            tracing::debug!(
                snapshot_id = %head.snapshot_id,
                digest = %digest,
                "Head already holds this snapshot, skipping write"
            );
            return Ok(CommitReceipt {
                snapshot_id: head.snapshot_id.clone(),
                written: false,
            });
        }
    }

    let snapshot_id = uuid::Uuid::now_v7().to_string();
    let created_at_ms = chrono::Utc::now().timestamp_millis();
    let parent_snapshot_id = head.map(|h| h.snapshot_id);

    tx.execute(
        r#"
        INSERT INTO snapshots (
            snapshot_id,
            digest,
            created_at,
            parent_snapshot_id,
            commit_mode,
            body
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        rusqlite::params![
            snapshot_id,
            digest,
            created_at_ms,
            parent_snapshot_id,
            mode_label(mode),
            body,
        ],
    )
    .map_err(|e| {
        ExError::new(ExErrorKind::Persistence)
            .with_op("commit_snapshot")
            .with_message(format!("Failed to insert snapshot: {}", e))
    })?;

    tx.commit().map_err(|e| {
        ExError::new(ExErrorKind::Persistence)
            .with_op("commit_snapshot")
            .with_message(format!("Failed to commit transaction: {}", e))
    })?;

    tracing::debug!(
        snapshot_id = %snapshot_id,
        digest = %digest,
        mode = mode_label(mode),
        "Created snapshot ledger entry"
    );

    Ok(CommitReceipt {
        snapshot_id,
        written: true,
    })
}
