//! Accept/undo reconciliation of a pending candidate snapshot.
//!
//! The [`Reconciler`] owns the authoritative snapshot and the persistence
//! collaborator. Accept commits the session's candidate and only then resets
//! the session; a failed commit leaves both the session and the
//! authoritative snapshot exactly as they were.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::errors::{ExError, ExErrorKind, Result, SchemaDiffError};
use crate::model::Snapshot;
use crate::session::DiffSession;
use crate::{log_op_end, log_op_error, log_op_start};

/// How a committer should write a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    /// The committer may skip the write when nothing changed since its head.
    Incremental,
    /// Always write the full snapshot exactly as given.
    #[default]
    ForceFull,
}

/// What a committer did with a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Id of the stored snapshot (the existing head when nothing was written)
    pub snapshot_id: String,
    /// False when an incremental commit found nothing to write
    pub written: bool,
}

/// Persistence collaborator used on accept.
pub trait SnapshotCommitter {
    /// Durably store `snapshot` as the new authoritative state.
    ///
    /// # Errors
    ///
    /// Returns an [`ExError`] (usually `Persistence` or `Io`) if the write fails.
    fn commit(
        &mut self,
        snapshot: &Snapshot,
        mode: CommitMode,
    ) -> std::result::Result<CommitReceipt, ExError>;
}

/// Keeps every committed snapshot in memory.
#[derive(Debug, Default)]
pub struct InMemoryCommitter {
    history: Vec<Snapshot>,
    fail_next: bool,
}

impl InMemoryCommitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next commit fail with a persistence error
    pub fn fail_next_commit(&mut self) {
        self.fail_next = true;
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn head(&self) -> Option<&Snapshot> {
        self.history.last()
    }
}

impl SnapshotCommitter for InMemoryCommitter {
    fn commit(
        &mut self,
        snapshot: &Snapshot,
        mode: CommitMode,
    ) -> std::result::Result<CommitReceipt, ExError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("commit")
                .with_message("in-memory commit rejected"));
        }
        if mode == CommitMode::Incremental && self.head() == Some(snapshot) {
            return Ok(CommitReceipt {
                snapshot_id: format!("mem-{}", self.history.len()),
                written: false,
            });
        }
        self.history.push(snapshot.clone());
        Ok(CommitReceipt {
            snapshot_id: format!("mem-{}", self.history.len()),
            written: true,
        })
    }
}

/// Applies accept/undo decisions against the authoritative snapshot.
#[derive(Debug)]
pub struct Reconciler<C: SnapshotCommitter> {
    authoritative: Snapshot,
    committer: C,
    mode: CommitMode,
}

impl<C: SnapshotCommitter> Reconciler<C> {
    /// Start from an authoritative snapshot; accept forces full writes by default.
    pub fn new(authoritative: Snapshot, committer: C) -> Self {
        Self {
            authoritative,
            committer,
            mode: CommitMode::ForceFull,
        }
    }

    pub fn with_mode(mut self, mode: CommitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> CommitMode {
        self.mode
    }

    pub fn authoritative(&self) -> &Snapshot {
        &self.authoritative
    }

    pub fn committer(&self) -> &C {
        &self.committer
    }

    pub fn committer_mut(&mut self) -> &mut C {
        &mut self.committer
    }

    /// Diff a fresh candidate against the authoritative snapshot.
    pub fn calculate(&self, session: &mut DiffSession, candidate: Snapshot) {
        session.calculate(&self.authoritative, candidate);
    }

    /// Commit the session's candidate as authoritative, then reset the session.
    ///
    /// # Errors
    ///
    /// - [`SchemaDiffError::NoPendingCandidate`] if no calculation is pending.
    /// - [`SchemaDiffError::CommitFailed`] if the committer fails. The session
    ///   keeps its diff and candidate so accept can be retried.
    pub fn accept(&mut self, session: &mut DiffSession) -> Result<CommitReceipt> {
        let started = Instant::now();
        log_op_start!("accept", diff_len = session.diff_map().len());

        let candidate = match session.candidate() {
            Some(candidate) => candidate.clone(),
            None => {
                let err = SchemaDiffError::NoPendingCandidate;
                log_op_error!(
                    "accept",
                    err.clone(),
                    duration_ms = started.elapsed().as_millis() as u64
                );
                return Err(err);
            }
        };

        let receipt = match self.committer.commit(&candidate, self.mode) {
            Ok(receipt) => receipt,
            Err(ex) => {
                log_op_error!(
                    "accept",
                    ex.clone(),
                    duration_ms = started.elapsed().as_millis() as u64
                );
                return Err(ex.into());
            }
        };

        self.authoritative = candidate;
        session.reset();

        log_op_end!(
            "accept",
            duration_ms = started.elapsed().as_millis() as u64,
            snapshot_id = %receipt.snapshot_id,
            written = receipt.written
        );
        Ok(receipt)
    }

    /// Discard the session's candidate and reset it.
    ///
    /// The authoritative snapshot is never mutated by a calculation, so
    /// restoring it is a no-op here.
    pub fn undo(&mut self, session: &mut DiffSession) -> &Snapshot {
        let started = Instant::now();
        log_op_start!("undo", had_candidate = session.candidate().is_some());
        session.reset();
        log_op_end!("undo", duration_ms = started.elapsed().as_millis() as u64);
        &self.authoritative
    }

    pub fn into_parts(self) -> (Snapshot, C) {
        (self.authoritative, self.committer)
    }
}
