//! Diff session: the per-document holder of the latest diff.
//!
//! A session owns the last computed [`DiffResult`], the candidate snapshot it
//! was computed against, and the list of tables that diff added. Every
//! `calculate` replaces all of that in one assignment, so readers never see
//! a mix of two calculations. Sessions are plain values: create one per
//! edited document and pass it to whoever needs it.

pub mod observer;

use std::time::Instant;

use crate::diff::{compute_diff, DiffAttribute, DiffEntry, DiffKey, DiffMap, DiffObject, DiffResult};
use crate::model::{Snapshot, Table};
use crate::{log_op_end, log_op_start};

pub use observer::{ChannelObserver, DiffEvent, DiffObserver, SubscriptionId};

#[derive(Debug, Clone, Default)]
struct SessionState {
    diff: DiffResult,
    candidate: Option<Snapshot>,
    tables_added: Vec<Table>,
}

/// Holds the latest diff for one edited document.
#[derive(Default)]
pub struct DiffSession {
    state: SessionState,
    observers: Vec<(SubscriptionId, Box<dyn DiffObserver>)>,
    next_subscription: u64,
}

impl DiffSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `new` against `old`, replace the session state and notify observers.
    ///
    /// `new` becomes the pending candidate snapshot.
    pub fn calculate(&mut self, old: &Snapshot, new: Snapshot) {
        let started = Instant::now();
        log_op_start!(
            "diff_calculate",
            old_entities = old.entity_count(),
            new_entities = new.entity_count()
        );

        let diff = compute_diff(old, &new);
        let tables_added = diff.tables_added(&new);
        let next = SessionState {
            diff,
            candidate: Some(new),
            tables_added,
        };
        self.state = next;

        log_op_end!(
            "diff_calculate",
            duration_ms = started.elapsed().as_millis() as u64,
            diff_len = self.state.diff.diff_map.len(),
            changed_tables = self.state.diff.changed_tables.len(),
            changed_fields = self.state.diff.changed_fields.len()
        );

        let event = DiffEvent::DiffCalculated {
            tables_added: self.state.tables_added.clone(),
        };
        for (_, observer) in self.observers.iter_mut() {
            observer.notify(&event);
        }
    }

    /// Drop the diff, the indices and the candidate.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
    }

    /// Reset the session, handing back the candidate it held
    pub fn take_candidate(&mut self) -> Option<Snapshot> {
        std::mem::take(&mut self.state).candidate
    }

    pub fn has_diff(&self) -> bool {
        !self.state.diff.is_empty()
    }

    pub fn diff(&self) -> &DiffResult {
        &self.state.diff
    }

    pub fn diff_map(&self) -> &DiffMap {
        &self.state.diff.diff_map
    }

    pub fn candidate(&self) -> Option<&Snapshot> {
        self.state.candidate.as_ref()
    }

    /// Tables the last calculation reported as added
    pub fn tables_added(&self) -> &[Table] {
        &self.state.tables_added
    }

    pub fn entry(&self, key: &DiffKey) -> Option<&DiffEntry> {
        self.state.diff.diff_map.get(key)
    }

    pub fn attribute_change(
        &self,
        object: DiffObject,
        attribute: DiffAttribute,
        id: &str,
    ) -> Option<&DiffEntry> {
        self.state
            .diff
            .diff_map
            .attribute_change(object, attribute, id)
    }

    /// New name of a renamed table, if the last diff renamed it
    pub fn table_new_name(&self, table_id: &str) -> Option<&str> {
        self.attribute_change(DiffObject::Table, DiffAttribute::Name, table_id)
            .and_then(DiffEntry::new_value)
            .and_then(|value| value.as_text())
    }

    pub fn table_has_change(&self, table_id: &str) -> bool {
        self.state.diff.table_changed(table_id)
    }

    pub fn field_has_change(&self, field_id: &str) -> bool {
        self.state.diff.field_changed(field_id)
    }

    /// Register an observer for `diff_calculated` events
    pub fn subscribe(&mut self, observer: impl DiffObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl std::fmt::Debug for DiffSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffSession")
            .field("diff_len", &self.state.diff.diff_map.len())
            .field("has_candidate", &self.state.candidate.is_some())
            .field("observers", &self.observers.len())
            .finish()
    }
}
