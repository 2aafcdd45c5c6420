//! Live-edit consumer: debounced re-parse and re-diff of edited text.
//!
//! Callers drive time explicitly. `edit` records the latest text and its
//! timestamp, `poll` runs it once the quiescence window has elapsed since
//! the last edit. An edit that arrives while another is pending replaces it,
//! so only the most recent text is ever parsed.

use std::time::{Duration, Instant};

use schemadiff_core_types::CycleId;

use crate::config::EngineConfig;
use crate::errors::{ExError, ExErrorKind, ParseError, Result};
use crate::model::Snapshot;
use crate::parser::SchemaParser;
use crate::reconcile::{CommitReceipt, Reconciler, SnapshotCommitter};
use crate::session::{DiffObserver, DiffSession, SubscriptionId};

/// Holds at most one pending value until a quiet period has passed.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `value`, returning true if it cancelled an earlier one.
    pub fn schedule(&mut self, value: T, now: Instant) -> bool {
        self.pending.replace((value, now)).is_some()
    }

    /// Take the pending value if the window has elapsed since it was scheduled.
    pub fn ready(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.window);
        if due {
            self.take()
        } else {
            None
        }
    }

    /// Take the pending value regardless of the window
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Instant at which the pending value becomes ready
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.window)
    }
}

/// Result of running one debounced edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The text parsed and the session now holds a fresh diff
    Calculated { diff_len: usize },
    /// The text did not parse; the session kept its previous state
    ParseFailed,
}

/// One edited document: parser, diff session, reconciler and debounce.
pub struct LiveEditSession<P: SchemaParser, C: SnapshotCommitter> {
    parser: P,
    session: DiffSession,
    reconciler: Reconciler<C>,
    debouncer: Debouncer<String>,
    last_parse_error: Option<ParseError>,
    cycle_id: CycleId,
}

impl<P: SchemaParser, C: SnapshotCommitter> LiveEditSession<P, C> {
    pub fn new(parser: P, reconciler: Reconciler<C>, window: Duration) -> Self {
        Self {
            parser,
            session: DiffSession::new(),
            reconciler,
            debouncer: Debouncer::new(window),
            last_parse_error: None,
            cycle_id: CycleId::new(),
        }
    }

    /// Build a session using the debounce window and commit mode from `config`
    pub fn from_config(
        parser: P,
        authoritative: Snapshot,
        committer: C,
        config: &EngineConfig,
    ) -> Self {
        let reconciler = Reconciler::new(authoritative, committer).with_mode(config.commit_mode);
        Self::new(parser, reconciler, config.debounce())
    }

    /// Record an edit; any earlier pending edit is cancelled.
    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        let cancelled = self.debouncer.schedule(text.into(), now);
        tracing::debug!(
            op = "edit",
            cycle_id = %self.cycle_id,
            cancelled_pending = cancelled,
            "edit scheduled"
        );
    }

    /// Run the pending edit if the quiescence window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<EditOutcome> {
        let text = self.debouncer.ready(now)?;
        Some(self.run(&text))
    }

    /// Run the pending edit immediately
    pub fn flush(&mut self) -> Option<EditOutcome> {
        let text = self.debouncer.take()?;
        Some(self.run(&text))
    }

    fn run(&mut self, text: &str) -> EditOutcome {
        match self.parser.parse(text) {
            Ok(candidate) => {
                self.last_parse_error = None;
                self.reconciler.calculate(&mut self.session, candidate);
                EditOutcome::Calculated {
                    diff_len: self.session.diff_map().len(),
                }
            }
            Err(err) => {
                tracing::warn!(
                    op = "parse",
                    cycle_id = %self.cycle_id,
                    line = ?err.line,
                    column = ?err.column,
                    error = %err.message,
                    "candidate text rejected"
                );
                self.last_parse_error = Some(err);
                EditOutcome::ParseFailed
            }
        }
    }

    /// Commit the latest text and start a new edit cycle.
    ///
    /// An edit still waiting out its quiescence window is run first, so the
    /// committed snapshot always reflects the most recent text.
    ///
    /// # Errors
    ///
    /// [`SchemaDiffError::Parse`] if the pending edit does not parse; the
    /// previous candidate is then kept and nothing is committed. Otherwise
    /// see [`Reconciler::accept`]. On error the session is unchanged.
    ///
    /// [`SchemaDiffError::Parse`]: crate::errors::SchemaDiffError::Parse
    pub fn accept(&mut self) -> Result<CommitReceipt> {
        if let (Some(EditOutcome::ParseFailed), Some(err)) =
            (self.flush(), self.last_parse_error.as_ref())
        {
            return Err(err.clone().into());
        }
        let receipt = self.reconciler.accept(&mut self.session)?;
        self.cycle_id = CycleId::new();
        Ok(receipt)
    }

    /// Discard the candidate and any pending edit, then start a new edit cycle.
    pub fn undo(&mut self) -> &Snapshot {
        self.debouncer.cancel();
        self.last_parse_error = None;
        self.cycle_id = CycleId::new();
        self.reconciler.undo(&mut self.session)
    }

    /// End the edit session without accepting; runs the undo path.
    pub fn close(mut self) -> (Snapshot, C) {
        self.undo();
        self.reconciler.into_parts()
    }

    pub fn session(&self) -> &DiffSession {
        &self.session
    }

    pub fn authoritative(&self) -> &Snapshot {
        self.reconciler.authoritative()
    }

    pub fn committer(&self) -> &C {
        self.reconciler.committer()
    }

    pub fn committer_mut(&mut self) -> &mut C {
        self.reconciler.committer_mut()
    }

    pub fn last_parse_error(&self) -> Option<&ParseError> {
        self.last_parse_error.as_ref()
    }

    /// The retained parse error as a structured error tagged with this cycle
    pub fn parse_error_report(&self) -> Option<ExError> {
        self.last_parse_error.as_ref().map(|err| {
            ExError::new(ExErrorKind::ParseFailed)
                .with_op("parse")
                .with_cycle_id(self.cycle_id.clone())
                .with_message(err.to_string())
        })
    }

    pub fn has_pending_edit(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn cycle_id(&self) -> &CycleId {
        &self.cycle_id
    }

    pub fn subscribe(&mut self, observer: impl DiffObserver + 'static) -> SubscriptionId {
        self.session.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.session.unsubscribe(id)
    }
}
