//! schemadiff core - structural diff and reconciliation for schema diagrams
//!
//! This crate provides:
//! - The schema snapshot model (tables, fields, indexes, relationships)
//! - A pure, order-invariant attribute-level diff computer
//! - A diff session holding the latest result and notifying observers
//! - Accept/undo reconciliation against a persistence collaborator
//! - A debounced live-edit consumer driving all of the above from edited text

pub mod config;
pub mod diff;
pub mod errors;
pub mod live_edit;
pub mod logging_facility;
pub mod model;
pub mod parser;
pub mod reconcile;
pub mod rules;
pub mod session;

// Re-exported so the logging macros can name schema constants via `$crate`
pub use schemadiff_core_types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use diff::{compute_diff, DiffKey, DiffResult};
pub use errors::{ExError, ExErrorKind, ParseError, Result, SchemaDiffError};
pub use live_edit::{Debouncer, EditOutcome, LiveEditSession};
pub use model::{Field, Index, Relationship, Snapshot, Table};
pub use parser::{JsonSnapshotParser, SchemaParser};
pub use reconcile::{CommitMode, CommitReceipt, InMemoryCommitter, Reconciler, SnapshotCommitter};
pub use session::{DiffEvent, DiffObserver, DiffSession};
