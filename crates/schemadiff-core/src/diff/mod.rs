//! Schema snapshot diff engine.
//!
//! Compares two schema snapshots and produces an attribute-level,
//! deterministic diff keyed by [`key::DiffKey`].
//!
//! ## Entry point
//!
//! ```
//! use schemadiff_core::diff::compute_diff;
//! use schemadiff_core::model::{Snapshot, Table};
//!
//! let old = Snapshot::new().with_table(Table::new("t1", "users"));
//! let new = Snapshot::new().with_table(Table::new("t1", "accounts"));
//! let diff = compute_diff(&old, &new);
//! assert!(diff.table_changed("t1"));
//! ```
//!
//! ## Guarantees
//!
//! - **Purity**: inputs are never mutated; no I/O.
//! - **Order invariance**: matching is by id only.
//! - **Attribute isolation**: one entry per changed attribute.
//! - **Relationship isolation**: relationship presence changes never mark a table.

pub mod engine;
pub mod human_summary;
pub mod key;
pub mod model;

pub use engine::compute_diff;
pub use human_summary::render_human_summary;
pub use key::{ChangeType, DiffAttribute, DiffKey, DiffObject};
pub use model::{AttributeValue, DiffEntry, DiffMap, DiffResult};
