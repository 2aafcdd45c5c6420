pub mod relationship;
pub mod snapshot;
pub mod table;

pub use relationship::{Cardinality, Relationship};
pub use snapshot::Snapshot;
pub use table::{Field, FieldType, Index, Table};
