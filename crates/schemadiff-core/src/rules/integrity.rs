use crate::errors::{Result, SchemaDiffError};
use crate::model::Snapshot;

use super::invariants;

/// Check the referential integrity of a snapshot
///
/// A well-formed snapshot has:
///
/// 1. Unique table, field, index and relationship ids (field and index ids
///    are unique across the whole snapshot)
/// 2. Relationship endpoints that name an existing table and one of its fields
/// 3. Index columns that name fields of the owning table
///
/// The diff engine assumes these hold. Parsers should run this check before
/// handing a candidate to the diff session.
///
/// # Errors
/// Returns `IntegrityViolation` listing every problem found.
pub fn check_snapshot(snapshot: &Snapshot) -> Result<()> {
    let mut problems = Vec::new();

    for id in invariants::find_duplicate_table_ids(snapshot) {
        problems.push(format!("duplicate table id '{}'", id));
    }
    for id in invariants::find_duplicate_field_ids(snapshot) {
        problems.push(format!("duplicate field id '{}'", id));
    }
    for id in invariants::find_duplicate_index_ids(snapshot) {
        problems.push(format!("duplicate index id '{}'", id));
    }
    for id in invariants::find_duplicate_relationship_ids(snapshot) {
        problems.push(format!("duplicate relationship id '{}'", id));
    }
    for (relationship_id, table_id, field_id) in
        invariants::find_dangling_relationship_endpoints(snapshot)
    {
        problems.push(format!(
            "relationship '{}' references missing field '{}.{}'",
            relationship_id, table_id, field_id
        ));
    }
    for (index_id, field_id) in invariants::find_dangling_index_fields(snapshot) {
        problems.push(format!(
            "index '{}' covers missing field '{}'",
            index_id, field_id
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(SchemaDiffError::IntegrityViolation { problems })
    }
}
