//! Snapshot invariant finders
//!
//! Each function scans a snapshot for one class of problem and returns every
//! occurrence, so callers can report exhaustively instead of first-error.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::Snapshot;

/// Collect ids that occur more than once, in first-seen order
fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut order = Vec::new();
    for id in ids {
        let count = counts.entry(id).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(id.to_string());
        }
    }
    order
}

/// Table ids used by more than one table
pub fn find_duplicate_table_ids(snapshot: &Snapshot) -> Vec<String> {
    duplicates(snapshot.tables.iter().map(|t| t.id.as_str()))
}

/// Field ids used more than once anywhere in the snapshot
///
/// Field ids are global: change-presence indices and diff keys are not
/// scoped by table.
pub fn find_duplicate_field_ids(snapshot: &Snapshot) -> Vec<String> {
    duplicates(
        snapshot
            .tables
            .iter()
            .flat_map(|t| t.fields.iter().map(|f| f.id.as_str())),
    )
}

/// Index ids used more than once anywhere in the snapshot
pub fn find_duplicate_index_ids(snapshot: &Snapshot) -> Vec<String> {
    duplicates(
        snapshot
            .tables
            .iter()
            .flat_map(|t| t.indexes.iter().map(|i| i.id.as_str())),
    )
}

pub fn find_duplicate_relationship_ids(snapshot: &Snapshot) -> Vec<String> {
    duplicates(snapshot.relationships.iter().map(|r| r.id.as_str()))
}

/// Relationship endpoints that point at a missing table or at a field the
/// referenced table does not own
///
/// Returns `(relationship_id, table_id, field_id)` for each bad endpoint.
pub fn find_dangling_relationship_endpoints(
    snapshot: &Snapshot,
) -> Vec<(String, String, String)> {
    let mut fields_by_table: HashMap<&str, HashSet<&str>> = HashMap::new();
    for table in &snapshot.tables {
        fields_by_table
            .entry(table.id.as_str())
            .or_default()
            .extend(table.fields.iter().map(|f| f.id.as_str()));
    }

    let mut dangling = Vec::new();
    for relationship in &snapshot.relationships {
        let endpoints = [
            (&relationship.start_table_id, &relationship.start_field_id),
            (&relationship.end_table_id, &relationship.end_field_id),
        ];
        for (table_id, field_id) in endpoints {
            let resolved = fields_by_table
                .get(table_id.as_str())
                .is_some_and(|fields| fields.contains(field_id.as_str()));
            if !resolved {
                dangling.push((relationship.id.clone(), table_id.clone(), field_id.clone()));
            }
        }
    }
    dangling
}

/// Index columns that name a field the owning table does not have
///
/// Returns `(index_id, field_id)` pairs.
pub fn find_dangling_index_fields(snapshot: &Snapshot) -> Vec<(String, String)> {
    let mut dangling = Vec::new();
    for table in &snapshot.tables {
        let field_ids: HashSet<&str> = table.fields.iter().map(|f| f.id.as_str()).collect();
        for index in &table.indexes {
            for field_id in &index.fields {
                if !field_ids.contains(field_id.as_str()) {
                    dangling.push((index.id.clone(), field_id.clone()));
                }
            }
        }
    }
    dangling
}
