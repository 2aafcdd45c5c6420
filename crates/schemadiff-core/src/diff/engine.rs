//! Schema diff computation engine.
//!
//! The entry point is [`compute_diff`], a pure, total function from two
//! snapshots to a [`DiffResult`]. Four independent passes run over the same
//! inputs: table presence, table attributes, table contents (fields and
//! indexes) and relationship presence. All matching is by id through
//! lookups built once per call, so the result does not depend on the order
//! of any array in either snapshot.

use std::collections::{BTreeMap, BTreeSet};

use crate::diff::key::{ChangeType, DiffAttribute};
use crate::diff::model::{AttributeValue, DiffEntry, DiffMap, DiffResult};
use crate::model::{Field, Snapshot, Table};
use crate::rules::integrity;

/// Accumulates entries and change-presence marks during one computation.
#[derive(Default)]
struct DiffBuilder {
    diff_map: DiffMap,
    changed_tables: BTreeSet<String>,
    changed_fields: BTreeSet<String>,
}

impl DiffBuilder {
    /// Record an entry. A field or index id that moves between tables yields
    /// a removal and an addition under the same key; the addition is kept.
    fn push(&mut self, entry: DiffEntry) {
        if entry.change_type() == ChangeType::Removed {
            let key = entry.key();
            if self
                .diff_map
                .get(&key)
                .is_some_and(|existing| existing.change_type() == ChangeType::Added)
            {
                return;
            }
        }
        self.diff_map.insert(entry);
    }

    fn mark_table(&mut self, table_id: &str) {
        if !self.changed_tables.contains(table_id) {
            self.changed_tables.insert(table_id.to_string());
        }
    }

    fn mark_field(&mut self, field_id: &str) {
        if !self.changed_fields.contains(field_id) {
            self.changed_fields.insert(field_id.to_string());
        }
    }

    fn finish(self) -> DiffResult {
        DiffResult {
            diff_map: self.diff_map,
            changed_tables: self.changed_tables,
            changed_fields: self.changed_fields,
        }
    }
}

/// Build an id → entity lookup for one collection, iterated in id order.
fn by_id<'a, T>(items: &'a [T], id: impl Fn(&T) -> &str) -> BTreeMap<&'a str, &'a T> {
    items.iter().map(|item| (id(item), item)).collect()
}

/// Id-set symmetric difference.
///
/// Returns `(added, removed)` where added = entities in `new` whose id is
/// absent from `old`, removed = ids in `old` absent from `new`.
fn presence_delta<'a, T>(
    old: &BTreeMap<&'a str, &'a T>,
    new: &BTreeMap<&'a str, &'a T>,
) -> (Vec<&'a T>, Vec<&'a str>) {
    let added = new
        .iter()
        .filter(|(id, _)| !old.contains_key(*id))
        .map(|(_, item)| *item)
        .collect();
    let removed = old
        .keys()
        .filter(|id| !new.contains_key(*id))
        .copied()
        .collect();
    (added, removed)
}

/// Optional text comparison: both empty-or-absent counts as equal,
/// otherwise the values are compared strictly.
fn optional_text_differs(old: Option<&str>, new: Option<&str>) -> bool {
    let old = old.filter(|s| !s.is_empty());
    let new = new.filter(|s| !s.is_empty());
    old != new
}

/// Pass 2: compare `name`, `comments`, `color` of a table present on both sides.
fn diff_table_attributes(old: &Table, new: &Table, out: &mut DiffBuilder) {
    let mut changes: Vec<(DiffAttribute, AttributeValue, AttributeValue)> = Vec::new();

    if old.name != new.name {
        changes.push((
            DiffAttribute::Name,
            AttributeValue::text(&old.name),
            AttributeValue::text(&new.name),
        ));
    }
    if optional_text_differs(old.comments.as_deref(), new.comments.as_deref()) {
        changes.push((
            DiffAttribute::Comments,
            AttributeValue::optional_text(old.comments.as_deref()),
            AttributeValue::optional_text(new.comments.as_deref()),
        ));
    }
    if optional_text_differs(old.color.as_deref(), new.color.as_deref()) {
        changes.push((
            DiffAttribute::Color,
            AttributeValue::optional_text(old.color.as_deref()),
            AttributeValue::optional_text(new.color.as_deref()),
        ));
    }

    if changes.is_empty() {
        return;
    }
    out.mark_table(&new.id);
    for (attribute, old_value, new_value) in changes {
        out.push(DiffEntry::TableChanged {
            table_id: new.id.clone(),
            attribute,
            old_value,
            new_value,
        });
    }
}

/// Compare the attributes of one field present on both sides.
fn diff_field_attributes(table_id: &str, old: &Field, new: &Field, out: &mut DiffBuilder) {
    let mut changes: Vec<(DiffAttribute, AttributeValue, AttributeValue)> = Vec::new();

    if old.name != new.name {
        changes.push((
            DiffAttribute::Name,
            AttributeValue::text(&old.name),
            AttributeValue::text(&new.name),
        ));
    }
    // Type identity is the type id; the display name is not compared.
    if old.field_type.id != new.field_type.id {
        changes.push((
            DiffAttribute::Type,
            AttributeValue::text(&old.field_type.id),
            AttributeValue::text(&new.field_type.id),
        ));
    }
    let flags = [
        (DiffAttribute::PrimaryKey, old.primary_key, new.primary_key),
        (DiffAttribute::Unique, old.unique, new.unique),
        (DiffAttribute::Nullable, old.nullable, new.nullable),
    ];
    for (attribute, old_flag, new_flag) in flags {
        if old_flag != new_flag {
            changes.push((
                attribute,
                AttributeValue::Flag(old_flag),
                AttributeValue::Flag(new_flag),
            ));
        }
    }
    if optional_text_differs(old.comments.as_deref(), new.comments.as_deref()) {
        changes.push((
            DiffAttribute::Comments,
            AttributeValue::optional_text(old.comments.as_deref()),
            AttributeValue::optional_text(new.comments.as_deref()),
        ));
    }

    if changes.is_empty() {
        return;
    }
    out.mark_table(table_id);
    out.mark_field(&new.id);
    for (attribute, old_value, new_value) in changes {
        out.push(DiffEntry::FieldChanged {
            table_id: table_id.to_string(),
            field_id: new.id.clone(),
            attribute,
            old_value,
            new_value,
        });
    }
}

/// Pass 3: field presence, field attributes and index presence, scoped to one table.
fn diff_table_contents(old: &Table, new: &Table, out: &mut DiffBuilder) {
    let table_id = new.id.as_str();

    let old_fields = by_id(&old.fields, |f| f.id.as_str());
    let new_fields = by_id(&new.fields, |f| f.id.as_str());
    let (added_fields, removed_fields) = presence_delta(&old_fields, &new_fields);

    for field in added_fields {
        out.mark_table(table_id);
        out.mark_field(&field.id);
        out.push(DiffEntry::FieldAdded {
            table_id: table_id.to_string(),
            field: field.clone(),
        });
    }
    for field_id in removed_fields {
        out.mark_table(table_id);
        out.mark_field(field_id);
        out.push(DiffEntry::FieldRemoved {
            table_id: table_id.to_string(),
            field_id: field_id.to_string(),
        });
    }
    for (field_id, old_field) in &old_fields {
        if let Some(new_field) = new_fields.get(field_id) {
            diff_field_attributes(table_id, old_field, new_field, out);
        }
    }

    let old_indexes = by_id(&old.indexes, |i| i.id.as_str());
    let new_indexes = by_id(&new.indexes, |i| i.id.as_str());
    let (added_indexes, removed_indexes) = presence_delta(&old_indexes, &new_indexes);

    for index in added_indexes {
        out.mark_table(table_id);
        out.push(DiffEntry::IndexAdded {
            table_id: table_id.to_string(),
            index: index.clone(),
        });
    }
    for index_id in removed_indexes {
        out.mark_table(table_id);
        out.push(DiffEntry::IndexRemoved {
            table_id: table_id.to_string(),
            index_id: index_id.to_string(),
        });
    }
}

/// Compute the attribute-level diff between two schema snapshots.
///
/// Neither input is mutated. The result is invariant under reordering of
/// any table, field, index or relationship array, and `compute_diff(s, s)`
/// is always empty.
///
/// Snapshots are expected to be well formed (unique ids, no dangling
/// relationship endpoints); debug builds assert this.
#[must_use]
pub fn compute_diff(old: &Snapshot, new: &Snapshot) -> DiffResult {
    debug_assert!(
        integrity::check_snapshot(old).is_ok(),
        "compute_diff: old snapshot violates integrity rules"
    );
    debug_assert!(
        integrity::check_snapshot(new).is_ok(),
        "compute_diff: new snapshot violates integrity rules"
    );

    let mut out = DiffBuilder::default();

    let old_tables = by_id(&old.tables, |t| t.id.as_str());
    let new_tables = by_id(&new.tables, |t| t.id.as_str());

    // Pass 1: table presence
    let (added_tables, removed_tables) = presence_delta(&old_tables, &new_tables);
    for table in added_tables {
        out.mark_table(&table.id);
        out.push(DiffEntry::TableAdded {
            table: table.clone(),
        });
    }
    for table_id in removed_tables {
        out.mark_table(table_id);
        out.push(DiffEntry::TableRemoved {
            table_id: table_id.to_string(),
        });
    }

    // Passes 2 and 3: tables present on both sides
    for (table_id, old_table) in &old_tables {
        if let Some(new_table) = new_tables.get(table_id) {
            diff_table_attributes(old_table, new_table, &mut out);
            diff_table_contents(old_table, new_table, &mut out);
        }
    }

    // Pass 4: relationship presence. Never marks a table.
    let old_relationships = by_id(&old.relationships, |r| r.id.as_str());
    let new_relationships = by_id(&new.relationships, |r| r.id.as_str());
    let (added_relationships, removed_relationships) =
        presence_delta(&old_relationships, &new_relationships);
    for relationship in added_relationships {
        out.push(DiffEntry::RelationshipAdded {
            relationship: relationship.clone(),
        });
    }
    for relationship_id in removed_relationships {
        out.push(DiffEntry::RelationshipRemoved {
            relationship_id: relationship_id.to_string(),
        });
    }

    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_text_guard() {
        assert!(!optional_text_differs(None, Some("")));
        assert!(!optional_text_differs(Some(""), None));
        assert!(!optional_text_differs(None, None));
        assert!(optional_text_differs(None, Some("note")));
        assert!(optional_text_differs(Some("a"), Some("b")));
        assert!(!optional_text_differs(Some("a"), Some("a")));
    }

    #[test]
    fn test_presence_delta_is_symmetric_difference() {
        let old = vec![Table::new("t1", "a"), Table::new("t2", "b")];
        let new = vec![Table::new("t2", "b"), Table::new("t3", "c")];
        let old_map = by_id(&old, |t| t.id.as_str());
        let new_map = by_id(&new, |t| t.id.as_str());
        let (added, removed) = presence_delta(&old_map, &new_map);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].id, "t3");
        assert_eq!(removed, vec!["t1"]);
    }

    #[test]
    fn test_field_type_compared_by_id_only() {
        let old = Field::new("f1", "id", "INT");
        let mut new = old.clone();
        new.field_type.name = "integer".to_string();
        let mut out = DiffBuilder::default();
        diff_field_attributes("t1", &old, &new, &mut out);
        assert!(out.finish().is_empty());
    }
}
