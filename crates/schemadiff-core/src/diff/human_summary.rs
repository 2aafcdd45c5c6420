//! Human-readable summary renderer for schema diffs.

use std::collections::BTreeMap;

use crate::diff::key::{ChangeType, DiffObject};
use crate::diff::model::{DiffEntry, DiffResult};

/// Render a human-readable Markdown summary of a [`DiffResult`].
///
/// Table-scoped entries are grouped under their owning table; relationship
/// entries get their own section. The summary is informational only and
/// does not affect the structured diff.
pub fn render_human_summary(diff: &DiffResult) -> String {
    let mut out = String::new();

    out.push_str("## Schema Diff\n\n");

    if diff.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    let added = count(diff, ChangeType::Added);
    let removed = count(diff, ChangeType::Removed);
    let changed = count(diff, ChangeType::Changed);
    out.push_str(&format!(
        "**Entries**: {} ({} added, {} removed, {} changed)  \n**Tables touched**: {}\n\n",
        diff.diff_map.len(),
        added,
        removed,
        changed,
        diff.changed_tables.len()
    ));

    // Group table-scoped entries by owning table id
    let mut by_table: BTreeMap<&str, Vec<&DiffEntry>> = BTreeMap::new();
    let mut relationships: Vec<&DiffEntry> = Vec::new();
    for (_, entry) in &diff.diff_map {
        match entry.table_id() {
            Some(table_id) => by_table.entry(table_id).or_default().push(entry),
            None => relationships.push(entry),
        }
    }

    for (table_id, entries) in &by_table {
        out.push_str(&format!("### Table `{}`\n\n", table_id));
        for entry in entries {
            out.push_str(&format!("- {}\n", describe(entry)));
        }
        out.push('\n');
    }

    if !relationships.is_empty() {
        out.push_str("### Relationships\n\n");
        for entry in relationships {
            out.push_str(&format!("- {}\n", describe(entry)));
        }
        out.push('\n');
    }

    out
}

fn count(diff: &DiffResult, change: ChangeType) -> usize {
    [
        DiffObject::Table,
        DiffObject::Field,
        DiffObject::Index,
        DiffObject::Relationship,
    ]
    .into_iter()
    .map(|object| diff.diff_map.entries_for(object, change).count())
    .sum()
}

fn describe(entry: &DiffEntry) -> String {
    match entry {
        DiffEntry::TableAdded { table } => format!(
            "**Added** table `{}` ({} fields, {} indexes)",
            table.name,
            table.fields.len(),
            table.indexes.len()
        ),
        DiffEntry::TableRemoved { table_id } => format!("**Removed** table `{}`", table_id),
        DiffEntry::TableChanged {
            attribute,
            old_value,
            new_value,
            ..
        } => format!("Table `{}`: `{}` → `{}`", attribute, old_value, new_value),
        DiffEntry::FieldAdded { field, .. } => format!(
            "**Added** field `{}` ({})",
            field.name, field.field_type.id
        ),
        DiffEntry::FieldRemoved { field_id, .. } => format!("**Removed** field `{}`", field_id),
        DiffEntry::FieldChanged {
            field_id,
            attribute,
            old_value,
            new_value,
            ..
        } => format!(
            "Field `{}` `{}`: `{}` → `{}`",
            field_id, attribute, old_value, new_value
        ),
        DiffEntry::IndexAdded { index, .. } => format!("**Added** index `{}`", index.name),
        DiffEntry::IndexRemoved { index_id, .. } => format!("**Removed** index `{}`", index_id),
        DiffEntry::RelationshipAdded { relationship } => format!(
            "**Added** relationship `{}` ({}.{} → {}.{})",
            relationship.id,
            relationship.start_table_id,
            relationship.start_field_id,
            relationship.end_table_id,
            relationship.end_field_id
        ),
        DiffEntry::RelationshipRemoved { relationship_id } => {
            format!("**Removed** relationship `{}`", relationship_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::engine::compute_diff;
    use crate::model::{Field, Snapshot, Table};

    fn base() -> Snapshot {
        Snapshot::new().with_table(
            Table::new("t1", "users").with_field(Field::new("f1", "id", "INT").primary()),
        )
    }

    #[test]
    fn test_summary_identical() {
        let a = base();
        let s = render_human_summary(&compute_diff(&a, &a));
        assert!(s.contains("_No changes detected._"));
    }

    #[test]
    fn test_summary_groups_field_changes_under_table() {
        let a = base();
        let mut b = base();
        b.tables[0].fields[0].name = "user_id".to_string();
        let s = render_human_summary(&compute_diff(&a, &b));
        assert!(s.contains("### Table `t1`"));
        assert!(s.contains("Field `f1` `name`: `id` → `user_id`"));
        assert!(s.contains("0 added, 0 removed, 1 changed"));
    }

    #[test]
    fn test_summary_lists_added_table() {
        let a = base();
        let b = base().with_table(Table::new("t2", "posts"));
        let s = render_human_summary(&compute_diff(&a, &b));
        assert!(s.contains("**Added** table `posts` (0 fields, 0 indexes)"));
    }
}
