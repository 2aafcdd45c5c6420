#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use schemadiff_core::diff::{compute_diff, ChangeType, DiffEntry, DiffObject, DiffResult};
use schemadiff_core::model::{Field, Index, Relationship, Snapshot, Table};

const TABLE_NAMES: [&str; 3] = ["users", "accounts", "posts"];
const FIELD_NAMES: [&str; 3] = ["id", "name", "email"];
const TYPES: [&str; 2] = ["INT", "TEXT"];

/// (name, type, unique, nullable, comments) as small indices and flags
type RawField = (usize, usize, bool, bool, Option<bool>);
/// (name, fields, has_index, has_relationship)
type RawTable = (usize, Vec<RawField>, bool, bool);

fn raw_snapshot() -> impl Strategy<Value = Vec<RawTable>> {
    let raw_field = (
        0..FIELD_NAMES.len(),
        0..TYPES.len(),
        any::<bool>(),
        any::<bool>(),
        proptest::option::of(any::<bool>()),
    );
    prop::collection::vec(
        (
            0..TABLE_NAMES.len(),
            prop::collection::vec(raw_field, 0..4),
            any::<bool>(),
            any::<bool>(),
        ),
        0..5,
    )
}

/// Build a well-formed snapshot; ids are positional so two raw snapshots overlap.
fn build(raw: Vec<RawTable>) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for (t, (name, fields, has_index, _)) in raw.iter().enumerate() {
        let mut table = Table::new(format!("t{}", t), TABLE_NAMES[*name]);
        for (f, (field_name, ty, unique, nullable, comments)) in fields.iter().enumerate() {
            let mut field = Field::new(format!("f{}_{}", t, f), FIELD_NAMES[*field_name], TYPES[*ty]);
            field.unique = *unique;
            field.nullable = *nullable;
            field.comments = comments.map(|set| if set { "note".to_string() } else { String::new() });
            table.fields.push(field);
        }
        if *has_index && !fields.is_empty() {
            table
                .indexes
                .push(Index::new(format!("i{}", t), "idx", vec![format!("f{}_0", t)]));
        }
        snapshot.tables.push(table);
    }
    let root_has_field = raw.first().is_some_and(|(_, fields, _, _)| !fields.is_empty());
    for (t, (_, fields, _, has_relationship)) in raw.iter().enumerate().skip(1) {
        if *has_relationship && root_has_field && !fields.is_empty() {
            snapshot.relationships.push(Relationship::new(
                format!("r{}", t),
                (format!("t{}", t).as_str(), format!("f{}_0", t).as_str()),
                ("t0", "f0_0"),
            ));
        }
    }
    snapshot
}

fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    raw_snapshot().prop_map(build)
}

/// Rotate tables and relationships, reverse every field and index list
fn permuted(snapshot: &Snapshot, rotation: usize) -> Snapshot {
    let mut copy = snapshot.clone();
    if !copy.tables.is_empty() {
        let n = rotation % copy.tables.len();
        copy.tables.rotate_left(n);
    }
    for table in &mut copy.tables {
        table.fields.reverse();
        table.indexes.reverse();
    }
    copy.relationships.reverse();
    copy
}

/// Added tables carry their full contents, so sort those before comparing
fn canonical_json(diff: &DiffResult) -> String {
    let mut diff = diff.clone();
    let added: Vec<DiffEntry> = diff
        .diff_map
        .entries_for(DiffObject::Table, ChangeType::Added)
        .cloned()
        .collect();
    for entry in added {
        if let DiffEntry::TableAdded { mut table } = entry {
            table.fields.sort_by(|a, b| a.id.cmp(&b.id));
            table.indexes.sort_by(|a, b| a.id.cmp(&b.id));
            diff.diff_map.insert(DiffEntry::TableAdded { table });
        }
    }
    serde_json::to_string(&diff).unwrap()
}

proptest! {
    #[test]
    fn prop_diff_against_self_is_empty(snapshot in arb_snapshot()) {
        let diff = compute_diff(&snapshot, &snapshot);
        prop_assert!(diff.diff_map.is_empty());
        prop_assert!(diff.changed_tables.is_empty());
        prop_assert!(diff.changed_fields.is_empty());
    }

    #[test]
    fn prop_diff_is_order_invariant(
        old in arb_snapshot(),
        new in arb_snapshot(),
        rotation in 0usize..8,
    ) {
        let baseline = compute_diff(&old, &new);
        let shuffled = compute_diff(&permuted(&old, rotation), &permuted(&new, rotation + 1));
        prop_assert_eq!(canonical_json(&baseline), canonical_json(&shuffled));
    }

    #[test]
    fn prop_presence_is_symmetric(a in arb_snapshot(), b in arb_snapshot()) {
        let forward = compute_diff(&a, &b);
        let backward = compute_diff(&b, &a);
        for entry in forward.diff_map.entries_for(DiffObject::Table, ChangeType::Added) {
            let reverse = backward.diff_map.presence_change(DiffObject::Table, entry.object_id());
            prop_assert_eq!(reverse.map(|e| e.change_type()), Some(ChangeType::Removed));
        }
        for entry in forward.diff_map.entries_for(DiffObject::Relationship, ChangeType::Removed) {
            let reverse = backward.diff_map.presence_change(DiffObject::Relationship, entry.object_id());
            prop_assert_eq!(reverse.map(|e| e.change_type()), Some(ChangeType::Added));
        }
        prop_assert_eq!(&forward.changed_tables, &backward.changed_tables);
        prop_assert_eq!(&forward.changed_fields, &backward.changed_fields);
    }

    #[test]
    fn prop_field_entries_mark_owning_table(a in arb_snapshot(), b in arb_snapshot()) {
        let diff = compute_diff(&a, &b);
        for (_, entry) in &diff.diff_map {
            if entry.object() == DiffObject::Field {
                let table_id = entry.table_id().expect("field entries are table scoped");
                prop_assert!(diff.table_changed(table_id));
                prop_assert!(diff.field_changed(entry.object_id()));
            }
        }
    }

    #[test]
    fn prop_relationship_changes_alone_mark_nothing(snapshot in arb_snapshot()) {
        let mut stripped = snapshot.clone();
        stripped.relationships.clear();
        let diff = compute_diff(&snapshot, &stripped);
        prop_assert_eq!(diff.diff_map.len(), snapshot.relationships.len());
        prop_assert!(diff.changed_tables.is_empty());
    }
}
