use schemadiff_core::model::{Field, Index, Relationship, Snapshot, Table};

/// Users and posts, linked by `posts.author_id -> users.id`
///
/// - `t1` users: `f1` id (pk), `f2` email, index `i1` on email
/// - `t2` posts: `f3` id (pk), `f4` author_id
/// - `r1` posts.author_id -> users.id
#[allow(dead_code)]
pub fn blog_snapshot() -> Snapshot {
    Snapshot::new()
        .with_table(
            Table::new("t1", "users")
                .with_field(Field::new("f1", "id", "INT").primary())
                .with_field(Field::new("f2", "email", "VARCHAR"))
                .with_index(Index::new("i1", "users_email_idx", vec!["f2".to_string()])),
        )
        .with_table(
            Table::new("t2", "posts")
                .with_field(Field::new("f3", "id", "INT").primary())
                .with_field(Field::new("f4", "author_id", "INT")),
        )
        .with_relationship(Relationship::new("r1", ("t2", "f4"), ("t1", "f1")))
}

/// A single `users` table with one `id` field
#[allow(dead_code)]
pub fn users_snapshot() -> Snapshot {
    Snapshot::new().with_table(
        Table::new("t1", "users").with_field(Field::new("f1", "id", "INT").primary()),
    )
}

/// Apply `edit` to a clone of `snapshot`
#[allow(dead_code)]
pub fn edited(snapshot: &Snapshot, edit: impl FnOnce(&mut Snapshot)) -> Snapshot {
    let mut copy = snapshot.clone();
    edit(&mut copy);
    copy
}

/// Mutable access to a field by table id and field id, panicking if absent
#[allow(dead_code)]
pub fn field_mut<'a>(snapshot: &'a mut Snapshot, table_id: &str, field_id: &str) -> &'a mut Field {
    snapshot
        .table_mut(table_id)
        .and_then(|t| t.fields.iter_mut().find(|f| f.id == field_id))
        .unwrap_or_else(|| panic!("missing field {}.{}", table_id, field_id))
}

/// Serialize a snapshot the way the live editor text looks
#[allow(dead_code)]
pub fn to_editor_text(snapshot: &Snapshot) -> String {
    serde_json::to_string_pretty(snapshot).unwrap()
}
