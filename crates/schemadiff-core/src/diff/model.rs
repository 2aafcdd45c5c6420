//! Schema diff output types.
//!
//! Collections use `BTreeMap`/`BTreeSet` so that serialization is
//! deterministic regardless of the order in which entries were produced.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{btree_map, BTreeMap, BTreeSet};

use crate::diff::key::{ChangeType, DiffAttribute, DiffKey, DiffObject};
use crate::model::{Field, Index, Relationship, Snapshot, Table};

/// Old or new value of a changed attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Text(Option<String>),
}

impl AttributeValue {
    pub fn text(value: &str) -> Self {
        AttributeValue::Text(Some(value.to_string()))
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        AttributeValue::Text(value.map(str::to_string))
    }

    /// Text content, if this is a present text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(value) => value.as_deref(),
            AttributeValue::Flag(_) => None,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Flag(value) => write!(f, "{}", value),
            AttributeValue::Text(Some(value)) => write!(f, "{}", value),
            AttributeValue::Text(None) => f.write_str("(none)"),
        }
    }
}

/// One added/removed/changed fact about one entity or one entity attribute.
///
/// A change touching several attributes of the same entity is reported as
/// several `*Changed` entries, one per attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum DiffEntry {
    TableAdded {
        table: Table,
    },
    TableRemoved {
        table_id: String,
    },
    TableChanged {
        table_id: String,
        attribute: DiffAttribute,
        old_value: AttributeValue,
        new_value: AttributeValue,
    },
    FieldAdded {
        table_id: String,
        field: Field,
    },
    FieldRemoved {
        table_id: String,
        field_id: String,
    },
    FieldChanged {
        table_id: String,
        field_id: String,
        attribute: DiffAttribute,
        old_value: AttributeValue,
        new_value: AttributeValue,
    },
    IndexAdded {
        table_id: String,
        index: Index,
    },
    IndexRemoved {
        table_id: String,
        index_id: String,
    },
    RelationshipAdded {
        relationship: Relationship,
    },
    RelationshipRemoved {
        relationship_id: String,
    },
}

impl DiffEntry {
    /// Kind of entity this entry describes
    pub fn object(&self) -> DiffObject {
        match self {
            DiffEntry::TableAdded { .. }
            | DiffEntry::TableRemoved { .. }
            | DiffEntry::TableChanged { .. } => DiffObject::Table,
            DiffEntry::FieldAdded { .. }
            | DiffEntry::FieldRemoved { .. }
            | DiffEntry::FieldChanged { .. } => DiffObject::Field,
            DiffEntry::IndexAdded { .. } | DiffEntry::IndexRemoved { .. } => DiffObject::Index,
            DiffEntry::RelationshipAdded { .. } | DiffEntry::RelationshipRemoved { .. } => {
                DiffObject::Relationship
            }
        }
    }

    pub fn change_type(&self) -> ChangeType {
        match self {
            DiffEntry::TableAdded { .. }
            | DiffEntry::FieldAdded { .. }
            | DiffEntry::IndexAdded { .. }
            | DiffEntry::RelationshipAdded { .. } => ChangeType::Added,
            DiffEntry::TableRemoved { .. }
            | DiffEntry::FieldRemoved { .. }
            | DiffEntry::IndexRemoved { .. }
            | DiffEntry::RelationshipRemoved { .. } => ChangeType::Removed,
            DiffEntry::TableChanged { .. } | DiffEntry::FieldChanged { .. } => ChangeType::Changed,
        }
    }

    /// Id of the entity this entry is about
    pub fn object_id(&self) -> &str {
        match self {
            DiffEntry::TableAdded { table } => &table.id,
            DiffEntry::TableRemoved { table_id } | DiffEntry::TableChanged { table_id, .. } => {
                table_id
            }
            DiffEntry::FieldAdded { field, .. } => &field.id,
            DiffEntry::FieldRemoved { field_id, .. } | DiffEntry::FieldChanged { field_id, .. } => {
                field_id
            }
            DiffEntry::IndexAdded { index, .. } => &index.id,
            DiffEntry::IndexRemoved { index_id, .. } => index_id,
            DiffEntry::RelationshipAdded { relationship } => &relationship.id,
            DiffEntry::RelationshipRemoved { relationship_id } => relationship_id,
        }
    }

    /// Id of the table that owns the entity (the table itself for table entries)
    ///
    /// Relationships are snapshot-scoped and have no owning table.
    pub fn table_id(&self) -> Option<&str> {
        match self {
            DiffEntry::TableAdded { table } => Some(&table.id),
            DiffEntry::TableRemoved { table_id }
            | DiffEntry::TableChanged { table_id, .. }
            | DiffEntry::FieldAdded { table_id, .. }
            | DiffEntry::FieldRemoved { table_id, .. }
            | DiffEntry::FieldChanged { table_id, .. }
            | DiffEntry::IndexAdded { table_id, .. }
            | DiffEntry::IndexRemoved { table_id, .. } => Some(table_id),
            DiffEntry::RelationshipAdded { .. } | DiffEntry::RelationshipRemoved { .. } => None,
        }
    }

    /// Changed attribute, for `*Changed` entries
    pub fn attribute(&self) -> Option<DiffAttribute> {
        match self {
            DiffEntry::TableChanged { attribute, .. } | DiffEntry::FieldChanged { attribute, .. } => {
                Some(*attribute)
            }
            _ => None,
        }
    }

    pub fn old_value(&self) -> Option<&AttributeValue> {
        match self {
            DiffEntry::TableChanged { old_value, .. } | DiffEntry::FieldChanged { old_value, .. } => {
                Some(old_value)
            }
            _ => None,
        }
    }

    pub fn new_value(&self) -> Option<&AttributeValue> {
        match self {
            DiffEntry::TableChanged { new_value, .. } | DiffEntry::FieldChanged { new_value, .. } => {
                Some(new_value)
            }
            _ => None,
        }
    }

    /// Deterministic key under which this entry is stored
    pub fn key(&self) -> DiffKey {
        match self.attribute() {
            Some(attribute) => DiffKey::attribute(self.object(), attribute, self.object_id()),
            None => DiffKey::entity(self.object(), self.object_id()),
        }
    }
}

/// Mapping from [`DiffKey`] to exactly one [`DiffEntry`].
///
/// Serializes as a JSON object keyed by each key's string form. That form is
/// not injective when ids contain `-`: a table with id `name-t1` and a name
/// change on table `t1` are distinct keys here but both render as
/// `table-name-t1`, and a JSON reader keeps only one of them. Use the typed
/// lookups when ids may contain `-`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiffMap(BTreeMap<DiffKey, DiffEntry>);

impl DiffMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry under its own key, replacing any previous entry for that key
    pub fn insert(&mut self, entry: DiffEntry) -> Option<DiffEntry> {
        self.0.insert(entry.key(), entry)
    }

    pub fn get(&self, key: &DiffKey) -> Option<&DiffEntry> {
        self.0.get(key)
    }

    /// Entity-level lookup: did `object` `id` get added or removed?
    pub fn presence_change(&self, object: DiffObject, id: &str) -> Option<&DiffEntry> {
        self.0.get(&DiffKey::entity(object, id))
    }

    /// Attribute-level lookup: did `attribute` of `object` `id` change?
    pub fn attribute_change(
        &self,
        object: DiffObject,
        attribute: DiffAttribute,
        id: &str,
    ) -> Option<&DiffEntry> {
        self.0.get(&DiffKey::attribute(object, attribute, id))
    }

    /// Entries of one object kind and change type, in key order
    pub fn entries_for(
        &self,
        object: DiffObject,
        change: ChangeType,
    ) -> impl Iterator<Item = &DiffEntry> {
        self.0
            .values()
            .filter(move |e| e.object() == object && e.change_type() == change)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, DiffKey, DiffEntry> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DiffKey> {
        self.0.keys()
    }
}

impl<'a> IntoIterator for &'a DiffMap {
    type Item = (&'a DiffKey, &'a DiffEntry);
    type IntoIter = btree_map::Iter<'a, DiffKey, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of one diff computation: the diff map plus change-presence indices.
///
/// `changed_tables` and `changed_fields` serialize as `{ id: true }` maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub diff_map: DiffMap,
    #[serde(serialize_with = "serialize_presence")]
    pub changed_tables: BTreeSet<String>,
    #[serde(serialize_with = "serialize_presence")]
    pub changed_fields: BTreeSet<String>,
}

impl DiffResult {
    /// True when nothing at all changed
    pub fn is_empty(&self) -> bool {
        self.diff_map.is_empty()
    }

    pub fn table_changed(&self, table_id: &str) -> bool {
        self.changed_tables.contains(table_id)
    }

    pub fn field_changed(&self, field_id: &str) -> bool {
        self.changed_fields.contains(field_id)
    }

    /// Tables of `new` that this diff reports as added, in `new`'s order
    pub fn tables_added(&self, new: &Snapshot) -> Vec<Table> {
        new.tables
            .iter()
            .filter(|t| {
                matches!(
                    self.diff_map.presence_change(DiffObject::Table, &t.id),
                    Some(DiffEntry::TableAdded { .. })
                )
            })
            .cloned()
            .collect()
    }
}

fn serialize_presence<S: Serializer>(ids: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(ids.len()))?;
    for id in ids {
        map.serialize_entry(id, &true)?;
    }
    map.end()
}
