use serde::{Deserialize, Serialize};

/// Table - one entity box in the schema diagram
///
/// Identity is carried by `id`, which stays stable across renames and
/// across reordering of the snapshot's table list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Stable opaque identifier
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    /// Header color as written by the editor (e.g. `#175e7a`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default)]
    pub indexes: Vec<Index>,
}

impl Table {
    /// Create an empty table with the given id and name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            comments: None,
            color: None,
            fields: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Builder-style helper used by parsers and tests
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Look up a field by id
    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }
}

/// Column type reference
///
/// Two types are the same when their `id`s match; `name` is display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl FieldType {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }
}

/// Field - one column of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Field {
    /// Create a nullable, non-key field
    pub fn new(id: impl Into<String>, name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type: FieldType::new(type_id),
            primary_key: false,
            unique: false,
            nullable: true,
            comments: None,
        }
    }

    /// Mark this field as the primary key (implies unique, not null)
    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self.unique = true;
        self.nullable = false;
        self
    }
}

/// Index over one or more fields of a table
///
/// Only presence/absence of an index is diffed; the remaining attributes
/// ride along so an added index can be rendered in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unique: bool,
    /// Field ids covered by the index, in index order
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Index {
    pub fn new(id: impl Into<String>, name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unique: false,
            fields,
        }
    }
}
