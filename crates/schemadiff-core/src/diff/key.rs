//! Diff key scheme.
//!
//! Every diff entry is addressable by a [`DiffKey`], built from the object
//! kind, the entity id and, for attribute-level changes, the attribute name.
//! Keys compare and hash structurally, so an id that happens to contain
//! `-name-` can never alias another fact. Their string form is the stable
//! wire format:
//!
//! - entity level: `"{object}-{objectId}"`, e.g. `table-t1`
//! - attribute level: `"{object}-{attribute}-{objectId}"`, e.g. `table-name-t1`

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Kind of entity a diff entry talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffObject {
    Table,
    Field,
    Index,
    Relationship,
}

impl DiffObject {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffObject::Table => "table",
            DiffObject::Field => "field",
            DiffObject::Index => "index",
            DiffObject::Relationship => "relationship",
        }
    }
}

impl fmt::Display for DiffObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute compared at attribute level.
///
/// Tables compare `name`, `comments`, `color`; fields compare `name`, `type`,
/// `primaryKey`, `unique`, `nullable`, `comments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffAttribute {
    Name,
    Comments,
    Color,
    Type,
    PrimaryKey,
    Unique,
    Nullable,
}

impl DiffAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffAttribute::Name => "name",
            DiffAttribute::Comments => "comments",
            DiffAttribute::Color => "color",
            DiffAttribute::Type => "type",
            DiffAttribute::PrimaryKey => "primaryKey",
            DiffAttribute::Unique => "unique",
            DiffAttribute::Nullable => "nullable",
        }
    }
}

impl fmt::Display for DiffAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Changed,
}

/// Deterministic address of one diff entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiffKey {
    object: DiffObject,
    attribute: Option<DiffAttribute>,
    id: String,
}

impl DiffKey {
    /// Key for an added or removed entity
    pub fn entity(object: DiffObject, id: impl Into<String>) -> Self {
        Self {
            object,
            attribute: None,
            id: id.into(),
        }
    }

    /// Key for a changed attribute of an entity
    pub fn attribute(object: DiffObject, attribute: DiffAttribute, id: impl Into<String>) -> Self {
        Self {
            object,
            attribute: Some(attribute),
            id: id.into(),
        }
    }

    pub fn object(&self) -> DiffObject {
        self.object
    }

    pub fn attribute_name(&self) -> Option<DiffAttribute> {
        self.attribute
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DiffKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attribute {
            Some(attribute) => write!(f, "{}-{}-{}", self.object, attribute, self.id),
            None => write!(f, "{}-{}", self.object, self.id),
        }
    }
}

impl Serialize for DiffKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
