use serde::{Deserialize, Serialize};

/// Cardinality of a relationship between two tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    OneToOne,
    #[default]
    ManyToOne,
    OneToMany,
}

/// Relationship - a foreign key edge between two table fields
///
/// Only presence/absence of a relationship is diffed. The endpoint ids are
/// kept so that integrity rules can detect dangling references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub start_table_id: String,
    pub start_field_id: String,
    pub end_table_id: String,
    pub end_field_id: String,
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl Relationship {
    /// Create a many-to-one relationship from `start` to `end`
    pub fn new(
        id: impl Into<String>,
        (start_table_id, start_field_id): (&str, &str),
        (end_table_id, end_field_id): (&str, &str),
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_table_id: start_table_id.to_string(),
            start_field_id: start_field_id.to_string(),
            end_table_id: end_table_id.to_string(),
            end_field_id: end_field_id.to_string(),
            cardinality: Cardinality::default(),
        }
    }
}
