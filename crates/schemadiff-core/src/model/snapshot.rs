use serde::{Deserialize, Serialize};

use super::relationship::Relationship;
use super::table::Table;

/// Snapshot - a complete schema state at one point in time
///
/// Snapshots are plain data. The diff engine only reads `tables` and
/// `relationships`; `name` and `database` are carried for persistence
/// and display but never compared.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Target database dialect, e.g. `postgres`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default)]
    pub tables: Vec<Table>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Look up a table by id
    pub fn table(&self, table_id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    /// Mutable lookup, used by editors applying local changes
    pub fn table_mut(&mut self, table_id: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == table_id)
    }

    /// Total number of entities the diff engine visits for this snapshot
    pub fn entity_count(&self) -> usize {
        self.tables
            .iter()
            .map(|t| 1 + t.fields.len() + t.indexes.len())
            .sum::<usize>()
            + self.relationships.len()
    }
}
