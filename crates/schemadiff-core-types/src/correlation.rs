//! Correlation ids for live-edit cycles
//!
//! An edit cycle runs from the first edit of a document until the user
//! accepts or undoes the result; each cycle gets a fresh [`CycleId`]. The id
//! is attached to log events and to errors raised during that cycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for one edit cycle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(String);

impl CycleId {
    /// Generate a new CycleId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an existing id, e.g. one read back from a log line
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
