//! Turning edited text into a candidate snapshot.

use crate::errors::ParseError;
use crate::model::Snapshot;
use crate::rules::integrity;

/// Converts the live-edited text into a schema snapshot.
pub trait SchemaParser {
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text is malformed or describes an
    /// inconsistent schema.
    fn parse(&self, text: &str) -> Result<Snapshot, ParseError>;
}

impl<P: SchemaParser + ?Sized> SchemaParser for Box<P> {
    fn parse(&self, text: &str) -> Result<Snapshot, ParseError> {
        (**self).parse(text)
    }
}

/// Parses the camelCase JSON form of [`Snapshot`].
///
/// Snapshots that fail the integrity rules are rejected as parse errors so
/// they never reach the diff computer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotParser;

impl SchemaParser for JsonSnapshotParser {
    fn parse(&self, text: &str) -> Result<Snapshot, ParseError> {
        let snapshot: Snapshot = serde_json::from_str(text)
            .map_err(|e| ParseError::new(e.to_string()).at(e.line(), e.column()))?;
        integrity::check_snapshot(&snapshot).map_err(|e| ParseError::new(e.to_string()))?;
        Ok(snapshot)
    }
}
