use schemadiff_core_types::CycleId;
use thiserror::Error;

/// Result type alias using SchemaDiffError
pub type Result<T> = std::result::Result<T, SchemaDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    /// A snapshot references ids that do not exist or repeats an id
    IntegrityViolation,

    // Live edit
    /// The edited text could not be turned into a snapshot
    ParseFailed,
    /// Accept was requested but no candidate snapshot is pending
    NoPendingCandidate,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::IntegrityViolation => "ERR_INTEGRITY_VIOLATION",
            ExErrorKind::ParseFailed => "ERR_PARSE_FAILED",
            ExErrorKind::NoPendingCandidate => "ERR_NO_PENDING_CANDIDATE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus context
/// (operation, entity, edit cycle) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    cycle_id: Option<CycleId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            cycle_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (table, field, or snapshot id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add edit cycle context
    pub fn with_cycle_id(mut self, cycle_id: CycleId) -> Self {
        self.cycle_id = Some(cycle_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn cycle_id(&self) -> Option<&CycleId> {
        self.cycle_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(cycle_id) = &self.cycle_id {
            write!(f, " (cycle_id: {})", cycle_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for schemadiff operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaDiffError {
    /// Parser rejected the edited text
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// A snapshot failed its referential integrity rules
    #[error("Snapshot integrity violated: {}", .problems.join("; "))]
    IntegrityViolation { problems: Vec<String> },

    /// Accept was called before any candidate was calculated
    #[error("No pending candidate snapshot to accept")]
    NoPendingCandidate,

    /// The persistence collaborator failed to commit a snapshot
    #[error("Commit failed: {message}")]
    CommitFailed { message: String },

    #[error("Snapshot not found: {snapshot_id}")]
    SnapshotNotFound { snapshot_id: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Structured parse failure reported by a [`crate::parser::SchemaParser`]
///
/// `line` and `column` are 1-based when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        match (self.line, self.column) {
            (Some(l), Some(c)) => write!(f, " at line {}, column {}", l, c),
            (Some(l), None) => write!(f, " at line {}", l),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<SchemaDiffError> for ExError {
    fn from(err: SchemaDiffError) -> Self {
        match err {
            SchemaDiffError::Parse(parse) => ExError::new(ExErrorKind::ParseFailed)
                .with_op("parse")
                .with_message(parse.to_string()),

            SchemaDiffError::IntegrityViolation { problems } => {
                ExError::new(ExErrorKind::IntegrityViolation).with_message(problems.join("; "))
            }

            SchemaDiffError::NoPendingCandidate => ExError::new(ExErrorKind::NoPendingCandidate)
                .with_op("accept")
                .with_message("No pending candidate snapshot to accept"),

            SchemaDiffError::CommitFailed { message } => ExError::new(ExErrorKind::Persistence)
                .with_op("commit")
                .with_message(message),

            SchemaDiffError::SnapshotNotFound { snapshot_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(snapshot_id)
                    .with_message("Snapshot not found")
            }

            SchemaDiffError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::Config).with_message(reason)
            }

            SchemaDiffError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Persistence collaborators report `ExError`s; the reconciler sees them as commit failures
impl From<ExError> for SchemaDiffError {
    fn from(err: ExError) -> Self {
        SchemaDiffError::CommitFailed {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SchemaDiffError {
    fn from(err: serde_json::Error) -> Self {
        SchemaDiffError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::ParseFailed, "ERR_PARSE_FAILED"),
            (ExErrorKind::NoPendingCandidate, "ERR_NO_PENDING_CANDIDATE"),
            (ExErrorKind::IntegrityViolation, "ERR_INTEGRITY_VIOLATION"),
            (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_parse_error_display_includes_location() {
        let err = ParseError::new("unexpected token").at(3, 7);
        assert_eq!(err.to_string(), "unexpected token at line 3, column 7");
        assert_eq!(ParseError::new("eof").to_string(), "eof");
    }

    #[test]
    fn test_no_pending_candidate_maps_to_kind() {
        let ex: ExError = SchemaDiffError::NoPendingCandidate.into();
        assert_eq!(ex.kind(), ExErrorKind::NoPendingCandidate);
        assert_eq!(ex.op(), Some("accept"));
    }

    #[test]
    fn test_ex_error_display_format() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("load_head")
            .with_message("no snapshots")
            .with_entity_id("s1");
        assert_eq!(
            err.to_string(),
            "[ERR_NOT_FOUND] in operation 'load_head': no snapshots (entity_id: s1)"
        );
    }

    #[test]
    fn test_commit_failure_round_trips_through_ex_error() {
        let store_err = ExError::new(ExErrorKind::Persistence).with_message("disk full");
        let err: SchemaDiffError = store_err.into();
        assert!(matches!(err, SchemaDiffError::CommitFailed { ref message } if message.contains("disk full")));
    }
}
