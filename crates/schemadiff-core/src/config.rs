//! Engine configuration loaded from YAML.
//!
//! ```yaml
//! debounce_ms: 750
//! commit_mode: incremental
//! log_profile: production
//! ```
//!
//! Every key is optional.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::errors::{Result, SchemaDiffError};
use crate::logging_facility::Profile;
use crate::reconcile::CommitMode;

pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Quiescence window between the last edit and the next recalculation
    pub debounce_ms: u64,
    /// Commit mode used on accept
    pub commit_mode: CommitMode,
    pub log_profile: Profile,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            commit_mode: CommitMode::ForceFull,
            log_profile: Profile::Development,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDiffError::InvalidConfig`] on malformed YAML, unknown
    /// keys or a zero debounce window.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // An empty document deserializes to null rather than an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: EngineConfig =
            serde_yaml::from_str(text).map_err(|e| SchemaDiffError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML config file
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDiffError::InvalidConfig`] if the file cannot be read
    /// or does not validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SchemaDiffError::InvalidConfig {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&text)
    }

    /// # Errors
    ///
    /// Returns [`SchemaDiffError::InvalidConfig`] if `debounce_ms` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms == 0 {
            return Err(SchemaDiffError::InvalidConfig {
                reason: "debounce_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
