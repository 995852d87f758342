//! Session configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_ADVANCE_DELAY_MS, DEFAULT_STORAGE_KEY};

/// Errors raised when a session configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("session config JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("storage key must not be empty")]
    EmptyStorageKey,
}

/// Tunables for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Pause between a solved puzzle and the next one, in milliseconds.
    #[serde(default = "SessionConfig::default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    /// Key under which progress is persisted.
    #[serde(default = "SessionConfig::default_storage_key")]
    pub storage_key: String,
}

impl SessionConfig {
    const fn default_advance_delay_ms() -> u64 {
        DEFAULT_ADVANCE_DELAY_MS
    }

    fn default_storage_key() -> String {
        DEFAULT_STORAGE_KEY.to_string()
    }

    /// Parse and validate a configuration from JSON. Missing fields take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns an error if the storage key is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }

    #[must_use]
    pub fn with_advance_delay_ms(mut self, delay: u64) -> Self {
        self.advance_delay_ms = delay;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            advance_delay_ms: Self::default_advance_delay_ms(),
            storage_key: Self::default_storage_key(),
        }
    }
}
