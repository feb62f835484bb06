//! TOML configuration for the engine, runtime, and storage.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    engine::{
        differential::DifferentialRounding,
        index::{INDEX_BEST_OF, INDEX_WINDOW},
    },
    persist::{PersistResult, sqlite::SqliteRepository},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {message}")]
    Invalid { message: String },
}

/// Calculation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rounding rule for differentials.
    pub rounding: DifferentialRounding,
    /// Most recent rounds considered for the index.
    pub window: usize,
    /// Lowest differentials averaged into the index.
    pub best_of: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rounding: DifferentialRounding::default(),
            window: INDEX_WINDOW,
            best_of: INDEX_BEST_OF,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.best_of == 0 {
            return Err(ConfigError::Invalid {
                message: "engine.best_of must be at least 1".to_string(),
            });
        }
        if self.window < self.best_of {
            return Err(ConfigError::Invalid {
                message: format!(
                    "engine.window ({}) must not be smaller than engine.best_of ({})",
                    self.window, self.best_of
                ),
            });
        }
        Ok(())
    }
}

/// Single-writer runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub command_queue_bound: usize,
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Where records live.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file; an in-memory SQLite database when absent.
    pub sqlite_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Opens the repository this section describes.
    pub fn open(&self) -> PersistResult<SqliteRepository> {
        match &self.sqlite_path {
            Some(path) => SqliteRepository::open(path),
            None => SqliteRepository::open_in_memory(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HandicapConfig {
    pub engine: EngineConfig,
    pub runtime: RuntimeConfig,
    pub storage: StorageConfig,
}

impl HandicapConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the TOML file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
