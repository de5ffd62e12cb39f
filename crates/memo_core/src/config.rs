//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve database, logging and summary endpoint settings.
//! - Layer: built-in defaults, then optional TOML file, then environment.
//!
//! # Invariants
//! - Keys missing from a config file keep their default values.
//! - Environment overrides win over file values.

use crate::logging::default_log_level;
use crate::model::locale::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SUMMARY_ENDPOINT: &str = "http://localhost:3000/api/summary";
const APP_DIR_NAME: &str = "memo";
const DB_FILE_NAME: &str = "memos.sqlite3";

pub const ENV_DB_PATH: &str = "MEMO_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "MEMO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MEMO_LOG_DIR";
pub const ENV_SUMMARY_URL: &str = "MEMO_SUMMARY_URL";
pub const ENV_LOCALE: &str = "MEMO_LOCALE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    InvalidLocale(String),
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// Summary endpoint accepting `{"content": ...}`.
    pub summary_endpoint: String,
    pub locale: Locale,
}

impl Default for MemoConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR_NAME);
        Self {
            database_path: data_dir.join(DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: data_dir.join("logs"),
            summary_endpoint: DEFAULT_SUMMARY_ENDPOINT.to_string(),
            locale: Locale::default(),
        }
    }
}

impl MemoConfig {
    /// Parses a TOML document; missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Applies `MEMO_*` environment overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup(ENV_DB_PATH) {
            self.database_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        if let Some(value) = lookup(ENV_LOG_DIR) {
            self.log_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_SUMMARY_URL) {
            self.summary_endpoint = value;
        }
        if let Some(value) = lookup(ENV_LOCALE) {
            self.locale = value.parse().map_err(ConfigError::InvalidLocale)?;
        }
        Ok(())
    }
}
