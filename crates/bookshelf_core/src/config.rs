//! Catalog runtime configuration.
//!
//! # Responsibility
//! - Describe where the catalog database lives and how core logs.
//! - Load settings from the environment for the CLI probe.
//!
//! # Invariants
//! - `db_path = None` means an in-memory catalog.
//! - `log_dir`, when set, must be absolute (enforced by `validate`).

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::default_log_level;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "BOOKSHELF_DB";
pub const ENV_LOG_LEVEL: &str = "BOOKSHELF_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BOOKSHELF_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "db_path cannot be empty"),
            Self::RelativeLogDir(dir) => {
                write!(f, "log_dir must be an absolute path, got `{}`", dir.display())
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite file; `None` keeps the catalog in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// File logging is skipped when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Reads `BOOKSHELF_DB`, `BOOKSHELF_LOG_LEVEL` and `BOOKSHELF_LOG_DIR`,
    /// falling back to defaults for unset or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            db_path: non_empty(ENV_DB_PATH).map(PathBuf::from),
            log_level: non_empty(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: non_empty(ENV_LOG_DIR).map(PathBuf::from),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .db_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::EmptyDbPath);
        }
        if let Some(dir) = self.log_dir.as_ref().filter(|dir| !dir.is_absolute()) {
            return Err(ConfigError::RelativeLogDir(dir.clone()));
        }
        Ok(())
    }

    /// Opens the configured catalog with its schema in place.
    pub fn open_catalog(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogConfig, ConfigError, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn env_lookup_fills_fields_and_skips_blank_values() {
        let config = CatalogConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/var/lib/bookshelf/catalog.db"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "  "),
        ]));
        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/var/lib/bookshelf/catalog.db"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: CatalogConfig =
            serde_json::from_str(r#"{"db_path":"catalog.db"}"#).unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("catalog.db")));
        assert_eq!(config.log_level, CatalogConfig::default().log_level);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_relative_log_dir() {
        let config = CatalogConfig {
            log_dir: Some(PathBuf::from("logs")),
            ..CatalogConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::RelativeLogDir(PathBuf::from("logs")))
        );
    }

    #[test]
    fn default_config_opens_in_memory_catalog() {
        let conn = CatalogConfig::default().open_catalog().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 'tb_%';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}
