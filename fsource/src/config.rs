//! Source configuration values and the config-driven source factory.
//!
//! ```rust
//! use fsource::{SourceConfig, create_source};
//! use serde_json::json;
//!
//! let config: SourceConfig =
//!     serde_json::from_value(json!({ "kind": "sqlite", "memory": true })).expect("config");
//! let source = create_source("scratch", &config).expect("source should open");
//! assert_eq!(source.kind(), "sqlite");
//! assert!(source.as_sql_source().is_some());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::SourceError;
use crate::sqlite::SqliteSource;
use crate::source::Source;

const DEFAULT_MAX_IDLE_CONNECTIONS: usize = 4;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceConfig {
    Sqlite(SqliteSourceConfig),
}

impl SourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Sqlite(_) => crate::SQLITE_SOURCE_KIND,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Sqlite(SqliteSourceConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqliteSourceConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub memory: bool,
    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for SqliteSourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            memory: false,
            max_idle_connections: DEFAULT_MAX_IDLE_CONNECTIONS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl SqliteSourceConfig {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            memory: true,
            ..Self::default()
        }
    }

    pub fn with_max_idle_connections(mut self, max_idle_connections: usize) -> Self {
        self.max_idle_connections = max_idle_connections;
        self
    }

    pub fn with_busy_timeout_ms(mut self, busy_timeout_ms: u64) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    pub fn validate(&self) -> Result<(), SourceError> {
        if self.memory && self.path.is_some() {
            return Err(SourceError::invalid_config(
                "sqlite source cannot set both 'path' and 'memory'",
            ));
        }
        if self.max_idle_connections == 0 {
            return Err(SourceError::invalid_config(
                "sqlite source 'maxIdleConnections' must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_max_idle_connections() -> usize {
    DEFAULT_MAX_IDLE_CONNECTIONS
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

pub fn create_source(name: &str, config: &SourceConfig) -> Result<Arc<dyn Source>, SourceError> {
    match config {
        SourceConfig::Sqlite(config) => Ok(Arc::new(SqliteSource::new(name, config.clone())?)),
    }
}

pub(crate) fn default_sqlite_path() -> PathBuf {
    if let Some(explicit) = std::env::var_os("FTOOLBOX_SQLITE_PATH") {
        return PathBuf::from(explicit);
    }

    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        return PathBuf::from(home)
            .join(".ftoolbox")
            .join("ftoolbox.sqlite3");
    }

    PathBuf::from("ftoolbox.sqlite3")
}
