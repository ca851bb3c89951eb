//! Toolbox configuration: named sources, named tools, and runtime settings.
//!
//! ```rust
//! use ftoolbox::ToolboxConfig;
//!
//! let config = ToolboxConfig::from_json_str(r#"{
//!     "sources": { "app-db": { "kind": "sqlite", "memory": true } },
//!     "tools": {
//!         "ping": {
//!             "kind": "sqlite-sql",
//!             "source": "app-db",
//!             "description": "Checks the connection",
//!             "statement": "SELECT 1 AS ok"
//!         }
//!     },
//!     "runtime": { "timeoutMs": 2000 }
//! }"#)
//! .expect("config should parse");
//!
//! assert_eq!(config.source_names(), vec!["app-db"]);
//! assert_eq!(config.tool_names(), vec!["ping"]);
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use fsource::SourceConfig;
use serde::Deserialize;
use serde_json::Value;

use crate::ToolboxError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolboxConfig {
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
    /// Raw tool configurations. Each is decoded by the factory registered for its `kind`.
    #[serde(default)]
    pub tools: BTreeMap<String, Value>,
    #[serde(default)]
    pub runtime: RuntimeSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSettings {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default = "default_observability")]
    pub observability: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            observability: default_observability(),
        }
    }
}

impl RuntimeSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn default_observability() -> bool {
    true
}

impl ToolboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ToolboxError> {
        serde_json::from_str(raw)
            .map_err(|error| ToolboxError::invalid_config(format!("invalid toolbox config: {error}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ToolboxError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|error| {
            ToolboxError::io(format!("failed to read {}: {error}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn with_source(mut self, name: impl Into<String>, source: SourceConfig) -> Self {
        self.sources.insert(name.into(), source);
        self
    }

    pub fn with_tool(mut self, name: impl Into<String>, tool: Value) -> Self {
        self.tools.insert(name.into(), tool);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.runtime.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }
}
