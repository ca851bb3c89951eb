//! Decoded configuration of a `sqlite-sql` tool.
//!
//! ```rust
//! use fsqltool::SqliteSqlConfig;
//! use serde_json::json;
//!
//! let config = SqliteSqlConfig::from_value(
//!     "lookup_user",
//!     &json!({
//!         "kind": "sqlite-sql",
//!         "source": "app-db",
//!         "description": "Looks up a user by id",
//!         "statement": "SELECT id, name FROM users WHERE id = ?",
//!         "parameters": [{ "name": "id", "type": "integer", "description": "User id" }]
//!     }),
//! )
//! .expect("config should decode");
//!
//! assert_eq!(config.name, "lookup_user");
//! assert_eq!(config.parameters.len(), 1);
//! ```

use std::sync::Arc;

use fsource::SourceRegistry;
use ftooling::{ParameterDefinition, Tool, ToolConfig, ToolError};
use serde::Deserialize;
use serde_json::Value;

use crate::{KIND, SqliteSqlTool, bind_source};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqliteSqlConfig {
    /// Taken from the key the tool is configured under.
    #[serde(skip)]
    pub name: String,
    pub kind: String,
    pub source: String,
    pub description: String,
    pub statement: String,
    #[serde(default)]
    pub auth_required: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    #[serde(default)]
    pub template_parameters: Vec<ParameterDefinition>,
}

impl SqliteSqlConfig {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        description: impl Into<String>,
        statement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: KIND.to_string(),
            source: source.into(),
            description: description.into(),
            statement: statement.into(),
            auth_required: Vec::new(),
            parameters: Vec::new(),
            template_parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_template_parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.template_parameters.push(parameter);
        self
    }

    pub fn with_auth_required(mut self, auth_service: impl Into<String>) -> Self {
        self.auth_required.push(auth_service.into());
        self
    }

    /// Decodes and validates the configuration stored under `name`.
    pub fn from_value(name: &str, raw: &Value) -> Result<Self, ToolError> {
        let mut config = Self::deserialize(raw).map_err(|error| {
            ToolError::configuration(format!("invalid configuration for tool {name:?}: {error}"))
        })?;
        config.name = name.to_string();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        if self.kind != KIND {
            return Err(ToolError::configuration(format!(
                "tool {:?} has kind {:?}, expected {KIND:?}",
                self.name, self.kind
            )));
        }
        let mandatory = [
            ("name", &self.name),
            ("source", &self.source),
            ("description", &self.description),
            ("statement", &self.statement),
        ];
        for (field, value) in mandatory {
            if value.trim().is_empty() {
                return Err(ToolError::configuration(format!(
                    "tool {:?} is missing required field '{field}'",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

impl ToolConfig for SqliteSqlConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        KIND
    }

    fn initialize(&self, sources: &SourceRegistry) -> Result<Arc<dyn Tool>, ToolError> {
        self.validate()?;
        let handle = bind_source(&self.name, &self.source, sources)?;
        let tool = SqliteSqlTool::new(self, handle)?;
        Ok(Arc::new(tool))
    }
}

/// Factory registered under [`KIND`] in a tool-kind registry.
pub fn new_config(name: &str, raw: &Value) -> Result<Box<dyn ToolConfig>, ToolError> {
    Ok(Box::new(SqliteSqlConfig::from_value(name, raw)?))
}
