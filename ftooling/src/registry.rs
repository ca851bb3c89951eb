//! Registries for initialized tools and for tool-kind config factories.

use std::sync::Arc;

use fcommon::Registry;
use serde_json::Value;

use crate::{SchemaManifest, Tool, ToolConfig, ToolConfigFactory, ToolError};

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.register_shared(Arc::new(tool));
    }

    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Schema manifests of every tool, sorted by tool name.
    pub fn schema_manifests(&self) -> Vec<SchemaManifest> {
        self.names()
            .iter()
            .filter_map(|name| self.tools.get(name.as_str()))
            .map(|tool| tool.schema_manifest().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Maps a tool `kind` string to the factory that decodes its configuration.
#[derive(Default)]
pub struct ToolKindRegistry {
    factories: Registry<String, ToolConfigFactory>,
}

impl ToolKindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: impl Into<String>,
        factory: ToolConfigFactory,
    ) -> Result<(), ToolError> {
        let kind = kind.into();
        if self.factories.contains_key(&kind) {
            return Err(ToolError::configuration(format!(
                "tool kind '{kind}' is already registered"
            )));
        }
        self.factories.insert(kind, factory);
        Ok(())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.factories.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Reads the `kind` field of `raw` and hands the value to that kind's factory.
    pub fn decode(&self, name: &str, raw: &Value) -> Result<Box<dyn ToolConfig>, ToolError> {
        let kind = raw
            .get("kind")
            .and_then(Value::as_str)
            .filter(|kind| !kind.trim().is_empty())
            .ok_or_else(|| {
                ToolError::configuration(format!("tool '{name}' is missing a 'kind'"))
            })?;
        let factory = self.factories.get(kind).ok_or_else(|| {
            ToolError::configuration(format!("tool '{name}' has unknown kind '{kind}'"))
        })?;
        factory(name, raw)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
