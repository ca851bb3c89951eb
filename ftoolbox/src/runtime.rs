//! Composition root: turns a [`ToolboxConfig`] into live sources, tools, and
//! a runtime.

use std::sync::Arc;

use fobserve::{FanoutToolHooks, MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks};
use fsource::{SourceRegistry, create_source};
use ftooling::{DefaultToolRuntime, SchemaManifest, Tool, ToolKindRegistry, ToolRegistry};

use crate::{ToolboxConfig, ToolboxError};

#[derive(Clone)]
pub struct ToolboxBundle {
    pub sources: Arc<SourceRegistry>,
    pub tools: Arc<ToolRegistry>,
    pub runtime: DefaultToolRuntime,
}

impl ToolboxBundle {
    pub fn tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn schema_manifests(&self) -> Vec<SchemaManifest> {
        self.tools.schema_manifests()
    }
}

/// Tool kinds built into the toolbox.
pub fn default_tool_kinds() -> Result<ToolKindRegistry, ToolboxError> {
    let mut kinds = ToolKindRegistry::new();
    fsqltool::register(&mut kinds)?;
    Ok(kinds)
}

/// Hooks installed when runtime observability is enabled.
pub fn observability_hooks() -> FanoutToolHooks {
    FanoutToolHooks::new()
        .with(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)))
        .with(Arc::new(SafeToolHooks::new(MetricsObservabilityHooks)))
}

pub fn build_toolbox(config: &ToolboxConfig) -> Result<ToolboxBundle, ToolboxError> {
    build_toolbox_with(config, &default_tool_kinds()?)
}

/// Opens every source, then decodes and initializes every tool. The first
/// failure aborts the whole build.
pub fn build_toolbox_with(
    config: &ToolboxConfig,
    kinds: &ToolKindRegistry,
) -> Result<ToolboxBundle, ToolboxError> {
    let mut sources = SourceRegistry::new();
    for (name, source_config) in &config.sources {
        let source = create_source(name, source_config)?;
        sources.register_shared(source);
    }

    let mut tools = ToolRegistry::new();
    for (name, raw) in &config.tools {
        let tool_config = kinds.decode(name, raw)?;
        let tool = tool_config.initialize(&sources)?;
        tools.register_shared(tool);
    }

    tracing::info!(
        phase = "toolbox",
        event = "built",
        source_count = sources.len(),
        tool_count = tools.len()
    );

    let tools = Arc::new(tools);
    let mut runtime = DefaultToolRuntime::new(Arc::clone(&tools));
    if config.runtime.observability {
        runtime = runtime.with_hooks(Arc::new(observability_hooks()));
    }
    if let Some(timeout) = config.runtime.timeout() {
        runtime = runtime.with_timeout(timeout);
    }

    Ok(ToolboxBundle {
        sources: Arc::new(sources),
        tools,
        runtime,
    })
}
