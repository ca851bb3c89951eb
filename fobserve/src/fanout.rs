//! Broadcasts runtime events to several hook implementations in order.

use std::sync::Arc;
use std::time::Duration;

use ftooling::{ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Clone, Default)]
pub struct FanoutToolHooks {
    hooks: Vec<Arc<dyn ToolRuntimeHooks>>,
}

impl FanoutToolHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn push(&mut self, hooks: Arc<dyn ToolRuntimeHooks>) {
        self.hooks.push(hooks);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl ToolRuntimeHooks for FanoutToolHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        for hooks in &self.hooks {
            hooks.on_execution_start(tool_call, context);
        }
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_execution_success(tool_call, context, result, elapsed);
        }
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_execution_failure(tool_call, context, error, elapsed);
        }
    }
}
