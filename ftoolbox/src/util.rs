//! Small convenience constructors for common types.

use serde_json::Value;

use crate::{SessionId, ToolCall, ToolExecutionContext};

pub fn context(session_id: impl Into<SessionId>) -> ToolExecutionContext {
    ToolExecutionContext::new(session_id)
}

/// Builds a call whose arguments are the JSON text of `arguments`.
pub fn tool_call(id: impl Into<String>, name: impl Into<String>, arguments: &Value) -> ToolCall {
    ToolCall::new(id, name, arguments.to_string())
}

/// Builds a call with the session-scoped id `{session}-{name}`.
pub fn session_tool_call(
    context: &ToolExecutionContext,
    name: &str,
    arguments: &Value,
) -> ToolCall {
    tool_call(format!("{}-{name}", context.session_id), name, arguments)
}
