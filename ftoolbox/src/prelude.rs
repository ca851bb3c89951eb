//! Common imports for most ftoolbox applications.

pub use crate::{
    ToolboxBundle, ToolboxConfig, ToolboxError, ToolboxErrorKind, build_toolbox,
    build_toolbox_with, context, default_tool_kinds, session_tool_call, tool_call,
};
pub use crate::{ftb_param, ftb_params};
pub use crate::{
    CancellationToken, DefaultToolRuntime, Manifest, ParamValues, ParameterDefinition,
    ParameterType, ResultRecord, ResultSet, SchemaManifest, SessionId, SqlValue, SqliteSource,
    SqliteSqlConfig, SqliteSqlTool, Tool, ToolCall, ToolError, ToolErrorKind,
    ToolExecutionContext, ToolExecutionResult, ToolKindRegistry, ToolRegistry, ToolRuntime,
};
