//! Capability layer for declaring, registering, and executing tools.
//!
//! Tools declare typed parameters, publish manifests describing them, and are
//! invoked through a [`ToolRuntime`] that handles lookup, authorization, and
//! argument parsing before the tool runs.

mod args;
mod auth;
mod error;
mod hooks;
mod manifest;
mod parameters;
mod registry;
mod runtime;
mod template;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        ClaimsMap, DefaultToolRuntime, Manifest, ParamValues, ParameterDefinition, ParameterType,
        SchemaManifest, Tool, ToolCall, ToolConfig, ToolError, ToolErrorKind,
        ToolExecutionContext, ToolExecutionResult, ToolFuture, ToolKindRegistry, ToolRegistry,
        ToolRuntime, ToolRuntimeHooks,
    };
}

pub use args::{parse_json_object, parse_json_value};
pub use auth::{ClaimsMap, is_authorized};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use manifest::{InputSchema, Manifest, ParameterManifest, PropertySchema, SchemaManifest};
pub use parameters::{
    ParamAuthService, ParamValue, ParamValues, ParameterDefinition, ParameterType,
    ProcessedParameters, get_params, parse_params, process_parameters, validate_definitions,
};
pub use registry::{ToolKindRegistry, ToolRegistry};
pub use runtime::{DefaultToolRuntime, ToolRuntime};
pub use template::{quote_identifier, resolve_template_params};
pub use tool::{Tool, ToolConfig, ToolConfigFactory, ToolFuture};
pub use types::{ToolCall, ToolExecutionContext, ToolExecutionResult};
