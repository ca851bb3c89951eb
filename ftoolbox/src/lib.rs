//! Unified facade over the ftoolbox workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the workspace crates, loads toolbox configuration, and wires
//! configured sources and tools into a ready-to-use runtime.
//!
//! ```rust
//! use ftoolbox::prelude::*;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "multi_thread")]
//! # async fn main() {
//! let config = ToolboxConfig::from_json_str(r#"{
//!     "sources": { "app-db": { "kind": "sqlite", "memory": true } },
//!     "tools": {
//!         "answer": {
//!             "kind": "sqlite-sql",
//!             "source": "app-db",
//!             "description": "Returns a constant",
//!             "statement": "SELECT ? AS answer",
//!             "parameters": [{ "name": "value", "type": "integer", "description": "Value" }]
//!         }
//!     }
//! }"#)
//! .expect("config should parse");
//!
//! let toolbox = build_toolbox(&config).expect("toolbox should build");
//! let result = toolbox
//!     .runtime
//!     .execute(tool_call("call-1", "answer", &json!({ "value": 42 })), context("session-1"))
//!     .await
//!     .expect("call should succeed");
//! assert_eq!(result.output, r#"[{"answer":42}]"#);
//! # }
//! ```

mod config;
mod error;
mod macros;

pub mod prelude;
pub mod runtime;
pub mod util;

pub use fcommon;
pub use fobserve;
pub use fsource;
pub use fsqltool;
pub use ftooling;

pub use fcommon::{BoxFuture, MetadataMap, SessionId, TraceId};
pub use tokio_util::sync::CancellationToken;
pub use fobserve::{
    FanoutToolHooks, MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks,
};
pub use fsource::{
    QueryError, QueryStage, Source, SourceConfig, SourceError, SourceErrorKind, SourceRegistry,
    SqlHandle, SqlSource, SqlValue, SqliteSource, SqliteSourceConfig, create_source,
};
pub use fsqltool::{
    ResultRecord, ResultSet, SqlToolError, SqlToolErrorKind, SqliteSqlConfig, SqliteSqlTool,
};
pub use ftooling::{
    ClaimsMap, DefaultToolRuntime, InputSchema, Manifest, NoopToolRuntimeHooks,
    ParamAuthService, ParamValues, ParameterDefinition, ParameterManifest, ParameterType,
    SchemaManifest, Tool, ToolCall, ToolConfig, ToolError, ToolErrorKind, ToolExecutionContext,
    ToolExecutionResult, ToolFuture, ToolKindRegistry, ToolRegistry, ToolRuntime,
    ToolRuntimeHooks, is_authorized, parse_json_object, parse_json_value,
};

pub use config::{RuntimeSettings, ToolboxConfig};
pub use error::{ToolboxError, ToolboxErrorKind};
pub use runtime::{
    ToolboxBundle, build_toolbox, build_toolbox_with, default_tool_kinds, observability_hooks,
};
pub use util::{context, session_tool_call, tool_call};

#[cfg(test)]
mod tests {
    use crate::ParameterType;

    #[test]
    fn ftb_param_macro_creates_expected_definition() {
        let param = crate::ftb_param!(string "table" => "Table name");
        assert_eq!(param.kind, ParameterType::String);
        assert_eq!(param.name, "table");
        assert_eq!(param.description, "Table name");
    }

    #[test]
    fn ftb_params_macro_builds_definition_vector() {
        let params = crate::ftb_params![
            integer "id" => "Row id",
            boolean "active" => "Only active rows",
        ];

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].kind, ParameterType::Integer);
        assert_eq!(params[1].kind, ParameterType::Boolean);
    }

    #[test]
    fn ftb_param_macro_supports_array_items() {
        let param = crate::ftb_param!(array "tags" of string => "Tags");
        assert_eq!(param.kind, ParameterType::Array);
        assert_eq!(
            param.items.as_ref().map(|items| items.kind),
            Some(ParameterType::String)
        );
    }
}
