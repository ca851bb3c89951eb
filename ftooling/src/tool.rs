//! Tool and tool-configuration contracts.
//!
//! A [`ToolConfig`] is the decoded configuration of one tool. Initializing it
//! against a [`SourceRegistry`] produces an immutable [`Tool`] that the
//! runtime invokes repeatedly.

use std::sync::Arc;

use fcommon::BoxFuture;
use fsource::SourceRegistry;
use serde_json::{Map, Value};

use crate::{
    ClaimsMap, Manifest, ParamValues, SchemaManifest, ToolError, ToolExecutionContext,
    is_authorized,
};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> &'static str;

    fn manifest(&self) -> &Manifest;

    fn schema_manifest(&self) -> &SchemaManifest;

    fn auth_required(&self) -> &[String] {
        &self.manifest().auth_required
    }

    fn authorized(&self, verified_auth_services: &[String]) -> bool {
        is_authorized(self.auth_required(), verified_auth_services)
    }

    fn parse_params(
        &self,
        data: &Map<String, Value>,
        claims: &ClaimsMap,
    ) -> Result<ParamValues, ToolError>;

    fn invoke<'a>(
        &'a self,
        params: ParamValues,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>>;
}

pub trait ToolConfig: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> &'static str;

    fn initialize(&self, sources: &SourceRegistry) -> Result<Arc<dyn Tool>, ToolError>;
}

/// Decodes the raw configuration of one tool kind.
pub type ToolConfigFactory = fn(&str, &Value) -> Result<Box<dyn ToolConfig>, ToolError>;
