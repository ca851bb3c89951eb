//! The configured `sqlite-sql` tool.

use std::sync::Arc;

use fsource::SqlHandle;
use ftooling::{
    ClaimsMap, Manifest, ParamValues, ParameterDefinition, SchemaManifest, Tool, ToolError,
    ToolExecutionContext, ToolFuture, parse_params, process_parameters,
};
use serde_json::{Map, Value};

use crate::{KIND, ResultSet, SqlToolError, SqliteSqlConfig, prepare_query, run_query};

/// Immutable descriptor built once from configuration and shared by every
/// invocation.
pub struct SqliteSqlTool {
    name: String,
    source: String,
    statement: String,
    parameters: Vec<ParameterDefinition>,
    template_parameters: Vec<ParameterDefinition>,
    all_parameters: Vec<ParameterDefinition>,
    handle: Arc<dyn SqlHandle>,
    manifest: Manifest,
    schema_manifest: SchemaManifest,
}

impl SqliteSqlTool {
    pub fn new(config: &SqliteSqlConfig, handle: Arc<dyn SqlHandle>) -> Result<Self, ToolError> {
        let processed = process_parameters(&config.template_parameters, &config.parameters)?;

        let manifest = Manifest {
            description: config.description.clone(),
            parameters: processed.manifest,
            auth_required: config.auth_required.clone(),
        };
        let schema_manifest = SchemaManifest {
            name: config.name.clone(),
            description: config.description.clone(),
            input_schema: processed.input_schema,
        };

        Ok(Self {
            name: config.name.clone(),
            source: config.source.clone(),
            statement: config.statement.clone(),
            parameters: config.parameters.clone(),
            template_parameters: config.template_parameters.clone(),
            all_parameters: processed.all,
            handle,
            manifest,
            schema_manifest,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn parameters(&self) -> &[ParameterDefinition] {
        &self.parameters
    }

    pub fn template_parameters(&self) -> &[ParameterDefinition] {
        &self.template_parameters
    }

    /// Runs the statement with already-parsed values and returns the typed rows.
    pub async fn query(
        &self,
        values: &ParamValues,
        context: &ToolExecutionContext,
    ) -> Result<ResultSet, SqlToolError> {
        let outcome = self.query_inner(values, context).await;
        if let Err(error) = &outcome {
            tracing::warn!(
                phase = "sql",
                event = "invocation_failure",
                tool_name = self.name,
                source_name = self.source,
                error_kind = ?error.kind,
                error = %error
            );
        }
        outcome
    }

    async fn query_inner(
        &self,
        values: &ParamValues,
        context: &ToolExecutionContext,
    ) -> Result<ResultSet, SqlToolError> {
        let prepared = prepare_query(
            &self.statement,
            &self.template_parameters,
            &self.parameters,
            values,
        )?;
        tracing::debug!(
            phase = "sql",
            event = "statement_resolved",
            tool_name = self.name,
            statement = prepared.statement,
            arg_count = prepared.args.len()
        );

        let records = run_query(
            Arc::clone(&self.handle),
            prepared,
            &context.cancellation,
            context.deadline,
        )
        .await?;
        tracing::debug!(
            phase = "sql",
            event = "rows_collected",
            tool_name = self.name,
            row_count = records.len()
        );
        Ok(records)
    }
}

impl Tool for SqliteSqlTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        KIND
    }

    fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn schema_manifest(&self) -> &SchemaManifest {
        &self.schema_manifest
    }

    fn parse_params(
        &self,
        data: &Map<String, Value>,
        claims: &ClaimsMap,
    ) -> Result<ParamValues, ToolError> {
        parse_params(&self.all_parameters, data, claims)
    }

    fn invoke<'a>(
        &'a self,
        params: ParamValues,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        Box::pin(async move {
            let records = self.query(&params, context).await?;
            records.to_json_string().map_err(|error| {
                ToolError::execution(format!("failed to encode result set: {error}"))
            })
        })
    }
}
