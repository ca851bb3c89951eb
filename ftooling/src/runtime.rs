//! Tool runtime trait and default registry-backed executor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::future::{Either, select};

use crate::{
    NoopToolRuntimeHooks, ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult,
    ToolFuture, ToolRegistry, ToolRuntimeHooks, parse_json_object,
};

pub trait ToolRuntime: Send + Sync {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>>;
}

#[derive(Clone)]
pub struct DefaultToolRuntime {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
    timeout: Option<Duration>,
}

impl Default for DefaultToolRuntime {
    fn default() -> Self {
        Self::new(Arc::new(ToolRegistry::new()))
    }
}

impl DefaultToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
            timeout: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Bounds each invocation. On expiry the call's cancellation token is
    /// cancelled and a timeout error is returned.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    async fn run(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
    ) -> Result<String, ToolError> {
        let tool = self.registry.get(&tool_call.name).ok_or_else(|| {
            ToolError::not_found(format!("tool '{}' is not registered", tool_call.name))
        })?;

        if !tool.authorized(&context.verified_auth_services()) {
            return Err(ToolError::unauthorized(format!(
                "tool '{}' requires one of the authorization services {:?}",
                tool_call.name,
                tool.auth_required()
            )));
        }

        let arguments = parse_json_object(&tool_call.arguments)?;
        let params = tool.parse_params(&arguments, &context.claims)?;
        let invocation = tool.invoke(params, context);

        let Some(timeout) = self.timeout else {
            return invocation.await;
        };
        match select(invocation, Delay::new(timeout)).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                context.cancellation.cancel();
                Err(ToolError::timeout(format!(
                    "tool '{}' did not finish within {}ms",
                    tool_call.name,
                    timeout.as_millis()
                )))
            }
        }
    }
}

impl ToolRuntime for DefaultToolRuntime {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks.on_execution_start(&tool_call, &context);

            match self.run(&tool_call, &context).await {
                Ok(output) => {
                    let result = ToolExecutionResult::from_call(&tool_call, output);
                    self.hooks
                        .on_execution_success(&tool_call, &context, &result, started.elapsed());
                    Ok(result)
                }
                Err(error) => {
                    let error = error
                        .with_tool_name(tool_call.name.clone())
                        .with_tool_call_id(tool_call.id.clone());
                    self.hooks
                        .on_execution_failure(&tool_call, &context, &error, started.elapsed());
                    Err(error)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{Map, Value};

    use super::*;
    use crate::{
        ClaimsMap, InputSchema, Manifest, ParamValues, ParameterDefinition, SchemaManifest, Tool,
        ToolErrorKind, parse_params,
    };

    struct EchoTool {
        name: &'static str,
        parameters: Vec<ParameterDefinition>,
        manifest: Manifest,
        schema: SchemaManifest,
        delay: Option<Duration>,
    }

    impl EchoTool {
        fn new(name: &'static str, auth_required: Vec<String>) -> Self {
            let parameters = vec![ParameterDefinition::integer("id", "Row id")];
            Self {
                name,
                manifest: Manifest {
                    description: "Echoes parameters".to_string(),
                    parameters: parameters.iter().map(ParameterDefinition::manifest).collect(),
                    auth_required,
                },
                schema: SchemaManifest {
                    name: name.to_string(),
                    description: "Echoes parameters".to_string(),
                    input_schema: InputSchema::object(),
                },
                parameters,
                delay: None,
            }
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> &'static str {
            "echo"
        }

        fn manifest(&self) -> &Manifest {
            &self.manifest
        }

        fn schema_manifest(&self) -> &SchemaManifest {
            &self.schema
        }

        fn parse_params(
            &self,
            data: &Map<String, Value>,
            claims: &ClaimsMap,
        ) -> Result<ParamValues, ToolError> {
            parse_params(&self.parameters, data, claims)
        }

        fn invoke<'a>(
            &'a self,
            params: ParamValues,
            context: &'a ToolExecutionContext,
        ) -> ToolFuture<'a, Result<String, ToolError>> {
            Box::pin(async move {
                if let Some(delay) = self.delay {
                    Delay::new(delay).await;
                }
                Ok(format!(
                    "session={} params={}",
                    context.session_id,
                    Value::Array(params.positional())
                ))
            })
        }
    }

    struct BrokenTool(EchoTool);

    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }

        fn kind(&self) -> &'static str {
            "broken"
        }

        fn manifest(&self) -> &Manifest {
            self.0.manifest()
        }

        fn schema_manifest(&self) -> &SchemaManifest {
            self.0.schema_manifest()
        }

        fn parse_params(
            &self,
            _data: &Map<String, Value>,
            _claims: &ClaimsMap,
        ) -> Result<ParamValues, ToolError> {
            Ok(ParamValues::new())
        }

        fn invoke<'a>(
            &'a self,
            _params: ParamValues,
            _context: &'a ToolExecutionContext,
        ) -> ToolFuture<'a, Result<String, ToolError>> {
            Box::pin(async move { Err(ToolError::execution("tool exploded")) })
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl ToolRuntimeHooks for RecordingHooks {
        fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{}", tool_call.name));
        }

        fn on_execution_success(
            &self,
            tool_call: &ToolCall,
            _context: &ToolExecutionContext,
            _result: &ToolExecutionResult,
            _elapsed: Duration,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("success:{}", tool_call.name));
        }

        fn on_execution_failure(
            &self,
            tool_call: &ToolCall,
            _context: &ToolExecutionContext,
            error: &ToolError,
            _elapsed: Duration,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("failure:{}:{:?}", tool_call.name, error.kind));
        }
    }

    fn runtime_with(tools: Vec<Arc<dyn Tool>>) -> DefaultToolRuntime {
        let mut registry = ToolRegistry::new();
        for tool in tools {
            registry.register_shared(tool);
        }
        DefaultToolRuntime::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn runtime_executes_registered_tool() {
        let runtime = runtime_with(vec![Arc::new(EchoTool::new("echo", Vec::new()))]);

        let result = runtime
            .execute(
                ToolCall::new("call_1", "echo", r#"{"id":5}"#),
                ToolExecutionContext::new("session-1"),
            )
            .await
            .expect("execution should succeed");

        assert_eq!(result.tool_call_id, "call_1");
        assert_eq!(result.output, "session=session-1 params=[5]");
    }

    #[tokio::test]
    async fn runtime_returns_not_found_for_unknown_tool() {
        let runtime = DefaultToolRuntime::default();

        let error = runtime
            .execute(
                ToolCall::new("call_2", "missing", "{}"),
                ToolExecutionContext::new("session-2"),
            )
            .await
            .expect_err("execution should fail");

        assert_eq!(error.kind, ToolErrorKind::NotFound);
        assert_eq!(error.tool_call_id.as_deref(), Some("call_2"));
    }

    #[tokio::test]
    async fn runtime_propagates_tool_execution_error() {
        let runtime = runtime_with(vec![Arc::new(BrokenTool(EchoTool::new("echo", Vec::new())))]);

        let error = runtime
            .execute(
                ToolCall::new("call_3", "broken", "{}"),
                ToolExecutionContext::new("session-3"),
            )
            .await
            .expect_err("execution should fail");

        assert_eq!(error.kind, ToolErrorKind::Execution);
        assert_eq!(error.message, "tool exploded");
        assert_eq!(error.tool_name.as_deref(), Some("broken"));
    }

    #[tokio::test]
    async fn runtime_enforces_authorization_requirements() {
        let runtime = runtime_with(vec![Arc::new(EchoTool::new(
            "secure",
            vec!["google".to_string()],
        ))]);

        let error = runtime
            .execute(
                ToolCall::new("call_4", "secure", r#"{"id":1}"#),
                ToolExecutionContext::new("session-4"),
            )
            .await
            .expect_err("unverified call should fail");
        assert_eq!(error.kind, ToolErrorKind::Unauthorized);

        let result = runtime
            .execute(
                ToolCall::new("call_5", "secure", r#"{"id":1}"#),
                ToolExecutionContext::new("session-4").with_verified_auth_service("google"),
            )
            .await
            .expect("verified call should succeed");
        assert_eq!(result.output, "session=session-4 params=[1]");
    }

    #[tokio::test]
    async fn runtime_rejects_invalid_arguments_before_invoking() {
        let runtime = runtime_with(vec![Arc::new(EchoTool::new("echo", Vec::new()))]);

        for arguments in ["not json", r#"{"id":"five"}"#, "{}"] {
            let error = runtime
                .execute(
                    ToolCall::new("call_6", "echo", arguments),
                    ToolExecutionContext::new("session-6"),
                )
                .await
                .expect_err("arguments should be rejected");
            assert_eq!(error.kind, ToolErrorKind::InvalidArguments, "{arguments}");
        }
    }

    #[tokio::test]
    async fn runtime_timeout_cancels_the_call_token() {
        let runtime = runtime_with(vec![Arc::new(
            EchoTool::new("slow", Vec::new()).slow(Duration::from_secs(5)),
        )])
        .with_timeout(Duration::from_millis(20));
        let context = ToolExecutionContext::new("session-7");
        let token = context.cancellation.clone();

        let error = runtime
            .execute(ToolCall::new("call_7", "slow", r#"{"id":1}"#), context)
            .await
            .expect_err("slow tool should time out");

        assert_eq!(error.kind, ToolErrorKind::Timeout);
        assert!(error.is_retryable());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn runtime_reports_lifecycle_to_hooks() {
        let hooks = Arc::new(RecordingHooks::default());
        let runtime = runtime_with(vec![Arc::new(EchoTool::new("echo", Vec::new()))])
            .with_hooks(hooks.clone());

        runtime
            .execute(
                ToolCall::new("call_8", "echo", r#"{"id":2}"#),
                ToolExecutionContext::new("session-8"),
            )
            .await
            .expect("execution should succeed");
        let _ = runtime
            .execute(
                ToolCall::new("call_9", "missing", "{}"),
                ToolExecutionContext::new("session-8"),
            )
            .await;

        let events = hooks.events.lock().expect("events lock").clone();
        assert_eq!(
            events,
            vec![
                "start:echo",
                "success:echo",
                "start:missing",
                "failure:missing:NotFound"
            ]
        );
    }

    #[test]
    fn registry_tracks_registered_tools() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(EchoTool::new("echo", Vec::new()));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("echo"));
        assert_eq!(registry.names(), vec!["echo"]);
        assert_eq!(registry.schema_manifests()[0].name, "echo");

        let removed = registry.remove("echo");
        assert!(removed.is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn authorized_uses_any_of_semantics() {
        let tool = EchoTool::new("echo", vec!["google".to_string(), "github".to_string()]);
        assert!(tool.authorized(&["github".to_string()]));
        assert!(!tool.authorized(&[]));
        assert!(EchoTool::new("open", Vec::new()).authorized(&[]));
    }
}
