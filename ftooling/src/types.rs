//! Tool call, runtime context, and execution result types.

use std::time::{Duration, Instant};

use fcommon::{MetadataMap, SessionId, TraceId};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::ClaimsMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Per-call context: identity, verified authorization claims, and interruption limits.
#[derive(Debug, Clone)]
pub struct ToolExecutionContext {
    pub session_id: SessionId,
    pub trace_id: Option<TraceId>,
    pub metadata: MetadataMap,
    pub claims: ClaimsMap,
    pub cancellation: CancellationToken,
    pub deadline: Option<Instant>,
}

impl ToolExecutionContext {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            trace_id: None,
            metadata: MetadataMap::new(),
            claims: ClaimsMap::new(),
            cancellation: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Records the claims of an authorization service the host already verified.
    pub fn with_claims(mut self, auth_service: impl Into<String>, claims: Map<String, Value>) -> Self {
        self.claims.insert(auth_service.into(), claims);
        self
    }

    pub fn with_verified_auth_service(self, auth_service: impl Into<String>) -> Self {
        self.with_claims(auth_service, Map::new())
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn verified_auth_services(&self) -> Vec<String> {
        let mut services: Vec<String> = self.claims.keys().cloned().collect();
        services.sort();
        services
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionResult {
    pub tool_call_id: String,
    pub output: String,
}

impl ToolExecutionResult {
    pub fn new(tool_call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            output: output.into(),
        }
    }

    pub fn from_call(call: &ToolCall, output: impl Into<String>) -> Self {
        Self::new(call.id.clone(), output)
    }
}
