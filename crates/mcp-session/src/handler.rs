//! Method-name-keyed routing hook (spec.md §4.5): task orchestration beyond
//! dispatch — queues, retries, tool registries — is out of scope here. A
//! `RequestHandler` takes decoded params and a [`HandlerContext`] and returns
//! the JSON-RPC result value; the registry just finds which one a method name
//! belongs to.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mcp_protocol::initialize::{InitializeRequest, InitializeResult, ServerCapabilities};
use mcp_protocol::ping::EmptyResult;
use serde_json::Value;

use crate::error::SessionError;
use crate::handler_context::HandlerContext;

#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, params: Option<Value>, ctx: &HandlerContext) -> Result<Value, SessionError>;
}

/// Registers the always-available built-ins (`initialize`, `ping`) plus
/// whatever application methods are added. Consulted for every decoded
/// request after the strict-mode gate in [`crate::session::Session`].
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn RequestHandler>>,
    server_info: mcp_protocol::initialize::Implementation,
    capabilities: ServerCapabilities,
    instructions: Option<String>,
}

impl HandlerRegistry {
    pub fn new(server_info: mcp_protocol::initialize::Implementation, capabilities: ServerCapabilities) -> Self {
        Self {
            handlers: HashMap::new(),
            server_info,
            capabilities,
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn register(&mut self, method: impl Into<String>, handler: Arc<dyn RequestHandler>) {
        self.handlers.insert(method.into(), handler);
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    pub fn is_registered(&self, method: &str) -> bool {
        matches!(method, "initialize" | "ping" | "logging/setLevel") || self.handlers.contains_key(method)
    }

    pub async fn dispatch(&self, method: &str, params: Option<Value>, ctx: &HandlerContext) -> Result<Value, SessionError> {
        match method {
            "initialize" => self.handle_initialize(params),
            "ping" => Ok(serde_json::to_value(EmptyResult::default()).unwrap_or(Value::Null)),
            "logging/setLevel" => self.handle_set_level(params, ctx).await,
            other => match self.handlers.get(other) {
                Some(handler) => handler.handle(params, ctx).await,
                None => Err(SessionError::MethodNotFound(other.to_string())),
            },
        }
    }

    async fn handle_set_level(&self, params: Option<Value>, ctx: &HandlerContext) -> Result<Value, SessionError> {
        let params = params.ok_or_else(|| SessionError::HandlerExecution {
            method: "logging/setLevel".to_string(),
            message: "missing params".to_string(),
        })?;
        let set_level: mcp_protocol::logging::SetLevelParams =
            serde_json::from_value(params).map_err(|e| SessionError::HandlerExecution {
                method: "logging/setLevel".to_string(),
                message: e.to_string(),
            })?;
        ctx.set_log_level(set_level.level).await;
        Ok(serde_json::to_value(EmptyResult::default()).unwrap_or(Value::Null))
    }

    fn handle_initialize(&self, params: Option<Value>) -> Result<Value, SessionError> {
        let params = params.ok_or_else(|| SessionError::HandlerExecution {
            method: "initialize".to_string(),
            message: "missing params".to_string(),
        })?;
        let request: InitializeRequest = serde_json::from_value(params).map_err(|e| SessionError::HandlerExecution {
            method: "initialize".to_string(),
            message: e.to_string(),
        })?;
        // Negotiation: echo back the client's version if it's one of the four
        // we recognize, otherwise fall back to our latest.
        let negotiated = request
            .protocol_version()
            .map(|v| v.to_string())
            .unwrap_or_else(|_| mcp_protocol::MCP_VERSION.to_string());

        let result = InitializeResult {
            protocol_version: negotiated,
            capabilities: self.capabilities.clone(),
            server_info: self.server_info.clone(),
            instructions: self.instructions.clone(),
        };
        serde_json::to_value(&result).map_err(|e| SessionError::HandlerExecution {
            method: "initialize".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_http_transport::stream_manager::StreamManager;
    use mcp_protocol::initialize::Implementation;

    fn test_registry() -> HandlerRegistry {
        HandlerRegistry::new(
            Implementation::new("test-server", "0.1.0"),
            ServerCapabilities::default(),
        )
    }

    fn test_ctx() -> HandlerContext {
        let streams = Arc::new(StreamManager::new());
        let shared = crate::handler_context::SessionShared::new(None, streams, None, false);
        HandlerContext::new(shared, "s1".into(), None, crate::cancellation::CancellationHandle::new())
    }

    #[tokio::test]
    async fn ping_is_always_registered() {
        let registry = test_registry();
        assert!(registry.is_registered("ping"));
        let ctx = test_ctx();
        let result = registry.dispatch("ping", None, &ctx).await.unwrap();
        assert_eq!(result, serde_json::json!({}));
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let registry = test_registry();
        let ctx = test_ctx();
        let err = registry.dispatch("tools/call", None, &ctx).await.unwrap_err();
        assert!(matches!(err, SessionError::MethodNotFound(_)));
    }

    #[tokio::test]
    async fn set_level_updates_shared_threshold() {
        let registry = test_registry();
        let ctx = test_ctx();
        let params = serde_json::json!({"level": "error"});
        registry.dispatch("logging/setLevel", Some(params), &ctx).await.unwrap();
        ctx.send_log(mcp_protocol::logging::LoggingLevel::Warning, serde_json::json!("quiet"), None).await;
    }

    #[tokio::test]
    async fn initialize_negotiates_known_version() {
        let registry = test_registry();
        let ctx = test_ctx();
        let params = serde_json::json!({
            "protocolVersion": "2025-06-18",
            "capabilities": {},
            "clientInfo": {"name": "test-client", "version": "1.0"},
        });
        let result = registry.dispatch("initialize", Some(params), &ctx).await.unwrap();
        assert_eq!(result["protocolVersion"], "2025-06-18");
    }
}
