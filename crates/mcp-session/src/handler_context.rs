//! `HandlerContext` (spec.md §4.5): the surface a request handler is given at
//! invocation time. Everything it exposes reaches back through the captured
//! transport connection ([`mcp_http_transport::StreamManager`]) rather than
//! any ambient "current session" global, so a handler spawned on its own task
//! keeps working even if the session that dispatched it is replaced or torn
//! down mid-flight.

use std::collections::HashMap;
use std::sync::Arc;

use mcp_event_store::EventStore;
use mcp_http_transport::stream_manager::{StreamId, StreamManager};
use mcp_jsonrpc::RequestId;
use mcp_protocol::elicitation::{ElicitCreateParams, ElicitResult, ElicitationSchema};
use mcp_protocol::logging::LoggingLevel;
use mcp_protocol::notifications::{
    ElicitationCompleteNotification, ProgressNotification, PromptListChangedNotification,
    ResourceListChangedNotification, ResourceUpdatedNotification, RootsListChangedNotification,
    TaskStatusNotification, ToolListChangedNotification,
};
use mcp_protocol::sampling::{CreateMessageParams, CreateMessageResult};
use mcp_protocol::tasks::{TaskId, TaskStatus};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cancellation::CancellationHandle;
use crate::error::SessionError;
use crate::pending_requests::PendingRequests;

/// State shared by every `HandlerContext` spawned out of one session. Owned
/// solely by the `Session`; contexts only ever hold a clone of the `Arc`.
pub struct SessionShared {
    pub session_id: Option<String>,
    pub streams: Arc<StreamManager>,
    pub event_store: Option<Arc<dyn EventStore>>,
    pub pending: Arc<PendingRequests>,
    pub log_level: RwLock<LoggingLevel>,
    pub supports_server_to_client_requests: bool,
}

impl SessionShared {
    pub fn new(
        session_id: Option<String>,
        streams: Arc<StreamManager>,
        event_store: Option<Arc<dyn EventStore>>,
        supports_server_to_client_requests: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            streams,
            event_store,
            pending: PendingRequests::new(),
            log_level: RwLock::new(LoggingLevel::Info),
            supports_server_to_client_requests,
        })
    }
}

pub struct HandlerContext {
    shared: Arc<SessionShared>,
    /// The stream the originating request arrived on — closed via
    /// `close_originating_stream`.
    originating_stream: StreamId,
    /// `relatedRequestId` per spec.md §4.3.3: notifications emitted while
    /// handling this request carry it so a client can correlate progress with
    /// the call that produced it.
    related_request_id: Option<RequestId>,
    cancellation: CancellationHandle,
}

impl HandlerContext {
    pub fn new(
        shared: Arc<SessionShared>,
        originating_stream: StreamId,
        related_request_id: Option<RequestId>,
        cancellation: CancellationHandle,
    ) -> Self {
        Self {
            shared,
            originating_stream,
            related_request_id,
            cancellation,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.shared.session_id.as_deref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Returns `Err` if this request has been cancelled — handlers call this
    /// at cooperative suspension points instead of polling `is_cancelled`.
    pub fn throw_if_cancelled(&self) -> Result<(), SessionError> {
        if self.cancellation.is_cancelled() {
            match &self.related_request_id {
                Some(id) => Err(SessionError::Cancelled(id.clone())),
                None => Err(SessionError::Cancelled(RequestId::Number(-1))),
            }
        } else {
            Ok(())
        }
    }

    /// Sends an arbitrary already-framed JSON-RPC message — used when a
    /// handler builds its own payload shape rather than one of the typed
    /// notification helpers below.
    pub async fn send_raw_data(&self, payload: Value) {
        let _ = self
            .shared
            .streams
            .send(payload, None, self.shared.session_id.as_deref(), self.shared.event_store.as_ref())
            .await;
    }

    /// Sends `{method, params}` as a notification on the session's
    /// server-initiated (standalone) channel.
    pub async fn send_notification(&self, method: &str, params: Value) {
        self.send_raw_data(serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        }))
        .await;
    }

    pub async fn send_progress(&self, progress_token: &str, progress: u64, total: Option<u64>, message: Option<&str>) {
        let mut notification = ProgressNotification::new(progress_token, progress);
        if let Some(total) = total {
            notification = notification.with_total(total);
        }
        if let Some(message) = message {
            notification = notification.with_message(message);
        }
        let value = serde_json::to_value(&notification).unwrap_or(Value::Null);
        self.send_raw_data(value).await;
    }

    /// Level-gated per spec.md §4.3.7 — only emits if `level` meets or
    /// exceeds the session's current `logging/setLevel` threshold.
    pub async fn send_log(&self, level: LoggingLevel, data: Value, logger: Option<&str>) {
        let threshold = *self.shared.log_level.read().await;
        if !level.should_log(threshold) {
            return;
        }
        let mut notification = mcp_protocol::logging::LoggingMessageNotification::new(level, data);
        if let Some(logger) = logger {
            notification = notification.with_logger(logger);
        }
        let value = serde_json::to_value(&notification).unwrap_or(Value::Null);
        self.send_raw_data(value).await;
    }

    pub async fn set_log_level(&self, level: LoggingLevel) {
        *self.shared.log_level.write().await = level;
    }

    pub async fn send_resource_list_changed(&self) {
        let value = serde_json::to_value(ResourceListChangedNotification::new()).unwrap_or(Value::Null);
        self.send_raw_data(value).await;
    }

    pub async fn send_tool_list_changed(&self) {
        let value = serde_json::to_value(ToolListChangedNotification::new()).unwrap_or(Value::Null);
        self.send_raw_data(value).await;
    }

    pub async fn send_prompt_list_changed(&self) {
        let value = serde_json::to_value(PromptListChangedNotification::new()).unwrap_or(Value::Null);
        self.send_raw_data(value).await;
    }

    pub async fn send_roots_list_changed(&self) {
        let value = serde_json::to_value(RootsListChangedNotification::new()).unwrap_or(Value::Null);
        self.send_raw_data(value).await;
    }

    pub async fn send_resource_updated(&self, uri: &str) {
        let value = serde_json::to_value(ResourceUpdatedNotification::new(uri)).unwrap_or(Value::Null);
        self.send_raw_data(value).await;
    }

    pub async fn send_task_status(&self, task_id: TaskId, status: TaskStatus, message: Option<&str>) {
        let mut notification = TaskStatusNotification::new(task_id, status);
        if let Some(message) = message {
            notification = notification.with_message(message);
        }
        let value = serde_json::to_value(&notification).unwrap_or(Value::Null);
        self.send_raw_data(value).await;
    }

    pub async fn send_elicitation_complete(&self, task_id: TaskId) {
        let value = serde_json::to_value(ElicitationCompleteNotification::new(task_id)).unwrap_or(Value::Null);
        self.send_raw_data(value).await;
    }

    /// Closes the SSE stream the originating request arrived on (spec.md §4.5).
    pub async fn close_originating_stream(&self) {
        self.shared.streams.close_stream(&self.originating_stream).await;
    }

    pub async fn close_standalone_stream(&self) {
        if let Some(session_id) = &self.shared.session_id {
            if let Some(stream_id) = self.shared.streams.standalone_stream_id(session_id).await {
                self.shared.streams.close_stream(&stream_id).await;
            }
        }
    }

    /// Server→client request per spec.md §4.3.5: mints an ID from the
    /// session's counter, sends it over the standalone channel, and awaits
    /// the matching response. Fails immediately if the transport wasn't
    /// negotiated to support server-initiated requests.
    pub async fn send_request(&self, method: &str, params: Value) -> Result<Value, SessionError> {
        if !self.shared.supports_server_to_client_requests {
            return Err(SessionError::ServerToClientUnsupported);
        }
        let (id, rx) = self.shared.pending.register().await;
        self.send_raw_data(serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await;
        match rx.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(SessionError::HandlerExecution {
                method: method.to_string(),
                message: err.message,
            }),
            Err(_) => Err(SessionError::HandlerInternal { method: method.to_string() }),
        }
    }

    pub async fn request_elicitation(
        &self,
        message: &str,
        schema: ElicitationSchema,
    ) -> Result<ElicitResult, SessionError> {
        let params = ElicitCreateParams::new(message, schema);
        let value = self
            .send_request("elicitation/create", serde_json::to_value(&params).unwrap_or(Value::Null))
            .await?;
        serde_json::from_value(value)
            .map_err(|e| SessionError::HandlerInternal { method: format!("elicitation/create: {e}") })
    }

    pub async fn request_elicitation_url(&self, message: &str, field_name: &str) -> Result<ElicitResult, SessionError> {
        let schema = ElicitationSchema::new()
            .with_property(field_name, mcp_protocol::elicitation::PrimitiveSchemaDefinition::url())
            .with_required(vec![field_name.to_string()]);
        self.request_elicitation(message, schema).await
    }

    pub async fn create_message(&self, params: CreateMessageParams) -> Result<CreateMessageResult, SessionError> {
        let value = self
            .send_request("sampling/createMessage", serde_json::to_value(&params).unwrap_or(Value::Null))
            .await?;
        serde_json::from_value(value)
            .map_err(|e| SessionError::HandlerInternal { method: format!("sampling/createMessage: {e}") })
    }

    pub async fn list_roots(&self) -> Result<Vec<mcp_protocol::roots::Root>, SessionError> {
        let value = self.send_request("roots/list", serde_json::json!({})).await?;
        let result: mcp_protocol::roots::ListRootsResult = serde_json::from_value(value)
            .map_err(|e| SessionError::HandlerInternal { method: format!("roots/list: {e}") })?;
        Ok(result.roots)
    }
}

/// Extra request-scoped fields a handler may read out of `_meta`/params
/// before it's had a chance to build its own typed params struct.
pub fn extract_progress_token(meta: &HashMap<String, Value>) -> Option<String> {
    meta.get("progressToken").and_then(|v| v.as_str()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_http_transport::stream_manager::StreamManager;

    fn context() -> (HandlerContext, tokio::sync::mpsc::UnboundedReceiver<bytes::Bytes>) {
        let streams = Arc::new(StreamManager::new());
        let shared = SessionShared::new(Some("sess-1".into()), streams.clone(), None, true);
        (
            HandlerContext::new(shared, "req:1".into(), Some(RequestId::Number(1)), CancellationHandle::new()),
            tokio::sync::mpsc::unbounded_channel().1,
        )
    }

    #[tokio::test]
    async fn log_below_threshold_is_suppressed() {
        let (ctx, _unused) = context();
        ctx.set_log_level(LoggingLevel::Error).await;
        // No standalone stream open; send should simply be a no-op, not panic.
        ctx.send_log(LoggingLevel::Debug, serde_json::json!("quiet"), None).await;
    }

    #[tokio::test]
    async fn server_to_client_request_rejected_when_unsupported() {
        let streams = Arc::new(StreamManager::new());
        let shared = SessionShared::new(Some("sess-1".into()), streams, None, false);
        let ctx = HandlerContext::new(shared, "req:1".into(), None, CancellationHandle::new());
        let err = ctx.send_request("roots/list", serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, SessionError::ServerToClientUnsupported));
    }

    #[tokio::test]
    async fn cancellation_surfaces_through_throw_if_cancelled() {
        let streams = Arc::new(StreamManager::new());
        let shared = SessionShared::new(None, streams, None, false);
        let cancellation = CancellationHandle::new();
        let ctx = HandlerContext::new(shared, "req:1".into(), Some(RequestId::Number(7)), cancellation.clone());
        assert!(ctx.throw_if_cancelled().is_ok());
        cancellation.cancel();
        assert!(ctx.is_cancelled());
        assert!(matches!(ctx.throw_if_cancelled(), Err(SessionError::Cancelled(_))));
    }
}
