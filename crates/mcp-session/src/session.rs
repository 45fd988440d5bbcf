//! `Session`: decodes a transport-delivered byte buffer into JSON-RPC
//! messages, dispatches them in batch→response→request→notification order
//! (spec.md §4.3.1), and tracks one spawned task per in-flight request for
//! cooperative cancellation (spec.md §4.3.4). Implements
//! [`mcp_http_transport::MessageSink`] so the transport can hand it messages
//! without knowing anything about JSON-RPC.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mcp_http_transport::message::{MessageMetadata, MessageSink, TransportMessage};
use mcp_jsonrpc::envelope::{parse_envelope, Envelope, Message};
use mcp_jsonrpc::request::JsonRpcRequest;
use mcp_jsonrpc::response::JsonRpcMessage;
use mcp_jsonrpc::{JsonRpcErrorObject, RequestId};
use mcp_protocol::notifications::CancelledNotificationParams;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cancellation::CancellationHandle;
use crate::error::SessionError;
use crate::handler::HandlerRegistry;
use crate::handler_context::{HandlerContext, SessionShared};
use crate::response_router::ResponseRouterChain;

pub struct Session {
    pub session_id: Option<String>,
    shared: Arc<SessionShared>,
    handlers: Arc<HandlerRegistry>,
    response_routers: Arc<ResponseRouterChain>,
    initialized: Arc<AtomicBool>,
    /// Strict mode (spec.md §4.3.2): reject every method but `initialize` and
    /// `ping` until `initialize` has completed successfully.
    strict: bool,
    in_flight: Arc<Mutex<HashMap<RequestId, CancellationHandle>>>,
}

impl Session {
    pub fn new(
        session_id: Option<String>,
        shared: Arc<SessionShared>,
        handlers: Arc<HandlerRegistry>,
        response_routers: Arc<ResponseRouterChain>,
        strict: bool,
    ) -> Self {
        Self {
            session_id,
            shared,
            handlers,
            response_routers,
            initialized: Arc::new(AtomicBool::new(false)),
            strict,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn shared(&self) -> &Arc<SessionShared> {
        &self.shared
    }

    async fn handle_response(&self, message: JsonRpcMessage) {
        match message {
            JsonRpcMessage::Response(response) => {
                let value = response.result.as_value().cloned().unwrap_or(Value::Null);
                if self.response_routers.route_response(&response.id, &value).await {
                    return;
                }
                self.shared.pending.resolve(&response.id, value).await;
            }
            JsonRpcMessage::Error(error) => {
                let Some(id) = error.id.clone() else {
                    warn!("received an error response with no id; dropping");
                    return;
                };
                if self.response_routers.route_error(&id, &error.error).await {
                    return;
                }
                self.shared.pending.reject(&id, error.error).await;
            }
        }
    }

    async fn handle_notification(&self, method: &str, params: Option<Value>) {
        match method {
            "notifications/cancelled" => {
                let Some(params) = params else { return };
                match serde_json::from_value::<CancelledNotificationParams>(params) {
                    Ok(cancelled) => self.cancel_request(&cancelled.request_id).await,
                    Err(e) => warn!("malformed notifications/cancelled params: {e}"),
                }
            }
            other => debug!(method = %other, "unhandled notification"),
        }
    }

    async fn cancel_request(&self, id: &RequestId) {
        if let Some(cancellation) = self.in_flight.lock().await.get(id) {
            cancellation.cancel();
        }
    }

    async fn reject_request(&self, id: RequestId, error: JsonRpcErrorObject, metadata: &MessageMetadata) {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id.clone(),
            "error": error,
        });
        let _ = self
            .shared
            .streams
            .send(payload, Some(id), metadata.session_id.as_deref(), self.shared.event_store.as_ref())
            .await;
    }

    /// Gates, registers, and spawns one request. Dispatch itself runs on its
    /// own task so a slow handler never blocks the rest of the batch.
    async fn spawn_request(&self, request: JsonRpcRequest, metadata: &MessageMetadata) {
        let method = request.method.clone();
        let id = request.id.clone();

        if self.strict
            && !self.is_initialized()
            && !matches!(method.as_str(), "initialize" | "ping")
        {
            let err = SessionError::NotYetInitialized { method: method.clone() };
            self.reject_request(id, err.to_error_object(), metadata).await;
            return;
        }

        if !self.handlers.is_registered(&method) {
            let err = SessionError::MethodNotFound(method.clone());
            self.reject_request(id, err.to_error_object(), metadata).await;
            return;
        }

        let cancellation = CancellationHandle::new();
        self.in_flight.lock().await.insert(id.clone(), cancellation.clone());

        let shared = self.shared.clone();
        let handlers = self.handlers.clone();
        let in_flight = self.in_flight.clone();
        let initialized = self.initialized.clone();
        let stream_id = metadata.stream_id.clone();
        let session_id = metadata.session_id.clone();
        let params = request.params.as_ref().map(|p| p.to_value());
        let id_for_task = id.clone();

        tokio::spawn(async move {
            let ctx = HandlerContext::new(shared.clone(), stream_id, Some(id_for_task.clone()), cancellation.clone());
            let outcome = handlers.dispatch(&method, params, &ctx).await;
            in_flight.lock().await.remove(&id_for_task);

            if cancellation.is_cancelled() {
                debug!(method = %method, "handler finished after cancellation; suppressing response");
                return;
            }

            if method == "initialize" && outcome.is_ok() {
                initialized.store(true, Ordering::SeqCst);
            }

            let payload = match outcome {
                Ok(value) => serde_json::json!({"jsonrpc": "2.0", "id": id_for_task, "result": value}),
                Err(err) => serde_json::json!({"jsonrpc": "2.0", "id": id_for_task, "error": err.to_error_object()}),
            };
            let _ = shared
                .streams
                .send(payload, Some(id_for_task), session_id.as_deref(), shared.event_store.as_ref())
                .await;
        });
    }

    async fn reject_malformed(&self, err: mcp_jsonrpc::JsonRpcError, metadata: &MessageMetadata) {
        let payload = serde_json::to_value(&err).unwrap_or(Value::Null);
        let _ = self
            .shared
            .streams
            .send(payload, None, metadata.session_id.as_deref(), self.shared.event_store.as_ref())
            .await;
    }
}

#[async_trait]
impl MessageSink for Session {
    async fn accept(&self, message: TransportMessage) {
        let envelope = match parse_envelope(&message.data) {
            Ok(envelope) => envelope,
            Err(err) => {
                self.reject_malformed(err, &message.metadata).await;
                return;
            }
        };

        let (responses, requests, notifications) = partition(envelope);

        for response in responses {
            self.handle_response(response).await;
        }
        for request in requests {
            self.spawn_request(request, &message.metadata).await;
        }
        for (method, params) in notifications {
            self.handle_notification(&method, params).await;
        }
    }
}

type Notification = (String, Option<Value>);

/// Splits a decoded envelope into its three message kinds, preserving
/// batch→response→request→notification precedence regardless of how the
/// client ordered them within the array.
fn partition(envelope: Envelope) -> (Vec<JsonRpcMessage>, Vec<JsonRpcRequest>, Vec<Notification>) {
    let messages = match envelope {
        Envelope::Single(m) => vec![m],
        Envelope::Batch(items) => items,
    };

    let mut responses = Vec::new();
    let mut requests = Vec::new();
    let mut notifications = Vec::new();

    for message in messages {
        match message {
            Message::Response(r) => responses.push(r),
            Message::Request(r) => requests.push(r),
            Message::Notification(n) => notifications.push((n.method, n.params.map(|p| p.to_value()))),
        }
    }

    (responses, requests, notifications)
}
