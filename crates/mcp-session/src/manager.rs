//! `SessionManager`: owns the session-id → [`Session`] map, implements
//! [`mcp_http_transport::SessionHost`] so the transport layer can query and
//! create sessions without knowing about JSON-RPC dispatch, implements
//! [`mcp_http_transport::MessageSink`] so it can be the transport's single
//! message handoff point (routing each decoded message to the right session
//! by `session_id`), and broadcasts list-changed notifications to every live
//! session (spec.md §4.3.8).
//!
//! Every session shares the one [`StreamManager`] the transport layer owns —
//! stream and session isolation comes from keying within it, not from
//! separate instances, since `StreamManager` is also what `HttpTransport`
//! opens SSE/JSON streams against.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mcp_event_store::EventStore;
use mcp_http_transport::message::{MessageSink, TransportMessage};
use mcp_http_transport::session_host::SessionHost;
use mcp_http_transport::stream_manager::StreamManager;
use mcp_protocol::version::McpVersion;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::handler::HandlerRegistry;
use crate::handler_context::SessionShared;
use crate::response_router::ResponseRouterChain;
use crate::session::Session;

struct Entry {
    session: Arc<Session>,
    version: McpVersion,
    terminated: bool,
}

pub struct SessionManager {
    handlers: Arc<HandlerRegistry>,
    streams: Arc<StreamManager>,
    event_store: Option<Arc<dyn EventStore>>,
    strict: bool,
    supports_server_to_client_requests: bool,
    sessions: RwLock<HashMap<String, Entry>>,
    /// Backs stateless mode (spec.md §4.2.6): one shared, never-terminated
    /// session with no persisted ID, used when a request carries none.
    stateless: Arc<Session>,
}

impl SessionManager {
    /// `handlers` is built once by the application — registered with whatever
    /// methods it supports beyond `initialize`/`ping`/`logging/setLevel` —
    /// and shared read-only across every session this manager creates.
    pub fn new(
        handlers: Arc<HandlerRegistry>,
        streams: Arc<StreamManager>,
        event_store: Option<Arc<dyn EventStore>>,
        strict: bool,
    ) -> Arc<Self> {
        let caps = handlers.capabilities();
        let supports_server_to_client_requests = caps.sampling.is_some() || caps.roots.is_some();
        let stateless = Arc::new(Session::new(
            None,
            SessionShared::new(None, streams.clone(), event_store.clone(), supports_server_to_client_requests),
            handlers.clone(),
            Arc::new(ResponseRouterChain::new()),
            strict,
        ));
        Arc::new(Self {
            handlers,
            streams,
            event_store,
            strict,
            supports_server_to_client_requests,
            sessions: RwLock::new(HashMap::new()),
            stateless,
        })
    }

    fn build_session(&self, session_id: Option<String>) -> Arc<Session> {
        let shared = SessionShared::new(
            session_id.clone(),
            self.streams.clone(),
            self.event_store.clone(),
            self.supports_server_to_client_requests,
        );
        Arc::new(Session::new(
            session_id,
            shared,
            self.handlers.clone(),
            Arc::new(ResponseRouterChain::new()),
            self.strict,
        ))
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(session_id).filter(|e| !e.terminated).map(|e| e.session.clone())
    }

    /// Broadcasts a server-initiated notification to every non-terminated
    /// session's standalone stream. A send failure just means that session's
    /// standalone stream isn't open right now; it doesn't unregister the
    /// session.
    pub async fn broadcast_notification(&self, method: &str, params: Option<serde_json::Value>) {
        let sessions = self.sessions.read().await;
        for (session_id, entry) in sessions.iter() {
            if entry.terminated {
                continue;
            }
            let payload = match &params {
                Some(p) => serde_json::json!({"jsonrpc": "2.0", "method": method, "params": p}),
                None => serde_json::json!({"jsonrpc": "2.0", "method": method}),
            };
            if let Err(e) = self.streams.send(payload, None, Some(session_id.as_str()), self.event_store.as_ref()).await
            {
                debug!(session_id, error = %e, "broadcast notification did not reach standalone stream");
            }
        }
    }

    pub async fn send_tool_list_changed(&self) {
        self.broadcast_notification("notifications/tools/list_changed", None).await;
    }

    pub async fn send_resource_list_changed(&self) {
        self.broadcast_notification("notifications/resources/list_changed", None).await;
    }

    pub async fn send_prompt_list_changed(&self) {
        self.broadcast_notification("notifications/prompts/list_changed", None).await;
    }
}

#[async_trait]
impl MessageSink for SessionManager {
    async fn accept(&self, message: TransportMessage) {
        match &message.metadata.session_id {
            Some(session_id) => match self.get(session_id).await {
                Some(session) => session.accept(message).await,
                None => warn!(session_id, "message for unknown or terminated session dropped"),
            },
            None => self.stateless.accept(message).await,
        }
    }
}

#[async_trait]
impl SessionHost for SessionManager {
    async fn is_initialized(&self, session_id: Option<&str>) -> bool {
        match session_id {
            Some(id) => match self.sessions.read().await.get(id) {
                Some(entry) if !entry.terminated => entry.session.is_initialized(),
                _ => false,
            },
            None => self.stateless.is_initialized(),
        }
    }

    async fn is_terminated(&self, session_id: &str) -> bool {
        self.sessions.read().await.get(session_id).map(|e| e.terminated).unwrap_or(true)
    }

    async fn exists(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    async fn negotiated_version(&self, session_id: Option<&str>) -> Option<McpVersion> {
        match session_id {
            Some(id) => self.sessions.read().await.get(id).map(|e| e.version),
            None => None,
        }
    }

    async fn create_session(&self, version: McpVersion) -> Option<String> {
        let session_id = Uuid::new_v4().to_string();
        let session = self.build_session(Some(session_id.clone()));
        let entry = Entry { session, version, terminated: false };
        self.sessions.write().await.insert(session_id.clone(), entry);
        Some(session_id)
    }

    async fn on_session_closed(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(entry) => {
                entry.terminated = true;
                entry
                    .session
                    .shared()
                    .pending
                    .fail_all(mcp_jsonrpc::JsonRpcErrorObject::internal_error(Some("session terminated".to_string())))
                    .await;
            }
            None => warn!(session_id, "on_session_closed called for unknown session"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_protocol::initialize::{Implementation, ServerCapabilities};

    fn manager() -> Arc<SessionManager> {
        let handlers = Arc::new(HandlerRegistry::new(Implementation::new("srv", "0.1"), ServerCapabilities::default()));
        SessionManager::new(handlers, Arc::new(StreamManager::new()), None, true)
    }

    #[tokio::test]
    async fn create_session_registers_it_as_not_initialized() {
        let manager = manager();
        let id = manager.create_session(McpVersion::LATEST).await.unwrap();
        assert!(manager.exists(&id).await);
        assert!(!manager.is_initialized(Some(&id)).await);
        assert!(!manager.is_terminated(&id).await);
    }

    #[tokio::test]
    async fn unknown_session_reports_terminated_and_missing() {
        let manager = manager();
        assert!(manager.is_terminated("ghost").await);
        assert!(!manager.exists("ghost").await);
        assert!(manager.negotiated_version(Some("ghost")).await.is_none());
    }

    #[tokio::test]
    async fn on_session_closed_marks_terminated() {
        let manager = manager();
        let id = manager.create_session(McpVersion::LATEST).await.unwrap();
        manager.on_session_closed(&id).await;
        assert!(manager.is_terminated(&id).await);
        assert!(manager.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn negotiated_version_reflects_creation_argument() {
        let manager = manager();
        let id = manager.create_session(McpVersion::V2025_03_26).await.unwrap();
        assert_eq!(manager.negotiated_version(Some(&id)).await, Some(McpVersion::V2025_03_26));
    }
}
