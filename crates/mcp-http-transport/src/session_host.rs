//! The transport's view of session lifecycle — queried during request
//! pre-checks (spec.md §4.2.5) and updated at `initialize`/`DELETE`. Owned
//! and implemented by the session engine's SessionManager; the transport
//! never stores session state itself.

use async_trait::async_trait;
use mcp_protocol::McpVersion;

#[async_trait]
pub trait SessionHost: Send + Sync {
    /// True once any session has completed `initialize` (stateless mode has
    /// at most a single implicit session).
    async fn is_initialized(&self, session_id: Option<&str>) -> bool;

    async fn is_terminated(&self, session_id: &str) -> bool;

    async fn exists(&self, session_id: &str) -> bool;

    async fn negotiated_version(&self, session_id: Option<&str>) -> Option<McpVersion>;

    /// Mints a fresh, visible-ASCII session ID and records it as initialized
    /// with `version`. `None` signals ID generation failure (HTTP 500).
    async fn create_session(&self, version: McpVersion) -> Option<String>;

    async fn on_session_closed(&self, session_id: &str);
}
