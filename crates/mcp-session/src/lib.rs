//! Session-scoped JSON-RPC dispatch for an MCP Streamable HTTP server:
//! decode, gate, spawn, cancel, and route responses back to the stream a
//! request arrived on.
//!
//! [`manager::SessionManager`] owns the session-id → [`session::Session`] map
//! and implements [`mcp_http_transport::session_host::SessionHost`] so the
//! transport layer can create and query sessions. Each [`session::Session`]
//! dispatches through a [`handler::HandlerRegistry`] of method-name-keyed
//! [`handler::RequestHandler`]s, giving each in-flight request a
//! [`handler_context::HandlerContext`] to send notifications, progress, logs,
//! and server-to-client requests back out over its session's streams.

pub mod cancellation;
pub mod error;
pub mod handler;
pub mod handler_context;
pub mod manager;
pub mod pending_requests;
pub mod response_router;
pub mod session;

pub use cancellation::CancellationHandle;
pub use error::SessionError;
pub use handler::{HandlerRegistry, RequestHandler};
pub use handler_context::{HandlerContext, SessionShared};
pub use manager::SessionManager;
pub use pending_requests::{PendingRequests, PendingResult};
pub use response_router::{ResponseRouter, ResponseRouterChain};
pub use session::Session;
