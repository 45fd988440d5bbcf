//! The handoff between Transport and the session engine.
//!
//! The Transport never decodes JSON-RPC itself beyond classifying envelope
//! shape; it hands raw bytes plus routing metadata to whatever implements
//! [`MessageSink`] (the session engine), and later receives responses back
//! through [`crate::stream_manager::StreamManager::send`].

use async_trait::async_trait;
use bytes::Bytes;
use mcp_jsonrpc::types::RequestId;

use crate::stream_manager::StreamId;

/// Routing context captured at the moment a message is handed off, so later
/// responses and notifications reach the right stream even if the session is
/// replaced or the client reconnects — spec.md §4.3.3.
#[derive(Debug, Clone)]
pub struct MessageMetadata {
    pub session_id: Option<String>,
    pub stream_id: StreamId,
    pub request_ids: Vec<RequestId>,
    pub protocol_version: mcp_protocol::McpVersion,
}

#[derive(Debug, Clone)]
pub struct TransportMessage {
    pub data: Bytes,
    pub metadata: MessageMetadata,
}

/// Implemented by the session engine. The transport calls `accept` once per
/// decoded POST body (or once for a batch) and otherwise has no knowledge of
/// JSON-RPC dispatch.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn accept(&self, message: TransportMessage);
}
