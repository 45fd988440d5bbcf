//! Transport-boundary errors and their HTTP status codes.
//!
//! These are the `TransportBoundary`, `Session`, and `EventStore` error
//! kinds from spec.md §7; `Protocol` and handler-side kinds belong to the
//! session engine, not here.

use hyper::StatusCode;
use mcp_jsonrpc::JsonRpcError;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("missing or unrecognized Host header")]
    HostRejected,
    #[error("Origin header not in the allowed list")]
    OriginRejected,
    #[error("server not initialized")]
    NotInitialized,
    #[error("missing Mcp-Session-Id header")]
    MissingSessionId,
    #[error("unknown or terminated session")]
    UnknownSession,
    #[error("unsupported MCP-Protocol-Version")]
    UnsupportedProtocolVersion,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("Accept header does not match the required media types")]
    AcceptMismatch,
    #[error("Content-Type must be application/json")]
    UnsupportedContentType,
    #[error("method not allowed")]
    MethodNotAllowed { allow: &'static str },
    #[error("stream conflict: a reader is already attached")]
    StreamConflict,
    #[error("failed to generate a session id")]
    SessionIdGenerationFailed,
    #[error("pending response lost: transport is shutting down")]
    ResponseLost,
}

impl TransportError {
    pub fn status(&self) -> StatusCode {
        match self {
            TransportError::HostRejected => StatusCode::MISDIRECTED_REQUEST,
            TransportError::OriginRejected => StatusCode::FORBIDDEN,
            TransportError::NotInitialized | TransportError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            TransportError::MissingSessionId => StatusCode::BAD_REQUEST,
            TransportError::UnknownSession => StatusCode::NOT_FOUND,
            TransportError::UnsupportedProtocolVersion => StatusCode::BAD_REQUEST,
            TransportError::AcceptMismatch => StatusCode::NOT_ACCEPTABLE,
            TransportError::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            TransportError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            TransportError::StreamConflict => StatusCode::CONFLICT,
            TransportError::SessionIdGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            TransportError::ResponseLost => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn allow_header(&self) -> Option<&'static str> {
        match self {
            TransportError::MethodNotAllowed { allow } => Some(allow),
            _ => None,
        }
    }

    /// The HTTP-boundary JSON-RPC error envelope: `id: null`, per spec.md §6.
    pub fn to_envelope(&self) -> JsonRpcError {
        let message = self.to_string();
        JsonRpcError::new(None, mcp_jsonrpc::JsonRpcErrorObject::invalid_request(Some(
            serde_json::json!({ "detail": message }),
        )))
    }
}
