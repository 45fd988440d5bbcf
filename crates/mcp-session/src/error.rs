//! Session-engine errors: the `Protocol`, `HandlerExecution`, `HandlerInternal`,
//! `Lifecycle`, and `Cancellation` kinds from spec.md §7. `TransportBoundary`,
//! the remaining `Session` variants, and `EventStore` live in
//! `mcp-http-transport::TransportError`.

use mcp_jsonrpc::{JsonRpcErrorObject, RequestId};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("strict mode rejected '{method}' before initialize completed")]
    NotYetInitialized { method: String },

    #[error("unknown method: {0}")]
    MethodNotFound(String),

    #[error("handler for '{method}' returned an error: {message}")]
    HandlerExecution { method: String, message: String },

    #[error("handler for '{method}' panicked or was cancelled before completion")]
    HandlerInternal { method: String },

    #[error("session already terminated")]
    AlreadyTerminated,

    #[error("no session found for id {0}")]
    UnknownSession(String),

    #[error("request {0} was cancelled")]
    Cancelled(RequestId),

    #[error("transport does not support server-to-client requests")]
    ServerToClientUnsupported,
}

impl SessionError {
    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            SessionError::NotYetInitialized { .. } => {
                JsonRpcErrorObject::invalid_request(Some(serde_json::json!({
                    "detail": self.to_string(),
                })))
            }
            SessionError::MethodNotFound(method) => JsonRpcErrorObject::method_not_found(method),
            SessionError::HandlerExecution { message, .. } => {
                JsonRpcErrorObject::server_error(-32010, message, None)
            }
            SessionError::HandlerInternal { .. } => {
                JsonRpcErrorObject::internal_error(Some(self.to_string()))
            }
            SessionError::AlreadyTerminated | SessionError::UnknownSession(_) => {
                JsonRpcErrorObject::server_error(-32011, &self.to_string(), None)
            }
            SessionError::Cancelled(_) => JsonRpcErrorObject::server_error(-32012, &self.to_string(), None),
            SessionError::ServerToClientUnsupported => {
                JsonRpcErrorObject::server_error(-32013, &self.to_string(), None)
            }
        }
    }

    pub fn to_json_rpc_error(&self, id: Option<RequestId>) -> mcp_jsonrpc::JsonRpcError {
        mcp_jsonrpc::JsonRpcError::new(id, self.to_error_object())
    }
}
