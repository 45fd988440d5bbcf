//! MCP-level errors: protocol negotiation, parameter validation, session
//! errors. Every variant maps to a JSON-RPC error object via
//! [`McpError::to_error_object`] so handlers can return `Result<T, McpError>`
//! and let the dispatch layer turn the `Err` into a wire response.

use mcp_jsonrpc::{JsonRpcErrorObject, RequestId};

pub type McpResult<T> = Result<T, McpError>;

#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("protocol version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("invalid parameter type for '{param}': expected {expected}, got {actual}")]
    InvalidParameterType {
        param: String,
        expected: String,
        actual: String,
    },

    #[error("session error: {0}")]
    SessionError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A JSON-RPC error carried verbatim from a nested call (e.g. a queued
    /// task's recorded failure) — `tasks/result`-style passthrough must
    /// reproduce the original code/message/data exactly.
    #[error("json-rpc error {code}: {message}")]
    JsonRpcError {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
}

impl McpError {
    pub fn missing_param(param: &str) -> Self {
        Self::MissingParameter(param.to_string())
    }

    pub fn invalid_param_type(param: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidParameterType {
            param: param.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            McpError::InvalidRequest { message } => JsonRpcErrorObject::invalid_params(message),
            McpError::InvalidParameters(msg) => JsonRpcErrorObject::invalid_params(msg),
            McpError::MissingParameter(param) => {
                JsonRpcErrorObject::invalid_params(&format!("missing required parameter: {param}"))
            }
            McpError::InvalidParameterType {
                param,
                expected,
                actual,
            } => JsonRpcErrorObject::invalid_params(&format!(
                "invalid parameter type for '{param}': expected {expected}, got {actual}"
            )),
            McpError::VersionMismatch { expected, actual } => JsonRpcErrorObject::server_error(
                -32022,
                &format!("protocol version mismatch: expected {expected}, got {actual}"),
                None,
            ),
            McpError::ValidationError(msg) => {
                JsonRpcErrorObject::server_error(-32020, &format!("validation error: {msg}"), None)
            }
            McpError::ConfigurationError(msg) => JsonRpcErrorObject::server_error(
                -32030,
                &format!("configuration error: {msg}"),
                None,
            ),
            McpError::SessionError(msg) => {
                JsonRpcErrorObject::server_error(-32031, &format!("session error: {msg}"), None)
            }
            McpError::TransportError(msg) => {
                JsonRpcErrorObject::server_error(-32040, &format!("transport error: {msg}"), None)
            }
            McpError::IoError(err) => {
                JsonRpcErrorObject::internal_error(Some(format!("io error: {err}")))
            }
            McpError::SerializationError(err) => {
                JsonRpcErrorObject::internal_error(Some(format!("serialization error: {err}")))
            }
            McpError::JsonRpcError {
                code,
                message,
                data,
            } => JsonRpcErrorObject::server_error(*code, message, data.clone()),
        }
    }

    pub fn to_json_rpc_error(&self, id: Option<RequestId>) -> mcp_jsonrpc::JsonRpcError {
        mcp_jsonrpc::JsonRpcError::new(id, self.to_error_object())
    }
}
