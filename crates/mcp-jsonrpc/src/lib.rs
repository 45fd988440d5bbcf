//! # JSON-RPC 2.0 core types
//!
//! A pure, transport-agnostic JSON-RPC 2.0 implementation: the wire types
//! (`RequestId`, requests, responses, notifications, error objects) with no
//! transport-specific code and no MCP-specific semantics. Session dispatch,
//! strict-mode gating, and server-to-client request correlation live one
//! layer up in `mcp-session` — this crate only knows how to parse and frame
//! JSON-RPC 2.0.

pub mod envelope;
pub mod error;
pub mod notification;
pub mod request;
pub mod response;
pub mod types;

pub mod prelude;

pub use envelope::{Envelope, parse_envelope};
pub use error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject};
pub use notification::JsonRpcNotification;
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcMessage, JsonRpcResponse, ResponseResult};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
