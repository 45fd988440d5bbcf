//! # JSON-RPC Prelude
//!
//! Convenient re-exports of the most commonly used types from this crate.
//!
//! ```rust
//! use mcp_jsonrpc::prelude::*;
//! ```

pub use crate::envelope::{Envelope, Message, parse_envelope};
pub use crate::error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject};
pub use crate::notification::JsonRpcNotification;
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcMessage, JsonRpcResponse, ResponseResult};
pub use crate::types::{JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
