//! Model Context Protocol (MCP) wire types.
//!
//! Covers the initialize handshake, capability negotiation, content blocks,
//! `_meta`/progress/cursor, logging levels, elicitation, sampling, roots, and
//! the minimal task vocabulary a request needs to opt into task-augmented
//! execution. Wire-level JSON-RPC envelope, request id, and error object
//! types live in `mcp-jsonrpc`; this crate only adds the MCP-specific
//! payloads carried inside them.
//!
//! ```rust
//! use mcp_protocol::meta::{Meta, Cursor};
//! use std::collections::HashMap;
//! use serde_json::json;
//!
//! let meta = Meta::with_pagination(Some(Cursor::new("next-page")), Some(100), true);
//!
//! let mut request_extras = HashMap::new();
//! request_extras.insert("userContext".to_string(), json!("user_123"));
//!
//! let response_meta = meta.merge_request_extras(Some(&request_extras));
//! ```

pub mod content;
pub mod elicitation;
pub mod error;
pub mod initialize;
pub mod logging;
pub mod meta;
pub mod notifications;
pub mod ping;
pub mod roots;
pub mod sampling;
pub mod tasks;
pub mod tools;
pub mod version;

pub use content::{
    BlobResourceContents, ContentBlock, ResourceContents, ResourceReference, TextResourceContents,
};
pub use elicitation::{
    ElicitAction, ElicitCreateParams, ElicitCreateRequest, ElicitResult, ElicitationBuilder,
    ElicitationSchema, PrimitiveSchemaDefinition, StringFormat,
};
pub use error::{McpError, McpResult};
pub use initialize::{
    ClientCapabilities, Implementation, InitializeRequest, InitializeResult, ServerCapabilities,
    TasksCapabilities,
};
pub use logging::{LoggingLevel, LoggingMessageNotification, LoggingMessageParams, SetLevelRequest};
pub use meta::{Annotations, Cursor as MetaCursor, Meta, PaginatedResponse, ProgressResponse, ProgressToken, WithMeta};
pub use notifications::{
    CancelledNotification, ElicitationCompleteNotification, InitializedNotification, Notification,
    NotificationParams, ProgressNotification, ProgressNotificationParams,
    PromptListChangedNotification, ResourceListChangedNotification, ResourceUpdatedNotification,
    RootsListChangedNotification, TaskStatusNotification, ToolListChangedNotification,
};
pub use ping::{EmptyParams, EmptyResult, PingRequest};
pub use roots::{ListRootsRequest, ListRootsResult, Root};
pub use sampling::{
    CreateMessageParams, CreateMessageRequest, CreateMessageResult, ModelHint, ModelPreferences,
    Role, SamplingMessage, ToolChoice, ToolChoiceMode,
};
pub use tasks::{TaskId, TaskMetadata, TaskStatus};
pub use tools::Tool;
pub use version::McpVersion;

/// The latest MCP protocol version this crate implements.
pub const MCP_VERSION: &str = "2025-11-25";
