//! Streamable HTTP transport: stream multiplexing, SSE framing, and the
//! DNS-rebinding guard (spec.md §4.2).
//!
//! This crate owns HTTP mechanics only. It has no notion of JSON-RPC
//! dispatch, strict-mode gating, or tool/resource/prompt handlers — those
//! belong to the session engine, which plugs in through [`MessageSink`] and
//! [`SessionHost`].

pub mod error;
pub mod message;
pub mod options;
pub mod protocol;
pub mod rebinding;
pub mod server;
pub mod session_host;
pub mod sse;
pub mod stream_manager;
pub mod transport;

pub use error::TransportError;
pub use message::{MessageMetadata, MessageSink, TransportMessage};
pub use options::TransportOptions;
pub use rebinding::DnsRebindingSettings;
pub use server::{HttpTransportServer, ServerError};
pub use session_host::SessionHost;
pub use stream_manager::{JsonOutcome, StreamManager, STANDALONE_STREAM_ID};
pub use transport::{HttpTransport, ResponseBody};
