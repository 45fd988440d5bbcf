//! Decoding of a raw JSON-RPC payload into one of its four shapes.
//!
//! A POST body is either a single JSON-RPC object or a JSON array of
//! objects (a batch). Each element is a request (has `method` and `id`), a
//! notification (has `method`, no `id`), or a response (has `id` and exactly
//! one of `result`/`error`). This module only classifies and parses; dispatch
//! order and strict-mode gating belong to the session engine.

use serde_json::Value;

use crate::error::JsonRpcError;
use crate::notification::JsonRpcNotification;
use crate::request::JsonRpcRequest;
use crate::response::{JsonRpcMessage, ResponseResult};
use crate::types::RequestId;

/// A single decoded JSON-RPC message (never a batch).
#[derive(Debug, Clone)]
pub enum Message {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
    Response(JsonRpcMessage),
}

impl Message {
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            Message::Request(r) => Some(&r.id),
            Message::Notification(_) => None,
            Message::Response(m) => m.id(),
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request(_))
    }
}

/// A parsed POST body: either one message or a batch of them.
#[derive(Debug, Clone)]
pub enum Envelope {
    Single(Message),
    Batch(Vec<Message>),
}

impl Envelope {
    /// All request IDs carried by this envelope (requests only, not responses).
    pub fn request_ids(&self) -> Vec<RequestId> {
        match self {
            Envelope::Single(Message::Request(r)) => vec![r.id.clone()],
            Envelope::Single(_) => vec![],
            Envelope::Batch(items) => items
                .iter()
                .filter_map(|m| match m {
                    Message::Request(r) => Some(r.id.clone()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// True if this envelope carries no requests at all (pure notifications,
    /// possibly mixed with responses, but no `method`+`id` element).
    pub fn has_no_requests(&self) -> bool {
        match self {
            Envelope::Single(m) => !m.is_request(),
            Envelope::Batch(items) => !items.iter().any(Message::is_request),
        }
    }

    pub fn messages(&self) -> &[Message] {
        match self {
            Envelope::Single(_) => std::slice::from_ref(match self {
                Envelope::Single(m) => m,
                _ => unreachable!(),
            }),
            Envelope::Batch(items) => items,
        }
    }
}

/// Classify and parse a single JSON-RPC object (decode order: response,
/// request, notification — matches §4.3.1's precedence after batch).
fn parse_message(value: Value) -> Result<Message, JsonRpcError> {
    let obj = value.as_object().ok_or_else(JsonRpcError::invalid_request_null)?;

    if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Err(JsonRpcError::invalid_request_null());
    }

    let has_result_or_error = obj.contains_key("result") || obj.contains_key("error");
    let has_method = obj.contains_key("method");
    let has_id = obj.contains_key("id") && !obj["id"].is_null();

    if has_result_or_error {
        let message: JsonRpcMessage =
            serde_json::from_value(value).map_err(|_| JsonRpcError::invalid_request_null())?;
        return Ok(Message::Response(message));
    }

    if has_method && has_id {
        let request: JsonRpcRequest =
            serde_json::from_value(value).map_err(|_| JsonRpcError::invalid_request_null())?;
        return Ok(Message::Request(request));
    }

    if has_method {
        let notification: JsonRpcNotification =
            serde_json::from_value(value).map_err(|_| JsonRpcError::invalid_request_null())?;
        return Ok(Message::Notification(notification));
    }

    Err(JsonRpcError::invalid_request_null())
}

/// Parse a raw HTTP body into an [`Envelope`].
///
/// Empty body and malformed JSON are parse errors (`-32700`); a body that
/// parses but has the wrong shape (neither object nor array, or an element
/// missing `jsonrpc:"2.0"`) is an invalid-request error (`-32600`), per
/// spec.md §4.2.2 step 3.
pub fn parse_envelope(body: &[u8]) -> Result<Envelope, JsonRpcError> {
    if body.is_empty() {
        return Err(JsonRpcError::parse_error());
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| JsonRpcError::parse_error())?;

    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(JsonRpcError::invalid_request_null());
            }
            let messages = items
                .into_iter()
                .map(parse_message)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Envelope::Batch(messages))
        }
        Value::Object(_) => Ok(Envelope::Single(parse_message(value)?)),
        _ => Err(JsonRpcError::invalid_request_null()),
    }
}

impl JsonRpcError {
    /// `invalid_request` with a `null` id — the shape used for HTTP-boundary
    /// parse/shape failures before any request ID is known.
    pub fn invalid_request_null() -> Self {
        JsonRpcError::invalid_request(None)
    }
}

impl JsonRpcMessage {
    pub fn success(id: RequestId, result: ResponseResult) -> Self {
        JsonRpcMessage::Response(JsonRpcResponse::new(id, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_single_request() {
        let body = json!({"jsonrpc":"2.0","id":1,"method":"ping"}).to_string();
        let env = parse_envelope(body.as_bytes()).unwrap();
        assert!(matches!(env, Envelope::Single(Message::Request(_))));
        assert_eq!(env.request_ids(), vec![RequestId::Number(1)]);
    }

    #[test]
    fn parses_notification() {
        let body = json!({"jsonrpc":"2.0","method":"notifications/initialized"}).to_string();
        let env = parse_envelope(body.as_bytes()).unwrap();
        assert!(env.has_no_requests());
    }

    #[test]
    fn parses_batch() {
        let body = json!([
            {"jsonrpc":"2.0","id":1,"method":"ping"},
            {"jsonrpc":"2.0","id":2,"method":"ping"}
        ])
        .to_string();
        let env = parse_envelope(body.as_bytes()).unwrap();
        assert_eq!(env.request_ids().len(), 2);
    }

    #[test]
    fn empty_body_is_parse_error() {
        let err = parse_envelope(b"").unwrap_err();
        assert_eq!(err.error.code, -32700);
    }

    #[test]
    fn empty_batch_is_invalid_request() {
        let err = parse_envelope(b"[]").unwrap_err();
        assert_eq!(err.error.code, -32600);
    }

    #[test]
    fn missing_jsonrpc_field_is_invalid_request() {
        let body = json!({"id":1,"method":"ping"}).to_string();
        let err = parse_envelope(body.as_bytes()).unwrap_err();
        assert_eq!(err.error.code, -32600);
    }
}
