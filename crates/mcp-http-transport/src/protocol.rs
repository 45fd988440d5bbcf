//! Header extraction for the Streamable HTTP transport.

use hyper::HeaderMap;
use mcp_event_store::EventId;
use mcp_protocol::McpVersion;

/// Extracts `MCP-Protocol-Version`. Absent or unparseable is `None` — callers
/// fall back to the session's already-negotiated version per spec.md §4.2.6.
pub fn extract_protocol_version(headers: &HeaderMap) -> Option<McpVersion> {
    headers
        .get("MCP-Protocol-Version")
        .and_then(|h| h.to_str().ok())
        .and_then(McpVersion::parse_version)
}

pub fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Mcp-Session-Id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// `Last-Event-Id` is an opaque event identifier, not a number — see
/// `mcp_event_store::EventId`.
pub fn extract_last_event_id(headers: &HeaderMap) -> Option<EventId> {
    headers
        .get("Last-Event-Id")
        .or_else(|| headers.get("Last-Event-ID"))
        .and_then(|h| h.to_str().ok())
        .map(|s| EventId(s.to_string()))
}

pub fn extract_host(headers: &HeaderMap) -> Option<&str> {
    headers.get(hyper::header::HOST).and_then(|h| h.to_str().ok())
}

pub fn extract_origin(headers: &HeaderMap) -> Option<&str> {
    headers.get(hyper::header::ORIGIN).and_then(|h| h.to_str().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptMode {
    /// Accepts both `application/json` and `text/event-stream`.
    Both,
    /// Accepts only `application/json`.
    JsonOnly,
    /// Accepts only `text/event-stream`.
    SseOnly,
    /// Neither accepted media type is present.
    Unsupported,
}

pub fn parse_accept(headers: &HeaderMap) -> AcceptMode {
    let accept = headers
        .get(hyper::header::ACCEPT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let json = accept.contains("application/json") || accept.contains("*/*");
    let sse = accept.contains("text/event-stream");

    match (json, sse) {
        (true, true) => AcceptMode::Both,
        (true, false) => AcceptMode::JsonOnly,
        (false, true) => AcceptMode::SseOnly,
        (false, false) => AcceptMode::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (k, v) in pairs {
            headers.insert(
                hyper::header::HeaderName::from_bytes(k.as_bytes()).unwrap(),
                v.parse().unwrap(),
            );
        }
        headers
    }

    #[test]
    fn extracts_protocol_version() {
        let headers = headers_with(&[("MCP-Protocol-Version", "2025-11-25")]);
        assert_eq!(extract_protocol_version(&headers), Some(McpVersion::V2025_11_25));
    }

    #[test]
    fn missing_protocol_version_is_none() {
        assert_eq!(extract_protocol_version(&HeaderMap::new()), None);
    }

    #[test]
    fn extracts_session_id_and_last_event_id() {
        let headers = headers_with(&[
            ("Mcp-Session-Id", "sess-123"),
            ("Last-Event-Id", "s1_100_abcd"),
        ]);
        assert_eq!(extract_session_id(&headers), Some("sess-123".to_string()));
        assert_eq!(
            extract_last_event_id(&headers),
            Some(EventId("s1_100_abcd".to_string()))
        );
    }

    #[test]
    fn accept_header_modes() {
        assert_eq!(
            parse_accept(&headers_with(&[("accept", "application/json, text/event-stream")])),
            AcceptMode::Both
        );
        assert_eq!(
            parse_accept(&headers_with(&[("accept", "application/json")])),
            AcceptMode::JsonOnly
        );
        assert_eq!(
            parse_accept(&headers_with(&[("accept", "text/event-stream")])),
            AcceptMode::SseOnly
        );
        assert_eq!(
            parse_accept(&headers_with(&[("accept", "text/plain")])),
            AcceptMode::Unsupported
        );
    }
}
