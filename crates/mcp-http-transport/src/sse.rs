//! SSE frame formatting.
//!
//! Event type is always `message`. A message frame carries an optional `id:`
//! line, the fixed `event: message` line, a single `data:` line, and a
//! terminating blank line. A priming frame carries only `id:` and an optional
//! `retry:`, with an empty `data:` line — it exists only to let the client
//! remember a resumable event ID, never to deliver a payload.

use bytes::Bytes;
use mcp_event_store::EventId;
use serde_json::Value;

pub fn format_message_frame(event_id: Option<&EventId>, payload: &Value) -> Bytes {
    let mut out = String::new();
    if let Some(id) = event_id {
        out.push_str("id: ");
        out.push_str(id.as_str());
        out.push('\n');
    }
    out.push_str("event: message\n");
    out.push_str("data: ");
    out.push_str(&serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string()));
    out.push_str("\n\n");
    Bytes::from(out)
}

pub fn format_priming_frame(event_id: &EventId, retry_interval_ms: Option<u64>) -> Bytes {
    let mut out = String::new();
    out.push_str("id: ");
    out.push_str(event_id.as_str());
    out.push('\n');
    if let Some(retry) = retry_interval_ms {
        out.push_str("retry: ");
        out.push_str(&retry.to_string());
        out.push('\n');
    }
    out.push_str("data: \n\n");
    Bytes::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_frame_has_id_event_and_data_lines() {
        let id = EventId::new("s1", 1, "abc");
        let frame = format_message_frame(Some(&id), &json!({"jsonrpc":"2.0","id":1,"result":{}}));
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.starts_with("id: s1_1_abc\n"));
        assert!(text.contains("event: message\n"));
        assert!(text.contains("data: {\"id\":1"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn message_frame_without_id_omits_id_line() {
        let frame = format_message_frame(None, &json!({"ok": true}));
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(!text.contains("id:"));
        assert!(text.starts_with("event: message\n"));
    }

    #[test]
    fn priming_frame_carries_only_id_and_retry() {
        let id = EventId::new("_GET_stream", 1, "a1");
        let frame = format_priming_frame(&id, Some(2000));
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.contains("id: _GET_stream_1_a1\n"));
        assert!(text.contains("retry: 2000\n"));
        assert!(text.contains("data: \n"));
        assert!(!text.contains("event:"));
    }

    #[test]
    fn priming_frame_without_retry_omits_retry_line() {
        let id = EventId::new("s1", 1, "a1");
        let frame = format_priming_frame(&id, None);
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(!text.contains("retry:"));
    }
}
