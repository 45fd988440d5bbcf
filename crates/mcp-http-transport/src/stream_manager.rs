//! Stream multiplexing and response routing — spec.md §4.2.7.
//!
//! Owns the maps a Transport exclusively owns: `streamId → stream`,
//! `requestId → streamId`, and which session (if any) currently has the
//! standalone stream open. A stream is either a one-shot JSON response
//! channel or a live SSE byte sender; both track which request IDs they
//! still owe a response.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bytes::Bytes;
use mcp_event_store::{EventStore, StoredEvent};
use mcp_jsonrpc::types::RequestId;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::warn;

use crate::error::TransportError;
use crate::sse::format_message_frame;

pub type StreamId = String;

pub const STANDALONE_STREAM_ID: &str = "_GET_stream";

/// Outcome delivered to a JSON-mode POST once every request ID on its stream
/// has a response, or the transport shuts down first.
#[derive(Debug)]
pub enum JsonOutcome {
    Responses(Vec<Value>),
    Lost,
}

struct JsonChannel {
    expected: Vec<RequestId>,
    collected: HashMap<RequestId, Value>,
    completion: Option<oneshot::Sender<JsonOutcome>>,
}

struct SseChannel {
    expected: HashSet<RequestId>,
    answered: HashSet<RequestId>,
    sender: mpsc::UnboundedSender<Bytes>,
    /// Standalone streams never close on their own; request streams close once
    /// every expected request ID has answered.
    is_standalone: bool,
}

enum ResponseMode {
    Json(JsonChannel),
    Sse(SseChannel),
}

#[derive(Default)]
pub struct StreamManager {
    streams: RwLock<HashMap<StreamId, ResponseMode>>,
    request_index: RwLock<HashMap<RequestId, StreamId>>,
    standalone_by_session: RwLock<HashMap<String, StreamId>>,
}

impl StreamManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open_json_stream(
        &self,
        stream_id: StreamId,
        request_ids: Vec<RequestId>,
    ) -> oneshot::Receiver<JsonOutcome> {
        let (tx, rx) = oneshot::channel();
        {
            let mut index = self.request_index.write().await;
            for id in &request_ids {
                index.insert(id.clone(), stream_id.clone());
            }
        }
        self.streams.write().await.insert(
            stream_id,
            ResponseMode::Json(JsonChannel {
                expected: request_ids,
                collected: HashMap::new(),
                completion: Some(tx),
            }),
        );
        rx
    }

    pub async fn open_sse_request_stream(
        &self,
        stream_id: StreamId,
        request_ids: Vec<RequestId>,
        priming: Option<Bytes>,
    ) -> mpsc::UnboundedReceiver<Bytes> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(frame) = priming {
            let _ = tx.send(frame);
        }
        {
            let mut index = self.request_index.write().await;
            for id in &request_ids {
                index.insert(id.clone(), stream_id.clone());
            }
        }
        self.streams.write().await.insert(
            stream_id,
            ResponseMode::Sse(SseChannel {
                expected: request_ids.into_iter().collect(),
                answered: HashSet::new(),
                sender: tx,
                is_standalone: false,
            }),
        );
        rx
    }

    /// Opens the at-most-one-per-session standalone stream. 409s if one is
    /// already attached for this session.
    pub async fn open_standalone_stream(
        &self,
        session_id: &str,
        priming: Option<Bytes>,
    ) -> Result<mpsc::UnboundedReceiver<Bytes>, TransportError> {
        let mut standalone = self.standalone_by_session.write().await;
        if standalone.contains_key(session_id) {
            return Err(TransportError::StreamConflict);
        }
        let stream_id = format!("{STANDALONE_STREAM_ID}:{session_id}");
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(frame) = priming {
            let _ = tx.send(frame);
        }
        self.streams.write().await.insert(
            stream_id.clone(),
            ResponseMode::Sse(SseChannel {
                expected: HashSet::new(),
                answered: HashSet::new(),
                sender: tx,
                is_standalone: true,
            }),
        );
        standalone.insert(session_id.to_string(), stream_id);
        Ok(rx)
    }

    pub async fn standalone_stream_id(&self, session_id: &str) -> Option<StreamId> {
        self.standalone_by_session.read().await.get(session_id).cloned()
    }

    pub async fn has_standalone_stream(&self, session_id: &str) -> bool {
        self.standalone_by_session.read().await.contains_key(session_id)
    }

    /// Resolves the stream currently holding `event_id`'s stream, then opens
    /// a fresh SSE receiver re-registered under the same stream ID. Used when
    /// a GET resumes via `Last-Event-Id`.
    pub async fn reopen_stream(
        &self,
        stream_id: StreamId,
        priming: Option<Bytes>,
    ) -> Result<mpsc::UnboundedReceiver<Bytes>, TransportError> {
        if self.streams.read().await.contains_key(&stream_id) {
            return Err(TransportError::StreamConflict);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(frame) = priming {
            let _ = tx.send(frame);
        }
        self.streams.write().await.insert(
            stream_id,
            ResponseMode::Sse(SseChannel {
                expected: HashSet::new(),
                answered: HashSet::new(),
                sender: tx,
                is_standalone: true,
            }),
        );
        Ok(rx)
    }

    /// Writes replayed events directly onto the SSE channel already reopened
    /// under `stream_id`, bypassing request/session routing — used only for
    /// `Last-Event-Id` resumption where the stream identity is already known.
    pub async fn deliver_replayed(&self, stream_id: &str, events: Vec<StoredEvent>) {
        let streams = self.streams.read().await;
        let Some(ResponseMode::Sse(channel)) = streams.get(stream_id) else {
            warn!("reopened stream {stream_id} vanished before replay could be delivered");
            return;
        };
        for event in events {
            let frame = format_message_frame(Some(&event.event_id), &event.payload);
            let _ = channel.sender.send(frame);
        }
    }

    /// spec.md §4.2.7: route `payload` to the stream owning its request ID,
    /// or to the session's standalone stream if it carries none.
    pub async fn send(
        &self,
        payload: Value,
        related_request_id: Option<RequestId>,
        session_id: Option<&str>,
        event_store: Option<&Arc<dyn EventStore>>,
    ) -> Result<(), TransportError> {
        let request_id = related_request_id.or_else(|| response_id(&payload));

        let stream_id = match &request_id {
            Some(id) => self.request_index.read().await.get(id).cloned(),
            None => match session_id {
                Some(sid) => self.standalone_stream_id(sid).await,
                None => None,
            },
        };

        let Some(stream_id) = stream_id else {
            warn!("no stream found for outgoing message; dropping");
            return Ok(());
        };

        let is_response = request_id.is_some() && (payload.get("result").is_some() || payload.get("error").is_some());

        let mut finished_stream = None;
        {
            let mut streams = self.streams.write().await;
            match streams.get_mut(&stream_id) {
                Some(ResponseMode::Json(channel)) => {
                    let Some(id) = request_id.clone() else {
                        warn!("JSON-mode stream received a payload with no request id");
                        return Ok(());
                    };
                    channel.collected.insert(id, payload);
                    if channel.collected.len() == channel.expected.len() {
                        let ordered = channel
                            .expected
                            .iter()
                            .filter_map(|id| channel.collected.get(id).cloned())
                            .collect();
                        if let Some(tx) = channel.completion.take() {
                            let _ = tx.send(JsonOutcome::Responses(ordered));
                        }
                        finished_stream = Some(stream_id.clone());
                    }
                }
                Some(ResponseMode::Sse(channel)) => {
                    let event_id = match event_store {
                        Some(store) => Some(
                            store
                                .store_event(&stream_id, payload.clone())
                                .await
                                .map_err(|_| TransportError::InvalidRequest("event store failure".into()))?,
                        ),
                        None => None,
                    };
                    let frame = format_message_frame(event_id.as_ref(), &payload);
                    let _ = channel.sender.send(frame);

                    if is_response {
                        if let Some(id) = &request_id {
                            channel.answered.insert(id.clone());
                        }
                        if !channel.is_standalone && channel.answered == channel.expected {
                            finished_stream = Some(stream_id.clone());
                        }
                    }
                }
                None => {}
            }
        }

        if let Some(stream_id) = finished_stream {
            self.close_stream(&stream_id).await;
        }

        Ok(())
    }

    /// Finish a stream: drop its sender/completion and scrub it from both
    /// indices. Used on natural completion, transport disconnect, and DELETE.
    pub async fn close_stream(&self, stream_id: &str) {
        let removed = self.streams.write().await.remove(stream_id);
        if let Some(mode) = removed {
            let request_ids: Vec<RequestId> = match mode {
                ResponseMode::Json(c) => c.expected,
                ResponseMode::Sse(c) => c.expected.into_iter().collect(),
            };
            let mut index = self.request_index.write().await;
            for id in request_ids {
                index.remove(&id);
            }
        }
        self.standalone_by_session
            .write()
            .await
            .retain(|_, sid| sid != stream_id);
    }

    /// DELETE: finish every stream belonging to this session, surfacing 503
    /// to any still-pending JSON waiters.
    pub async fn close_session(&self, session_id: &str) {
        if let Some(stream_id) = self.standalone_by_session.write().await.remove(session_id) {
            if let Some(ResponseMode::Sse(_)) = self.streams.write().await.remove(&stream_id) {}
        }
    }

    /// Surfaces 503 to a JSON-mode waiter whose transport is shutting down
    /// before completion.
    pub async fn abandon_stream(&self, stream_id: &str) {
        if let Some(ResponseMode::Json(mut channel)) = self.streams.write().await.remove(stream_id) {
            if let Some(tx) = channel.completion.take() {
                let _ = tx.send(JsonOutcome::Lost);
            }
        }
    }
}

fn response_id(payload: &Value) -> Option<RequestId> {
    if payload.get("result").is_none() && payload.get("error").is_none() {
        return None;
    }
    serde_json::from_value(payload.get("id")?.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn json_stream_completes_once_every_request_id_answers() {
        let manager = StreamManager::new();
        let ids = vec![RequestId::Number(1), RequestId::Number(2)];
        let mut rx = manager.open_json_stream("s1".to_string(), ids.clone()).await;

        manager
            .send(json!({"jsonrpc":"2.0","id":1,"result":{}}), None, None, None)
            .await
            .unwrap();
        assert!(rx.try_recv().is_err());

        manager
            .send(json!({"jsonrpc":"2.0","id":2,"result":{}}), None, None, None)
            .await
            .unwrap();

        match rx.try_recv().unwrap() {
            JsonOutcome::Responses(v) => assert_eq!(v.len(), 2),
            JsonOutcome::Lost => panic!("expected responses"),
        }
    }

    #[tokio::test]
    async fn sse_request_stream_closes_after_all_requests_answered() {
        let manager = StreamManager::new();
        let ids = vec![RequestId::Number(1)];
        let mut rx = manager
            .open_sse_request_stream("s1".to_string(), ids, None)
            .await;

        manager
            .send(json!({"jsonrpc":"2.0","id":1,"result":{}}), None, None, None)
            .await
            .unwrap();

        let frame = rx.recv().await.unwrap();
        assert!(String::from_utf8(frame.to_vec()).unwrap().contains("event: message"));
        assert!(manager.streams.read().await.get("s1").is_none());
    }

    #[tokio::test]
    async fn standalone_stream_is_one_per_session() {
        let manager = StreamManager::new();
        let _rx = manager.open_standalone_stream("sess-1", None).await.unwrap();
        let err = manager.open_standalone_stream("sess-1", None).await.unwrap_err();
        assert!(matches!(err, TransportError::StreamConflict));
    }

    #[tokio::test]
    async fn standalone_notification_routes_by_session_not_request_id() {
        let manager = StreamManager::new();
        let mut rx = manager.open_standalone_stream("sess-1", None).await.unwrap();

        manager
            .send(json!({"jsonrpc":"2.0","method":"notifications/message"}), None, Some("sess-1"), None)
            .await
            .unwrap();

        let frame = rx.recv().await.unwrap();
        assert!(String::from_utf8(frame.to_vec()).unwrap().contains("notifications/message"));
    }

    #[tokio::test]
    async fn abandon_stream_surfaces_lost_outcome() {
        let manager = StreamManager::new();
        let mut rx = manager
            .open_json_stream("s1".to_string(), vec![RequestId::Number(1)])
            .await;
        manager.abandon_stream("s1").await;
        match rx.try_recv().unwrap() {
            JsonOutcome::Lost => {}
            JsonOutcome::Responses(_) => panic!("expected Lost"),
        }
    }
}
