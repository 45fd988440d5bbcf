//! `HttpTransport`: the request router spec.md §4.2 describes. Owns a
//! [`StreamManager`] plus the session-engine handles (`MessageSink`,
//! `SessionHost`) it hands decoded messages to and queries lifecycle state
//! from.

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{HeaderMap, Method, Request, Response, StatusCode};
use mcp_jsonrpc::envelope::{parse_envelope, Envelope, Message};
use mcp_jsonrpc::types::RequestId;
use mcp_protocol::McpVersion;
use serde_json::Value;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::error::TransportError;
use crate::message::{MessageMetadata, MessageSink, TransportMessage};
use crate::options::TransportOptions;
use crate::protocol::{
    extract_host, extract_last_event_id, extract_origin, extract_protocol_version,
    extract_session_id, parse_accept, AcceptMode,
};
use crate::session_host::SessionHost;
use crate::sse::format_priming_frame;
use crate::stream_manager::{JsonOutcome, StreamId, StreamManager, STANDALONE_STREAM_ID};

pub type ResponseBody = UnsyncBoxBody<Bytes, Infallible>;

pub struct HttpTransport {
    options: TransportOptions,
    streams: Arc<StreamManager>,
    sink: Arc<dyn MessageSink>,
    sessions: Arc<dyn SessionHost>,
}

impl HttpTransport {
    pub fn new(
        options: TransportOptions,
        sink: Arc<dyn MessageSink>,
        sessions: Arc<dyn SessionHost>,
    ) -> Self {
        Self {
            options,
            streams: Arc::new(StreamManager::new()),
            sink,
            sessions,
        }
    }

    pub fn stream_manager(&self) -> Arc<StreamManager> {
        Arc::clone(&self.streams)
    }

    pub async fn handle(&self, req: Request<Incoming>) -> Response<ResponseBody> {
        if let Err(err) = self.check_dns_rebinding(req.headers()) {
            return error_response(&err);
        }

        match *req.method() {
            Method::POST => self.handle_post(req).await,
            Method::GET => self.handle_get(req).await,
            Method::DELETE => self.handle_delete(req).await,
            _ => error_response(&TransportError::MethodNotAllowed {
                allow: "GET, POST, DELETE",
            }),
        }
    }

    fn check_dns_rebinding(&self, headers: &HeaderMap) -> Result<(), TransportError> {
        if !self.options.dns_rebinding.enabled {
            return Ok(());
        }
        match extract_host(headers) {
            Some(host) if self.options.dns_rebinding.host_allowed(host) => {}
            _ => return Err(TransportError::HostRejected),
        }
        if let Some(origin) = extract_origin(headers) {
            if !self.options.dns_rebinding.origin_allowed(origin) {
                return Err(TransportError::OriginRejected);
            }
        }
        Ok(())
    }

    /// spec.md §4.2.2.
    async fn handle_post(&self, req: Request<Incoming>) -> Response<ResponseBody> {
        let headers = req.headers().clone();

        let accept = parse_accept(&headers);
        let json_allowed = matches!(accept, AcceptMode::Both | AcceptMode::JsonOnly);
        let sse_allowed = matches!(accept, AcceptMode::Both | AcceptMode::SseOnly);
        if !json_allowed && !sse_allowed {
            return error_response(&TransportError::AcceptMismatch);
        }

        match headers.get(CONTENT_TYPE).and_then(|h| h.to_str().ok()) {
            Some(ct) if ct.starts_with("application/json") => {}
            _ => return error_response(&TransportError::UnsupportedContentType),
        }

        let body = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(_) => return error_response(&TransportError::InvalidRequest("failed to read body".into())),
        };

        let envelope = match parse_envelope(&body) {
            Ok(env) => env,
            Err(err) => return json_rpc_error_response(err),
        };

        let session_id = extract_session_id(&headers);
        let is_initialize = envelope
            .messages()
            .iter()
            .any(|m| matches!(m, Message::Request(r) if r.method == "initialize"));

        let negotiated_version = if is_initialize {
            match self.negotiate_initialize(&envelope, &headers) {
                Ok(v) => v,
                Err(err) => return error_response(&err),
            }
        } else {
            if let Err(err) = self.validate_non_initialize(session_id.as_deref()).await {
                return error_response(&err);
            }
            match extract_protocol_version(&headers)
                .or(self.sessions.negotiated_version(session_id.as_deref()).await)
            {
                Some(v) => v,
                None => McpVersion::LATEST,
            }
        };

        if negotiated_version.rejects_batches() && matches!(envelope, Envelope::Batch(_)) {
            return error_response(&TransportError::InvalidRequest(
                "batched requests are not supported at this protocol version".into(),
            ));
        }

        let session_id = if is_initialize && self.options.stateful {
            match self.sessions.create_session(negotiated_version).await {
                Some(id) if is_visible_ascii(&id) => Some(id),
                Some(_) | None => {
                    return error_response(&TransportError::SessionIdGenerationFailed);
                }
            }
        } else {
            session_id
        };

        if envelope.has_no_requests() {
            self.dispatch(&envelope, &session_id, STANDALONE_STREAM_ID, negotiated_version)
                .await;
            return accepted_response(session_id.as_deref(), negotiated_version);
        }

        let request_ids = envelope.request_ids();
        let stream_id: StreamId = format!("req:{}", request_ids_key(&request_ids));

        if !self.options.enable_json_response && sse_allowed {
            let priming = self.priming_frame(&stream_id).await;
            let rx = self
                .streams
                .open_sse_request_stream(stream_id.clone(), request_ids, priming)
                .await;
            self.dispatch(&envelope, &session_id, &stream_id, negotiated_version).await;
            return sse_response(rx, session_id.as_deref(), negotiated_version);
        }

        if !json_allowed {
            self.streams.close_stream(&stream_id).await;
            return error_response(&TransportError::AcceptMismatch);
        }

        let outcome_rx = self
            .streams
            .open_json_stream(stream_id.clone(), request_ids)
            .await;
        self.dispatch(&envelope, &session_id, &stream_id, negotiated_version).await;

        match outcome_rx.await {
            Ok(JsonOutcome::Responses(values)) => {
                json_response(values, session_id.as_deref(), negotiated_version)
            }
            Ok(JsonOutcome::Lost) | Err(_) => error_response(&TransportError::ResponseLost),
        }
    }

    fn negotiate_initialize(
        &self,
        envelope: &Envelope,
        headers: &HeaderMap,
    ) -> Result<McpVersion, TransportError> {
        if matches!(envelope, Envelope::Batch(_)) {
            return Err(TransportError::InvalidRequest(
                "initialize must not be batched".into(),
            ));
        }
        Ok(extract_protocol_version(headers).unwrap_or(McpVersion::LATEST))
    }

    async fn validate_non_initialize(&self, session_id: Option<&str>) -> Result<(), TransportError> {
        if !self.options.stateful {
            return Ok(());
        }
        if !self.sessions.is_initialized(session_id).await {
            return Err(TransportError::NotInitialized);
        }
        let Some(sid) = session_id else {
            return Err(TransportError::MissingSessionId);
        };
        if self.sessions.is_terminated(sid).await || !self.sessions.exists(sid).await {
            return Err(TransportError::UnknownSession);
        }
        Ok(())
    }

    async fn dispatch(
        &self,
        envelope: &Envelope,
        session_id: &Option<String>,
        stream_id: &str,
        protocol_version: McpVersion,
    ) {
        let data = match serde_json::to_vec(&envelope_as_value(envelope)) {
            Ok(bytes) => Bytes::from(bytes),
            Err(_) => return,
        };
        self.sink
            .accept(TransportMessage {
                data,
                metadata: MessageMetadata {
                    session_id: session_id.clone(),
                    stream_id: stream_id.to_string(),
                    request_ids: envelope.request_ids(),
                    protocol_version,
                },
            })
            .await;
    }

    async fn priming_frame(&self, stream_id: &str) -> Option<Bytes> {
        let store = self.options.event_store.as_ref()?;
        let event_id = store.store_event(stream_id, Value::Null).await.ok()?;
        Some(format_priming_frame(&event_id, self.options.retry_interval_ms))
    }

    /// spec.md §4.2.3.
    async fn handle_get(&self, req: Request<Incoming>) -> Response<ResponseBody> {
        let headers = req.headers().clone();

        if !matches!(parse_accept(&headers), AcceptMode::SseOnly | AcceptMode::Both) {
            return error_response(&TransportError::AcceptMismatch);
        }

        let session_id = extract_session_id(&headers);
        if let Err(err) = self.validate_non_initialize(session_id.as_deref()).await {
            return error_response(&err);
        }
        let session_id = session_id.expect("validated above");

        let protocol_version = extract_protocol_version(&headers)
            .or(self.sessions.negotiated_version(Some(&session_id)).await)
            .unwrap_or(McpVersion::LATEST);

        if let Some(last_event_id) = extract_last_event_id(&headers) {
            let Some(store) = self.options.event_store.as_ref() else {
                return error_response(&TransportError::InvalidRequest(
                    "resumption requires an event store".into(),
                ));
            };
            let mut replayed = Vec::new();
            let stream_id = match store
                .replay_events_after(&last_event_id, &mut |event| replayed.push(event))
                .await
            {
                Ok(stream_id) => stream_id,
                Err(_) => {
                    return error_response(&TransportError::InvalidRequest(
                        "unknown Last-Event-Id".into(),
                    ))
                }
            };
            let rx = match self.streams.reopen_stream(stream_id.clone(), None).await {
                Ok(rx) => rx,
                Err(err) => return error_response(&err),
            };
            self.streams.deliver_replayed(&stream_id, replayed).await;
            return sse_response(rx, Some(&session_id), protocol_version);
        }

        let priming = self.priming_frame(STANDALONE_STREAM_ID).await;
        match self.streams.open_standalone_stream(&session_id, priming).await {
            Ok(rx) => sse_response(rx, Some(&session_id), protocol_version),
            Err(err) => error_response(&err),
        }
    }

    /// spec.md §4.2.4.
    async fn handle_delete(&self, req: Request<Incoming>) -> Response<ResponseBody> {
        let headers = req.headers().clone();
        if !self.options.stateful {
            return error_response(&TransportError::MethodNotAllowed {
                allow: "GET, POST",
            });
        }
        let Some(session_id) = extract_session_id(&headers) else {
            return error_response(&TransportError::MissingSessionId);
        };
        if !self.sessions.exists(&session_id).await {
            return error_response(&TransportError::UnknownSession);
        }
        self.streams.close_session(&session_id).await;
        self.sessions.on_session_closed(&session_id).await;
        Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(empty_body())
            .expect("static response is well-formed")
    }
}

fn is_visible_ascii(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| (0x21..=0x7E).contains(&b))
}

fn request_ids_key(ids: &[RequestId]) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    for id in ids {
        let _ = write!(out, "{id:?}-");
    }
    out.push_str(&uuid::Uuid::now_v7().simple().to_string());
    out
}

fn envelope_as_value(envelope: &Envelope) -> Value {
    match envelope {
        Envelope::Single(m) => message_as_value(m),
        Envelope::Batch(items) => Value::Array(items.iter().map(message_as_value).collect()),
    }
}

fn message_as_value(message: &Message) -> Value {
    match message {
        Message::Request(r) => serde_json::to_value(r).unwrap_or(Value::Null),
        Message::Notification(n) => serde_json::to_value(n).unwrap_or(Value::Null),
        Message::Response(m) => serde_json::to_value(m).unwrap_or(Value::Null),
    }
}

fn empty_body() -> ResponseBody {
    Full::new(Bytes::new()).map_err(|never: Infallible| match never {}).boxed_unsync()
}

fn with_session_header(builder: http::response::Builder, session_id: Option<&str>) -> http::response::Builder {
    match session_id {
        Some(id) => builder.header("Mcp-Session-Id", id),
        None => builder,
    }
}

fn accepted_response(session_id: Option<&str>, version: McpVersion) -> Response<ResponseBody> {
    let builder = with_session_header(Response::builder(), session_id)
        .status(StatusCode::ACCEPTED)
        .header("MCP-Protocol-Version", version.as_str());
    builder.body(empty_body()).expect("static response is well-formed")
}

fn json_response(values: Vec<Value>, session_id: Option<&str>, version: McpVersion) -> Response<ResponseBody> {
    let payload = if values.len() == 1 {
        values.into_iter().next().unwrap()
    } else {
        Value::Array(values)
    };
    let body = serde_json::to_vec(&payload).unwrap_or_default();
    let builder = with_session_header(Response::builder(), session_id)
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .header("MCP-Protocol-Version", version.as_str());
    builder
        .body(Full::new(Bytes::from(body)).map_err(|never: Infallible| match never {}).boxed_unsync())
        .expect("static response is well-formed")
}

fn sse_response(
    rx: tokio::sync::mpsc::UnboundedReceiver<Bytes>,
    session_id: Option<&str>,
    version: McpVersion,
) -> Response<ResponseBody> {
    let stream = UnboundedReceiverStream::new(rx)
        .map(|bytes| Ok::<_, Infallible>(http_body::Frame::data(bytes)));
    let body = StreamBody::new(stream).boxed_unsync();
    let builder = with_session_header(Response::builder(), session_id)
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/event-stream")
        .header("Cache-Control", "no-cache, no-transform")
        .header("MCP-Protocol-Version", version.as_str());
    builder.body(body).expect("static response is well-formed")
}

fn error_response(err: &TransportError) -> Response<ResponseBody> {
    let envelope = err.to_envelope();
    let body = serde_json::to_vec(&envelope).unwrap_or_default();
    let mut builder = Response::builder()
        .status(err.status())
        .header(CONTENT_TYPE, "application/json");
    if let Some(allow) = err.allow_header() {
        builder = builder.header(hyper::header::ALLOW, HeaderValue::from_static(allow));
    }
    builder
        .body(Full::new(Bytes::from(body)).map_err(|never: Infallible| match never {}).boxed_unsync())
        .expect("static response is well-formed")
}

fn json_rpc_error_response(err: mcp_jsonrpc::JsonRpcError) -> Response<ResponseBody> {
    debug!("rejecting malformed POST body: {err}");
    let body = serde_json::to_vec(&err).unwrap_or_default();
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)).map_err(|never: Infallible| match never {}).boxed_unsync())
        .expect("static response is well-formed")
}
