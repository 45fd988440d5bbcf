//! The `EventStore` contract: per-stream ordered event log with eviction and
//! replay, keyed by opaque event IDs that survive client reconnects.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::types::{EventId, StoredEvent};

#[derive(Debug, thiserror::Error)]
pub enum EventStoreError {
    #[error("event not found: {0}")]
    EventNotFound(String),
    #[error("stream not found: {0}")]
    StreamNotFound(String),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type EventStoreResult<T> = Result<T, EventStoreError>;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Assign a fresh event ID, append `payload` to `stream_id`, and insert
    /// into the ID→stream index. Evicts the oldest event on the stream once
    /// it holds `max_events_per_stream` events. Never replays.
    async fn store_event(&self, stream_id: &str, payload: Value) -> EventStoreResult<EventId>;

    /// O(1) index lookup for the stream an event ID belongs to.
    async fn stream_id_for_event_id(&self, event_id: &EventId) -> Option<String>;

    /// Locate `event_id`; if absent, fail with `EventNotFound`. Otherwise
    /// invoke `emit` once per event stored after it on the same stream, in
    /// insertion order, skipping priming events. Returns the stream ID.
    async fn replay_events_after(
        &self,
        event_id: &EventId,
        emit: &mut (dyn FnMut(StoredEvent) + Send),
    ) -> EventStoreResult<String>;

    /// Drop every event on `stream_id`, along with their index entries.
    async fn remove_events(&self, stream_id: &str) -> EventStoreResult<u64>;

    /// Drop events older than `older_than` across all streams.
    async fn clean_up(&self, older_than: Duration) -> EventStoreResult<u64>;

    /// Drop every event across every stream.
    async fn clear(&self) -> EventStoreResult<()>;
}
