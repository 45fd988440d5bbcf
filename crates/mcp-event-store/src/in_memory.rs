//! In-memory `EventStore`: bounded per-stream event log behind `RwLock`-guarded
//! maps. Suitable for a single-process server; nothing here persists across
//! restarts.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::traits::{EventStore, EventStoreError, EventStoreResult};
use crate::types::{EventId, StoredEvent};

#[derive(Debug, Clone)]
pub struct InMemoryEventStoreConfig {
    /// Per-stream cap; the oldest event is evicted once a stream exceeds this.
    pub max_events_per_stream: usize,
}

impl Default for InMemoryEventStoreConfig {
    fn default() -> Self {
        Self {
            max_events_per_stream: 1_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryEventStore {
    streams: Arc<RwLock<HashMap<String, Vec<StoredEvent>>>>,
    index: Arc<RwLock<HashMap<EventId, String>>>,
    config: InMemoryEventStoreConfig,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::with_config(InMemoryEventStoreConfig::default())
    }

    pub fn with_config(config: InMemoryEventStoreConfig) -> Self {
        Self {
            streams: Arc::new(RwLock::new(HashMap::new())),
            index: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    fn fresh_event_id(stream_id: &str) -> EventId {
        let timestamp_ms = chrono::Utc::now().timestamp_millis() as u64;
        let random_hex = Uuid::new_v4().simple().to_string();
        EventId::new(stream_id, timestamp_ms, &random_hex[..8])
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn store_event(&self, stream_id: &str, payload: Value) -> EventStoreResult<EventId> {
        let event_id = Self::fresh_event_id(stream_id);
        let event = StoredEvent {
            event_id: event_id.clone(),
            stream_id: stream_id.to_string(),
            payload,
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
        };

        let mut streams = self.streams.write().await;
        let mut index = self.index.write().await;

        let events = streams.entry(stream_id.to_string()).or_default();
        events.push(event);
        index.insert(event_id.clone(), stream_id.to_string());

        if events.len() > self.config.max_events_per_stream {
            let evicted = events.remove(0);
            index.remove(&evicted.event_id);
            debug!(stream_id, event_id = %evicted.event_id, "evicted oldest event");
        }

        Ok(event_id)
    }

    async fn stream_id_for_event_id(&self, event_id: &EventId) -> Option<String> {
        if let Some(stream_id) = self.index.read().await.get(event_id).cloned() {
            return Some(stream_id);
        }
        event_id.stream_id_hint().map(|s| s.to_string())
    }

    async fn replay_events_after(
        &self,
        event_id: &EventId,
        emit: &mut (dyn FnMut(StoredEvent) + Send),
    ) -> EventStoreResult<String> {
        let stream_id = self
            .index
            .read()
            .await
            .get(event_id)
            .cloned()
            .ok_or_else(|| EventStoreError::EventNotFound(event_id.to_string()))?;

        let streams = self.streams.read().await;
        let events = streams
            .get(&stream_id)
            .ok_or_else(|| EventStoreError::StreamNotFound(stream_id.clone()))?;

        let position = events
            .iter()
            .position(|e| &e.event_id == event_id)
            .ok_or_else(|| EventStoreError::EventNotFound(event_id.to_string()))?;

        for event in &events[position + 1..] {
            if !event.is_priming() {
                emit(event.clone());
            }
        }

        Ok(stream_id)
    }

    async fn remove_events(&self, stream_id: &str) -> EventStoreResult<u64> {
        let mut streams = self.streams.write().await;
        let mut index = self.index.write().await;

        match streams.remove(stream_id) {
            Some(events) => {
                for event in &events {
                    index.remove(&event.event_id);
                }
                Ok(events.len() as u64)
            }
            None => Ok(0),
        }
    }

    async fn clean_up(&self, older_than: Duration) -> EventStoreResult<u64> {
        let cutoff = chrono::Utc::now().timestamp_millis() as u64 - older_than.as_millis() as u64;
        let mut streams = self.streams.write().await;
        let mut index = self.index.write().await;
        let mut removed = 0u64;

        for events in streams.values_mut() {
            let keep_from = events.partition_point(|e| e.timestamp < cutoff);
            for event in &events[..keep_from] {
                index.remove(&event.event_id);
            }
            removed += keep_from as u64;
            events.drain(0..keep_from);
        }

        Ok(removed)
    }

    async fn clear(&self) -> EventStoreResult<()> {
        self.streams.write().await.clear();
        self.index.write().await.clear();
        Ok(())
    }
}
