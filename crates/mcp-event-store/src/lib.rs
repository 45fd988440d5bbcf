//! Per-stream ordered event log backing Streamable HTTP resumability.
//!
//! A [`mcp_event_store::traits::EventStore`] assigns each stream (a POST's
//! request stream, or the single standalone `_GET_stream` per session) an
//! append-only, bounded event log keyed by opaque [`EventId`]s. Reconnecting
//! clients send back the last event ID they saw in a `Last-Event-ID` header;
//! [`EventStore::replay_events_after`] replays everything they missed.

pub mod in_memory;
pub mod traits;
pub mod types;

pub use in_memory::{InMemoryEventStore, InMemoryEventStoreConfig};
pub use traits::{EventStore, EventStoreError, EventStoreResult};
pub use types::{EventId, StoredEvent};
