//! Wire-adjacent types for the event log: opaque event IDs and the events
//! they identify.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque event identifier. Embeds its stream ID so a store restarted from a
/// cold index can still recover which stream an ID belongs to, but callers
/// must never parse it themselves — use [`EventId::stream_id_hint`] only as a
/// fallback when the store's own index has nothing for it.
///
/// Shape: `{streamId}_{timestampMs}_{randomHex}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(stream_id: &str, timestamp_ms: u64, random_hex: &str) -> Self {
        Self(format!("{stream_id}_{timestamp_ms}_{random_hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort extraction of the stream ID embedded in the event ID's own
    /// text. Only meant as a fallback when the ID→stream index doesn't have
    /// an entry (e.g. after a process restart with no persisted index) —
    /// a live store should always prefer its index.
    pub fn stream_id_hint(&self) -> Option<&str> {
        let (prefix, _) = self.0.rsplit_once('_')?;
        let (stream_id, _) = prefix.rsplit_once('_')?;
        Some(stream_id)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event stored on a stream. A payload of `Value::Null` marks a *priming
/// event*: written only to seed a resumable ID at stream open, never replayed
/// as a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    pub event_id: EventId,
    pub stream_id: String,
    pub payload: Value,
    pub timestamp: u64,
}

impl StoredEvent {
    /// True for a priming event — an empty-payload placeholder, not a real message.
    pub fn is_priming(&self) -> bool {
        self.payload.is_null()
    }
}
