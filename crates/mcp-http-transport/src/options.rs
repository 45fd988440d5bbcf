//! Transport configuration — spec.md §4.2 and §6.

use std::sync::Arc;

use mcp_event_store::EventStore;

use crate::rebinding::DnsRebindingSettings;

#[derive(Clone)]
pub struct TransportOptions {
    /// `enableJsonResponse`: single JSON response instead of SSE for POSTs
    /// that carry requests.
    pub enable_json_response: bool,
    /// Presence enables resumability and priming events.
    pub event_store: Option<Arc<dyn EventStore>>,
    /// Echoed in the priming `retry:` field.
    pub retry_interval_ms: Option<u64>,
    pub dns_rebinding: DnsRebindingSettings,
    /// Absence of a session ID generator selects stateless mode; stateful
    /// mode is selected by the session engine assigning one via
    /// `SessionHost::create_session`, so this flag alone gates whether the
    /// transport looks for an `Mcp-Session-Id` header at all.
    pub stateful: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            enable_json_response: false,
            event_store: None,
            retry_interval_ms: None,
            dns_rebinding: DnsRebindingSettings::default(),
            stateful: true,
        }
    }
}
