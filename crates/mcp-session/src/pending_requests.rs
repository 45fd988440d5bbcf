//! The `pendingRequests` table behind `sendRequest` (spec.md §4.3.5): server
//! mints a request ID from a monotonic counter, parks a resolver, and resolves
//! it when a matching response arrives — after the [`crate::response_router`]
//! chain has had first refusal.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use mcp_jsonrpc::{JsonRpcErrorObject, RequestId};
use serde_json::Value;
use tokio::sync::{oneshot, Mutex};

pub type PendingResult = Result<Value, JsonRpcErrorObject>;

#[derive(Default)]
pub struct PendingRequests {
    next_id: AtomicI64,
    waiting: Mutex<HashMap<RequestId, oneshot::Sender<PendingResult>>>,
}

impl PendingRequests {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mints a fresh server-allocated ID and registers a waiter for it.
    pub async fn register(&self) -> (RequestId, oneshot::Receiver<PendingResult>) {
        let id = RequestId::Number(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = oneshot::channel();
        self.waiting.lock().await.insert(id.clone(), tx);
        (id, rx)
    }

    /// Resolves a waiter with a success result. Returns `true` if a waiter
    /// was actually registered under this ID.
    pub async fn resolve(&self, id: &RequestId, result: Value) -> bool {
        if let Some(tx) = self.waiting.lock().await.remove(id) {
            let _ = tx.send(Ok(result));
            true
        } else {
            false
        }
    }

    pub async fn reject(&self, id: &RequestId, error: JsonRpcErrorObject) -> bool {
        if let Some(tx) = self.waiting.lock().await.remove(id) {
            let _ = tx.send(Err(error));
            true
        } else {
            false
        }
    }

    /// Fails every outstanding waiter — used on session shutdown.
    pub async fn fail_all(&self, error: JsonRpcErrorObject) {
        let mut waiting = self.waiting.lock().await;
        for (_, tx) in waiting.drain() {
            let _ = tx.send(Err(error.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_delivers_result_to_waiter() {
        let pending = PendingRequests::new();
        let (id, rx) = pending.register().await;
        assert!(pending.resolve(&id, serde_json::json!({"ok": true})).await);
        let result = rx.await.unwrap().unwrap();
        assert_eq!(result, serde_json::json!({"ok": true}));
    }

    #[tokio::test]
    async fn resolve_unknown_id_returns_false() {
        let pending = PendingRequests::new();
        assert!(!pending.resolve(&RequestId::Number(99), serde_json::json!(null)).await);
    }

    #[tokio::test]
    async fn successive_registrations_mint_distinct_ids() {
        let pending = PendingRequests::new();
        let (a, _) = pending.register().await;
        let (b, _) = pending.register().await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn fail_all_resolves_every_waiter_with_an_error() {
        let pending = PendingRequests::new();
        let (_id1, rx1) = pending.register().await;
        let (_id2, rx2) = pending.register().await;
        pending.fail_all(JsonRpcErrorObject::internal_error(Some("shutdown".into()))).await;
        assert!(rx1.await.unwrap().is_err());
        assert!(rx2.await.unwrap().is_err());
    }
}
