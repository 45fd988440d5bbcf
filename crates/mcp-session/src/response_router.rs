//! `ResponseRouter` (spec.md §4.4): a pre-dispatch interception point for
//! responses to server→client requests. Consulted, in registration order,
//! before falling back to the session's own `pendingRequests` table — this is
//! how a queued task awaiting an elicitation answer reclaims its response
//! without going through the generic request/response correlation path.
//!
//! No teacher file implements this; the shape follows the same `async_trait`
//! object-safe interception pattern the transport crate uses for
//! [`mcp_http_transport::MessageSink`].

use async_trait::async_trait;
use mcp_jsonrpc::{JsonRpcErrorObject, RequestId};
use serde_json::Value;

/// Implemented by anything that wants first refusal on a response before it
/// reaches the session's default `pendingRequests` resolution. Each method
/// returns `true` if it claimed the response (the session stops looking
/// further), `false` to let the next router — or the default table — try.
#[async_trait]
pub trait ResponseRouter: Send + Sync {
    async fn route_response(&self, id: &RequestId, result: &Value) -> bool;
    async fn route_error(&self, id: &RequestId, error: &JsonRpcErrorObject) -> bool;
}

/// Ordered list of routers consulted ahead of the default table.
#[derive(Default)]
pub struct ResponseRouterChain {
    routers: Vec<Box<dyn ResponseRouter>>,
}

impl ResponseRouterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, router: Box<dyn ResponseRouter>) {
        self.routers.push(router);
    }

    /// Returns `true` if some router in the chain claimed the response.
    pub async fn route_response(&self, id: &RequestId, result: &Value) -> bool {
        for router in &self.routers {
            if router.route_response(id, result).await {
                return true;
            }
        }
        false
    }

    pub async fn route_error(&self, id: &RequestId, error: &JsonRpcErrorObject) -> bool {
        for router in &self.routers {
            if router.route_error(id, error).await {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct ClaimsEverything(Arc<AtomicBool>);

    #[async_trait]
    impl ResponseRouter for ClaimsEverything {
        async fn route_response(&self, _id: &RequestId, _result: &Value) -> bool {
            self.0.store(true, Ordering::SeqCst);
            true
        }
        async fn route_error(&self, _id: &RequestId, _error: &JsonRpcErrorObject) -> bool {
            true
        }
    }

    struct ClaimsNothing;

    #[async_trait]
    impl ResponseRouter for ClaimsNothing {
        async fn route_response(&self, _id: &RequestId, _result: &Value) -> bool {
            false
        }
        async fn route_error(&self, _id: &RequestId, _error: &JsonRpcErrorObject) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn first_claiming_router_wins_and_stops_the_chain() {
        let called = Arc::new(AtomicBool::new(false));
        let mut chain = ResponseRouterChain::new();
        chain.register(Box::new(ClaimsNothing));
        chain.register(Box::new(ClaimsEverything(called.clone())));

        let claimed = chain
            .route_response(&RequestId::Number(1), &serde_json::json!({}))
            .await;

        assert!(claimed);
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_chain_never_claims() {
        let chain = ResponseRouterChain::new();
        assert!(!chain.route_response(&RequestId::Number(1), &serde_json::json!({})).await);
    }
}
