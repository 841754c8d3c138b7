//! Request-fulfillment strategies.
//!
//! Three policies plus a passthrough building block, dispatched over a
//! closed enum. Every strategy is terminal: it resolves to a concrete
//! response on every path and never lets an error escape to the
//! interception boundary. The two synthetic failure responses are never
//! conflated: 503 means "offline, not attempted", 408 means "attempted,
//! transport failed".

pub mod cache_first;
pub mod fetch_cache;
pub mod network_first;
pub mod stale_while_revalidate;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use stashway_client::Network;
use stashway_core::{CacheStore, Partition, ResourceRequest, ResponseSnapshot};

use crate::tasks::TaskGroup;

/// Closed set of request-fulfillment policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    CacheFirst,
    NetworkFirst,
    StaleWhileRevalidate,
    Default,
}

/// A preloaded response the interception boundary may supply for
/// navigations. Resolves to `None` when no preload was started.
pub type PreloadResponse = BoxFuture<'static, Option<ResponseSnapshot>>;

/// Shared handles every strategy executes against.
#[derive(Clone)]
pub struct StrategyEnv {
    pub store: CacheStore,
    pub network: Arc<dyn Network>,
    pub tasks: TaskGroup,
}

/// Dispatch a request to the chosen strategy.
pub async fn run(
    kind: StrategyKind, env: &StrategyEnv, request: &ResourceRequest, partition: Partition,
    preload: Option<PreloadResponse>,
) -> ResponseSnapshot {
    match kind {
        StrategyKind::CacheFirst => cache_first::cache_first(env, request, partition, preload).await,
        StrategyKind::NetworkFirst => network_first::network_first(env, request, partition).await,
        StrategyKind::StaleWhileRevalidate => {
            stale_while_revalidate::stale_while_revalidate(env, request, partition).await
        }
        StrategyKind::Default => fetch_cache::fetch_and_cache(env, request, partition).await,
    }
}
