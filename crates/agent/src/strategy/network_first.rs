//! Network-first: network falling back to cache.
//!
//! Favors freshness for executable resources (scripts, workers), degrading
//! gracefully offline. The cache lookup is initiated before the network
//! attempt so the fallback is already in flight when the fetch fails.

use stashway_core::{Error, Partition, ResourceRequest, ResponseSnapshot};
use tokio::task::JoinHandle;

use super::fetch_cache::store_duplicate;
use super::StrategyEnv;

pub async fn network_first(
    env: &StrategyEnv, request: &ResourceRequest, partition: Partition,
) -> ResponseSnapshot {
    // Initiate the cache lookup immediately; it is only awaited on the
    // fallback paths.
    let lookup = spawn_lookup(env, request, partition);

    // When offline, return the cached response if it exists or a 503.
    if !env.network.is_online() {
        return resolve_lookup(lookup)
            .await
            .unwrap_or_else(ResponseSnapshot::network_unavailable);
    }

    match env.network.fetch(request).await {
        Ok(response) => {
            store_duplicate(env, request, partition, &response).await;
            response
        }
        Err(e) => {
            tracing::warn!(url = %request.url, error = %e, "network fetch failed, falling back to cache");
            resolve_lookup(lookup)
                .await
                .unwrap_or_else(ResponseSnapshot::network_error)
        }
    }
}

fn spawn_lookup(
    env: &StrategyEnv, request: &ResourceRequest, partition: Partition,
) -> JoinHandle<Result<Option<ResponseSnapshot>, Error>> {
    let store = env.store.clone();
    let identity = request.identity();
    tokio::spawn(async move { store.get(partition.as_str(), &identity).await })
}

async fn resolve_lookup(
    lookup: JoinHandle<Result<Option<ResponseSnapshot>, Error>>,
) -> Option<ResponseSnapshot> {
    match lookup.await {
        Ok(Ok(hit)) => hit,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "cache lookup failed");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "cache lookup task failed");
            None
        }
    }
}
