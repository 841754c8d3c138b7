//! Stale-while-revalidate: instant (possibly stale) response, fresh cache
//! for next time.
//!
//! The background refresh is initiated before the cache lookup settles and
//! is never skipped; it stays owned by the task group after the strategy
//! returns. Which of the two settles first is deliberately unspecified.

use stashway_core::{Partition, ResourceRequest, ResponseSnapshot};
use tokio::sync::oneshot;

use super::fetch_cache::fetch_and_cache;
use super::StrategyEnv;

pub async fn stale_while_revalidate(
    env: &StrategyEnv, request: &ResourceRequest, partition: Partition,
) -> ResponseSnapshot {
    // Always revalidate, before consulting the store.
    let (refresh_tx, refresh_rx) = oneshot::channel();
    {
        let tasks = env.tasks.clone();
        let env = env.clone();
        let request = request.clone();
        tasks.spawn(async move {
            let response = fetch_and_cache(&env, &request, partition).await;
            // Receiver is gone when the cache already answered; the refresh
            // itself has already been written to the store.
            let _ = refresh_tx.send(response);
        });
    }

    // Return the stale response if one exists.
    match env.store.get(partition.as_str(), &request.identity()).await {
        Ok(Some(cached)) => return cached,
        Ok(None) => {}
        Err(e) => tracing::warn!(url = %request.url, error = %e, "store lookup failed"),
    }

    // Otherwise the refresh doubles as the response.
    match refresh_rx.await {
        Ok(response) => response,
        Err(_) => ResponseSnapshot::network_error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{env_with, snapshot};
    use bytes::Bytes;
    use stashway_core::ResourceKind;

    fn document_request(url: &str) -> ResourceRequest {
        ResourceRequest::get(url, ResourceKind::Document)
    }

    #[tokio::test]
    async fn test_hit_returns_stale_and_refreshes_store() {
        let (env, network) = env_with(|n| n.serve("https://example.com/", 200, "fresh page")).await;
        let request = document_request("https://example.com/");
        env.store.put("documents", &request.identity(), snapshot(200, "stale page")).await.unwrap();

        let response = stale_while_revalidate(&env, &request, Partition::Documents).await;

        // The stale entry is served immediately.
        assert_eq!(response.read_body().unwrap(), Bytes::from("stale page"));

        // Exactly one background fetch updates the store.
        env.tasks.wait().await;
        assert_eq!(network.fetch_count(), 1);
        let stored = env.store.get("documents", &request.identity()).await.unwrap().unwrap();
        assert_eq!(stored.read_body().unwrap(), Bytes::from("fresh page"));
    }

    #[tokio::test]
    async fn test_miss_waits_for_refresh() {
        let (env, network) = env_with(|n| n.serve("https://example.com/", 200, "page")).await;
        let request = document_request("https://example.com/");

        let response = stale_while_revalidate(&env, &request, Partition::Documents).await;

        assert_eq!(response.read_body().unwrap(), Bytes::from("page"));
        assert_eq!(network.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_miss_offline_returns_503() {
        let (env, _network) = env_with(|n| n.set_online(false)).await;
        let request = document_request("https://example.com/");

        let response = stale_while_revalidate(&env, &request, Partition::Documents).await;

        assert_eq!(response.status(), 503);
    }

    #[tokio::test]
    async fn test_refresh_never_skipped_on_hit() {
        // Even when the cache answers, the refresh must still run.
        let (env, network) = env_with(|n| n.serve("https://example.com/", 200, "fresh")).await;
        let request = document_request("https://example.com/");
        env.store.put("documents", &request.identity(), snapshot(200, "stale")).await.unwrap();

        for _ in 0..3 {
            let _ = stale_while_revalidate(&env, &request, Partition::Documents).await;
        }
        env.tasks.wait().await;

        assert_eq!(network.fetch_count(), 3);
    }
}
