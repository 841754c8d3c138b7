//! Fetch-and-cache building block, also the default passthrough strategy.

use stashway_core::{Partition, ResourceRequest, ResponseSnapshot};

use super::StrategyEnv;

/// Fetch from the network and cache the result.
///
/// Offline resolves to a synthetic 503 without attempting the fetch;
/// transport failure resolves to a synthetic 408. Never returns an error.
pub async fn fetch_and_cache(
    env: &StrategyEnv, request: &ResourceRequest, partition: Partition,
) -> ResponseSnapshot {
    if !env.network.is_online() {
        return ResponseSnapshot::network_unavailable();
    }

    match env.network.fetch(request).await {
        Ok(response) => {
            store_duplicate(env, request, partition, &response).await;
            response
        }
        Err(e) => {
            tracing::warn!(url = %request.url, error = %e, "network fetch failed");
            ResponseSnapshot::network_error()
        }
    }
}

/// Duplicate a response and store the copy, leaving the original readable
/// for the requester. Store failures are logged, never propagated.
pub(crate) async fn store_duplicate(
    env: &StrategyEnv, request: &ResourceRequest, partition: Partition, response: &ResponseSnapshot,
) {
    match response.duplicate() {
        Ok(copy) => {
            if let Err(e) = env.store.put(partition.as_str(), &request.identity(), copy).await {
                tracing::warn!(url = %request.url, error = %e, "failed to cache response");
            }
        }
        Err(e) => {
            tracing::warn!(url = %request.url, error = %e, "response body consumed before caching");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::env_with;
    use bytes::Bytes;
    use stashway_core::ResourceKind;

    #[tokio::test]
    async fn test_offline_returns_503_without_fetching() {
        let (env, network) = env_with(|n| n.set_online(false)).await;
        let request = ResourceRequest::get("https://example.com/pic.png", ResourceKind::Image);

        let response = fetch_and_cache(&env, &request, Partition::Images).await;

        assert_eq!(response.status(), 503);
        assert_eq!(network.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_returns_408() {
        let (env, network) = env_with(|n| n.fail("https://example.com/pic.png")).await;
        let request = ResourceRequest::get("https://example.com/pic.png", ResourceKind::Image);

        let response = fetch_and_cache(&env, &request, Partition::Images).await;

        assert_eq!(response.status(), 408);
        assert_eq!(network.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_success_stores_and_returns_readable_copies() {
        let (env, _network) = env_with(|n| n.serve("https://example.com/pic.png", 200, "pixels")).await;
        let request = ResourceRequest::get("https://example.com/pic.png", ResourceKind::Image);

        let response = fetch_and_cache(&env, &request, Partition::Images).await;

        // Both the returned response and the stored copy are fully readable.
        assert_eq!(response.read_body().unwrap(), Bytes::from("pixels"));
        let stored = env.store.get("images", &request.identity()).await.unwrap().unwrap();
        assert_eq!(stored.read_body().unwrap(), Bytes::from("pixels"));
    }
}
