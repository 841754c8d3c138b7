//! Cache-first: cache falling back to preload, then network.
//!
//! Minimizes latency and network usage for static assets (images, styles)
//! at the cost of potential staleness.

use stashway_core::{Partition, ResourceRequest, ResponseSnapshot};

use super::fetch_cache::{fetch_and_cache, store_duplicate};
use super::{PreloadResponse, StrategyEnv};

pub async fn cache_first(
    env: &StrategyEnv, request: &ResourceRequest, partition: Partition, preload: Option<PreloadResponse>,
) -> ResponseSnapshot {
    // First, try to get the resource from the store.
    match env.store.get(partition.as_str(), &request.identity()).await {
        Ok(Some(cached)) => return cached,
        Ok(None) => {}
        Err(e) => tracing::warn!(url = %request.url, error = %e, "store lookup failed"),
    }

    // Next, try to use a preloaded response if one was started.
    if let Some(preload) = preload
        && let Some(response) = preload.await
    {
        store_duplicate(env, request, partition, &response).await;
        return response;
    }

    // Finally, go to the network.
    fetch_and_cache(env, request, partition).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::env_with;
    use bytes::Bytes;
    use futures_util::FutureExt;
    use stashway_core::ResourceKind;

    fn image_request(url: &str) -> ResourceRequest {
        ResourceRequest::get(url, ResourceKind::Image)
    }

    #[tokio::test]
    async fn test_hit_returns_cached_without_network() {
        let (env, network) = env_with(|n| n.serve("https://example.com/pic.png", 200, "fresh")).await;
        let request = image_request("https://example.com/pic.png");
        env.store
            .put("images", &request.identity(), crate::testutil::snapshot(200, "stale"))
            .await
            .unwrap();

        let response = cache_first(&env, &request, Partition::Images, None).await;

        assert_eq!(response.read_body().unwrap(), Bytes::from("stale"));
        assert_eq!(network.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_miss_uses_preload_and_stores_it() {
        let (env, network) = env_with(|_| {}).await;
        let request = image_request("https://example.com/pic.png");

        let preload: PreloadResponse =
            async { Some(crate::testutil::snapshot(200, "preloaded")) }.boxed();
        let response = cache_first(&env, &request, Partition::Images, Some(preload)).await;

        assert_eq!(response.read_body().unwrap(), Bytes::from("preloaded"));
        assert_eq!(network.fetch_count(), 0);

        let stored = env.store.get("images", &request.identity()).await.unwrap().unwrap();
        assert_eq!(stored.read_body().unwrap(), Bytes::from("preloaded"));
    }

    #[tokio::test]
    async fn test_miss_empty_preload_falls_back_to_network() {
        let (env, network) = env_with(|n| n.serve("https://example.com/pic.png", 200, "net")).await;
        let request = image_request("https://example.com/pic.png");

        let preload: PreloadResponse = async { None }.boxed();
        let response = cache_first(&env, &request, Partition::Images, Some(preload)).await;

        assert_eq!(response.read_body().unwrap(), Bytes::from("net"));
        assert_eq!(network.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_miss_no_preload_fetches_and_caches() {
        let (env, network) = env_with(|n| n.serve("https://example.com/pic.png", 200, "net")).await;
        let request = image_request("https://example.com/pic.png");

        let response = cache_first(&env, &request, Partition::Images, None).await;
        assert_eq!(response.status(), 200);
        assert_eq!(network.fetch_count(), 1);

        // Second request is a pure hit.
        let again = cache_first(&env, &request, Partition::Images, None).await;
        assert_eq!(again.read_body().unwrap(), Bytes::from("net"));
        assert_eq!(network.fetch_count(), 1);
    }
}
