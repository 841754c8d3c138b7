//! Idempotent precaching of a fixed resource list.

use std::sync::Arc;

use futures_util::future::join_all;
use stashway_client::Network;
use stashway_core::{CacheStore, Partition, ResourceKind, ResourceRequest};

/// Populate a partition with the given resource URLs.
///
/// Each resource is handled independently and concurrently: present entries
/// are skipped, and a failure fetching one resource never aborts the rest.
/// Failures are logged and swallowed; there is no rollback of partial
/// progress. Returns the number of resources actually fetched.
pub async fn precache(
    store: &CacheStore, network: &Arc<dyn Network>, partition: Partition, resources: &[String],
) -> usize {
    let results = join_all(resources.iter().map(|url| {
        let store = store.clone();
        let network = Arc::clone(network);
        async move {
            let request = ResourceRequest::get(url.clone(), ResourceKind::Document);
            let identity = request.identity();

            match store.has(partition.as_str(), &identity).await {
                Ok(true) => return false,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "precache probe failed");
                    return false;
                }
            }

            let response = match network.fetch(&request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "precache fetch failed");
                    return false;
                }
            };

            match store.put(partition.as_str(), &identity, response).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "precache store failed");
                    false
                }
            }
        }
    }))
    .await;

    let fetched = results.into_iter().filter(|fetched| *fetched).count();
    tracing::debug!(partition = %partition, fetched, total = resources.len(), "precache pass complete");
    fetched
}
