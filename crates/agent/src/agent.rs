//! Agent façade: lifecycle-gated request interception.

use std::sync::Arc;

use stashway_client::Network;
use stashway_core::{AppConfig, CacheStore, Error, Partition, ResourceRequest, ResponseSnapshot};

use crate::lifecycle::LifecycleController;
use crate::messages::Envelope;
use crate::precache::precache;
use crate::router::classify;
use crate::strategy::{self, PreloadResponse, StrategyEnv};
use crate::tasks::TaskGroup;

/// One background agent instance: owns the response store, the network
/// primitive, and the lifecycle gate in front of interception.
pub struct Agent {
    store: CacheStore,
    network: Arc<dyn Network>,
    config: AppConfig,
    lifecycle: LifecycleController,
    tasks: TaskGroup,
}

impl Agent {
    /// Open the configured store and build an agent around it.
    pub async fn new(config: AppConfig, network: Arc<dyn Network>) -> Result<Self, Error> {
        let store = CacheStore::open(&config.db_path).await?;
        Ok(Self::with_store(config, network, store))
    }

    /// Build an agent around an existing store handle.
    pub fn with_store(config: AppConfig, network: Arc<dyn Network>, store: CacheStore) -> Self {
        Self {
            store,
            network,
            config,
            lifecycle: LifecycleController::new(),
            tasks: TaskGroup::new(),
        }
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Run the install transition.
    ///
    /// Precaching here is optional and off by default; the usual trigger is
    /// the host's idle message. Either way the instance progresses past
    /// waiting immediately.
    pub async fn install(&self) {
        tracing::info!("agent installing");
        if self.config.precache_on_install {
            let fetched = precache(
                &self.store,
                &self.network,
                Partition::Documents,
                &self.config.precache_urls(),
            )
            .await;
            tracing::info!(fetched, "install-time precache complete");
        }
        self.lifecycle.finish_install();
    }

    /// Run the activate transition: claim open clients so they are served
    /// by this instance without a reload, and reclaim partitions no longer
    /// referenced by this version.
    pub async fn activate(&self) {
        let keep: Vec<&str> = Partition::ALL.iter().map(|p| p.as_str()).collect();
        match self.store.retain_partitions(&keep).await {
            Ok(deleted) if deleted > 0 => {
                tracing::info!(deleted, "reclaimed stale cache partitions");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "partition reclamation failed"),
        }
        tracing::info!("claiming open clients");
        self.lifecycle.activate();
    }

    /// Intercept one request. `None` is explicit pass-through: requests
    /// arriving before activation and unclassified resource kinds fall
    /// through to normal network handling.
    pub async fn intercept(
        &self, request: &ResourceRequest, preload: Option<PreloadResponse>,
    ) -> Option<ResponseSnapshot> {
        if !self.lifecycle.is_active() {
            return None;
        }

        let decision = classify(request.kind)?;
        let response =
            strategy::run(decision.strategy, &self.env(), request, decision.partition, preload).await;
        Some(response)
    }

    /// Handle one host/peer message envelope.
    pub async fn on_message(&self, envelope: Envelope) {
        match envelope {
            Envelope::HostIdle => {
                let fetched = precache(
                    &self.store,
                    &self.network,
                    Partition::Documents,
                    &self.config.precache_urls(),
                )
                .await;
                tracing::info!(fetched, "idle-time precache complete");
            }
            other => {
                // Relay traffic for the peer subsystems; nothing to do here.
                tracing::debug!(kind = other.kind(), "ignoring relay message");
            }
        }
    }

    /// Wait for outstanding background revalidations to settle.
    pub async fn quiesce(&self) {
        self.tasks.wait().await;
    }

    fn env(&self) -> StrategyEnv {
        StrategyEnv {
            store: self.store.clone(),
            network: Arc::clone(&self.network),
            tasks: self.tasks.clone(),
        }
    }
}
