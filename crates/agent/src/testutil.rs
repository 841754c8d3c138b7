//! Test doubles shared across agent tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stashway_client::{Network, TransportError};
use stashway_core::{CacheStore, ResourceRequest, ResponseSnapshot};

use crate::strategy::StrategyEnv;
use crate::tasks::TaskGroup;

/// A plain text/plain snapshot.
pub fn snapshot(status: u16, body: &str) -> ResponseSnapshot {
    ResponseSnapshot::new(
        status,
        vec![("Content-Type".to_string(), "text/plain".to_string())],
        body.to_string(),
    )
}

/// In-memory [`Network`] with scripted routes, a transport-failure list, an
/// offline switch, and a fetch counter.
#[derive(Default)]
pub struct FakeNetwork {
    online: AtomicBool,
    fetches: AtomicUsize,
    routes: Mutex<HashMap<String, (u16, String)>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeNetwork {
    pub fn new() -> Arc<Self> {
        let network = Self::default();
        network.online.store(true, Ordering::SeqCst);
        Arc::new(network)
    }

    pub fn serve(&self, url: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
    }

    /// Make fetches of this URL fail at the transport level.
    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &ResourceRequest) -> Result<ResponseSnapshot, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().contains(&request.url) {
            return Err(TransportError::Connect("scripted transport failure".to_string()));
        }

        let routes = self.routes.lock().unwrap();
        match routes.get(&request.url) {
            Some((status, body)) => Ok(snapshot(*status, body)),
            None => Err(TransportError::Connect(format!("no scripted route for {}", request.url))),
        }
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Fresh in-memory strategy environment around a configured [`FakeNetwork`].
pub async fn env_with(configure: impl FnOnce(&FakeNetwork)) -> (StrategyEnv, Arc<FakeNetwork>) {
    let network = FakeNetwork::new();
    configure(&network);
    let store = CacheStore::open_in_memory().await.unwrap();
    let env = StrategyEnv {
        store,
        network: network.clone() as Arc<dyn Network>,
        tasks: TaskGroup::new(),
    };
    (env, network)
}
