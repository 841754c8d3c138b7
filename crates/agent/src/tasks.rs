//! Structured ownership for fire-and-forget background work.
//!
//! Strategies that return before their revalidation completes hand the
//! spawned task to a [`TaskGroup`] so it stays owned until joined. `wait`
//! is the quiesce point used by shutdown and tests.

use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Clonable handle to a set of tracked background tasks.
#[derive(Clone, Default)]
pub struct TaskGroup {
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl TaskGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a tracked task. The task starts immediately and keeps running
    /// whether or not anyone awaits it.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        if let Ok(mut handles) = self.handles.lock() {
            handles.push(handle);
        }
    }

    /// Join every tracked task, including tasks spawned while draining.
    pub async fn wait(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = match self.handles.lock() {
                Ok(mut handles) => handles.drain(..).collect(),
                Err(_) => Vec::new(),
            };
            if drained.is_empty() {
                break;
            }
            for handle in drained {
                if let Err(e) = handle.await
                    && e.is_panic()
                {
                    tracing::warn!(error = %e, "background task panicked");
                }
            }
        }
    }
}
