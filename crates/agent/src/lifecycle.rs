//! Install/upgrade/activation state machine.
//!
//! A newly installed instance never lingers in the waiting state: install
//! completion immediately makes it eligible for activation (skip-waiting
//! semantics). Only an active instance may intercept requests.

use std::sync::RwLock;

/// Lifecycle states of one agent instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Installing,
    Waiting,
    Active,
    Redundant,
}

/// Owns the lifecycle transitions for one agent instance.
#[derive(Debug)]
pub struct LifecycleController {
    state: RwLock<LifecycleState>,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleController {
    /// A fresh instance starts installing.
    pub fn new() -> Self {
        Self { state: RwLock::new(LifecycleState::Installing) }
    }

    pub fn state(&self) -> LifecycleState {
        self.state.read().map(|s| *s).unwrap_or(LifecycleState::Redundant)
    }

    pub fn is_active(&self) -> bool {
        self.state() == LifecycleState::Active
    }

    /// Install finished. Progresses past waiting unconditionally: the new
    /// instance does not wait for prior instances' clients to close.
    pub fn finish_install(&self) {
        self.transition(LifecycleState::Waiting);
        tracing::info!("agent installed, skipping waiting");
    }

    /// The instance takes over request interception.
    pub fn activate(&self) {
        self.transition(LifecycleState::Active);
        tracing::info!("agent activated");
    }

    /// A newer instance has taken over; this one is done for good.
    pub fn make_redundant(&self) {
        self.transition(LifecycleState::Redundant);
        tracing::info!("agent is redundant");
    }

    fn transition(&self, next: LifecycleState) {
        if let Ok(mut state) = self.state.write() {
            tracing::debug!(from = ?*state, to = ?next, "lifecycle transition");
            *state = next;
        }
    }
}
