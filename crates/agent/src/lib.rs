//! Request-interception caching agent.
//!
//! This crate ties the response store and network primitive together into
//! the background agent: route classification, the caching strategies,
//! precaching, the install/activate lifecycle, and the host message loop.

pub mod agent;
pub mod lifecycle;
pub mod messages;
pub mod precache;
pub mod router;
pub mod strategy;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testutil;

pub use agent::Agent;
pub use lifecycle::{LifecycleController, LifecycleState};
pub use messages::Envelope;
pub use router::{RouteDecision, classify};
pub use strategy::{PreloadResponse, StrategyKind};
