//! Network client for stashway.
//!
//! This crate provides the network fetch primitive used by the caching
//! strategies: the [`Network`] trait seam plus the reqwest-backed
//! [`HttpNetwork`] implementation.

pub mod net;

pub use net::{HttpNetwork, Network, NetworkConfig, TransportError};
