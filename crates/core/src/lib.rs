//! Core types and shared functionality for stashway.
//!
//! This crate provides:
//! - Partitioned response store with SQLite backend
//! - Request/response data model (identity keys, single-consumption bodies)
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod partition;
pub mod request;
pub mod response;
pub mod store;

pub use config::AppConfig;
pub use error::Error;
pub use partition::Partition;
pub use request::{ResourceKind, ResourceRequest};
pub use response::ResponseSnapshot;
pub use store::{CacheStore, RequestIdentity};
