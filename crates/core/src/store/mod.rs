//! SQLite-backed partitioned response store.
//!
//! This module provides the durable key→response mapping every strategy
//! reads and writes, using SQLite with async access via tokio-rusqlite:
//!
//! - Partitioned storage, one named partition per resource class
//! - Identity-addressed entries using SHA-256 hashing
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Partition reclamation for agent upgrades

pub mod connection;
pub mod entries;
pub mod identity;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheStore;
pub use identity::RequestIdentity;
