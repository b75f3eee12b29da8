//! minicache - An in-process key-value cache
//!
//! Provides a thread-safe cache with per-entry TTL expiration, a background
//! reaper that removes expired entries, and snapshot save/load.

pub mod cache;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod tasks;

pub use cache::{Cache, CacheEntry, CacheStore, Ttl};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use snapshot::{BincodeCodec, JsonCodec, SnapshotCodec};
