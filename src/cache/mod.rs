//! Cache Module
//!
//! Provides the in-memory store with TTL expiration and the shared,
//! thread-safe [`Cache`] handle built on top of it.

mod entry;
mod handle;
mod store;


// Re-export public types
pub use entry::{CacheEntry, Ttl};
pub use handle::Cache;
pub use store::{CacheStore, Snapshot};
