//! Cache Store Module
//!
//! Main storage engine: a HashMap of entries with lazy TTL expiration.
//! The store itself is not synchronized; [`crate::cache::Cache`] wraps it in
//! a single reader/writer lock.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::{CacheEntry, Ttl};
use crate::error::{CacheError, Result};

/// The full key to entry mapping, as written to and read from snapshots.
pub type Snapshot<V> = HashMap<String, CacheEntry<V>>;

// == Cache Store ==
/// Key-value storage with per-entry expiration.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// TTL applied to `Ttl::Default` requests, None = never expire
    default_ttl: Option<Duration>,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty CacheStore.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL for entries stored with `Ttl::Default`, None = never expire
    pub fn new(default_ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
        }
    }

    /// Returns the configured default TTL.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    // == Get ==
    /// Returns the entry for `key` if it exists and is live.
    ///
    /// Expired entries are reported as absent but left in place.
    pub fn get(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.live_entry(key, Utc::now())
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry for the key.
    pub fn set(&mut self, key: String, value: V, ttl: Ttl) {
        let expires_at = ttl.resolve(self.default_ttl, Utc::now());
        self.entries.insert(key, CacheEntry::new(value, expires_at));
    }

    // == Add ==
    /// Stores a value only if no live entry exists for the key.
    ///
    /// An expired entry still occupying the key is overwritten.
    pub fn add(&mut self, key: String, value: V, ttl: Ttl) -> Result<()> {
        let now = Utc::now();
        if self.live_entry(&key, now).is_some() {
            return Err(CacheError::AlreadyExists(key));
        }
        let expires_at = ttl.resolve(self.default_ttl, now);
        self.entries.insert(key, CacheEntry::new(value, expires_at));
        Ok(())
    }

    // == Replace ==
    /// Overwrites a value only if a live entry exists for the key.
    pub fn replace(&mut self, key: String, value: V, ttl: Ttl) -> Result<()> {
        let now = Utc::now();
        if self.live_entry(&key, now).is_none() {
            return Err(CacheError::NotFound(key));
        }
        let expires_at = ttl.resolve(self.default_ttl, now);
        self.entries.insert(key, CacheEntry::new(value, expires_at));
        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key, returning it if it was present.
    pub fn delete(&mut self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.remove(key)
    }

    // == Delete Expired ==
    /// Removes every entry that expired before `now`.
    ///
    /// A single `now` is used for the whole sweep. Returns the number of
    /// entries removed.
    pub fn delete_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Merge ==
    /// Adopts snapshot entries for keys that are absent or expired as of `now`.
    ///
    /// Live entries already in the store win over the snapshot. Returns the
    /// number of snapshot entries adopted.
    pub fn merge(&mut self, snapshot: Snapshot<V>, now: DateTime<Utc>) -> usize {
        let mut adopted = 0;
        for (key, entry) in snapshot {
            if self.live_entry(&key, now).is_none() {
                self.entries.insert(key, entry);
                adopted += 1;
            }
        }
        adopted
    }

    // == Clear ==
    /// Discards all entries.
    pub fn clear(&mut self) {
        self.entries = HashMap::new();
    }

    /// Returns every stored entry, expired ones included.
    pub fn entries(&self) -> &Snapshot<V> {
        &self.entries
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet reaped.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn live_entry(&self, key: &str, now: DateTime<Utc>) -> Option<&CacheEntry<V>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
    }
}
