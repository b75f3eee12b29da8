//! Cache Handle
//!
//! The public, thread-safe cache: a [`CacheStore`] behind a single
//! reader/writer lock plus the reaper that sweeps it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::cache::{CacheStore, Ttl};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::snapshot::{JsonCodec, SnapshotCodec};
use crate::tasks::{spawn_reaper, ReaperHandle};

/// Thread-safe key-value cache with per-entry TTL.
///
/// Cloning is cheap and every clone shares the same store and reaper.
/// Reads take the shared lock; every mutation, the reaper sweep and
/// snapshot save/load take the exclusive lock.
pub struct Cache<V, C = JsonCodec> {
    pub(crate) inner: Arc<Inner<V, C>>,
}

pub(crate) struct Inner<V, C> {
    pub(crate) store: Arc<RwLock<CacheStore<V>>>,
    pub(crate) codec: C,
    reaper_interval: Duration,
    reaper: Mutex<Option<ReaperHandle>>,
}

impl<V, C> Clone for Cache<V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Cache<V, JsonCodec>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache using the JSON snapshot codec and starts its reaper.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL for `Ttl::Default` entries, None = never expire
    /// * `reaper_interval` - Time between sweeps, zero disables automatic reaping
    ///
    /// The reaper is a tokio task; outside a runtime it is left disabled.
    pub fn new(default_ttl: Option<Duration>, reaper_interval: Duration) -> Self {
        Self::with_codec(default_ttl, reaper_interval, JsonCodec)
    }

    /// Creates a cache from a [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.default_ttl, config.reaper_interval)
    }
}

impl<V, C> Cache<V, C>
where
    V: Clone + Send + Sync + 'static,
    C: SnapshotCodec,
{
    /// Creates a cache with an explicit snapshot codec and starts its reaper.
    ///
    /// Without a running tokio runtime the reaper is left disabled and a
    /// warning is logged; lazy expiration and `delete_expired` still apply.
    pub fn with_codec(default_ttl: Option<Duration>, reaper_interval: Duration, codec: C) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::new(default_ttl)));
        let reaper = if reaper_interval.is_zero() {
            debug!("Reaper disabled: zero interval");
            None
        } else if Handle::try_current().is_err() {
            warn!("Reaper disabled: no tokio runtime is running");
            None
        } else {
            Some(spawn_reaper(store.clone(), reaper_interval))
        };

        Self {
            inner: Arc::new(Inner {
                store,
                codec,
                reaper_interval,
                reaper: Mutex::new(reaper),
            }),
        }
    }

    // == Get ==
    /// Returns a copy of the value for `key` if it exists and has not expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let store = self.inner.store.read().await;
        store.get(key).map(|entry| entry.value.clone())
    }

    /// Returns the value together with its expiration instant, None = never.
    pub async fn get_with_expiration(&self, key: &str) -> Option<(V, Option<DateTime<Utc>>)> {
        let store = self.inner.store.read().await;
        store
            .get(key)
            .map(|entry| (entry.value.clone(), entry.expires_at))
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry.
    ///
    /// `ttl` accepts a [`Ttl`] or a `Duration`; `Duration::ZERO` means the
    /// cache default.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: impl Into<Ttl>) {
        let mut store = self.inner.store.write().await;
        store.set(key.into(), value, ttl.into());
    }

    // == Add ==
    /// Stores a value only if the key has no live entry.
    ///
    /// # Errors
    /// [`crate::CacheError::AlreadyExists`] if a live entry exists; the cache
    /// is left unchanged.
    pub async fn add(&self, key: impl Into<String>, value: V, ttl: impl Into<Ttl>) -> Result<()> {
        let mut store = self.inner.store.write().await;
        store.add(key.into(), value, ttl.into())
    }

    // == Replace ==
    /// Overwrites a value only if the key has a live entry.
    ///
    /// # Errors
    /// [`crate::CacheError::NotFound`] if the key is missing or expired; the
    /// cache is left unchanged.
    pub async fn replace(&self, key: impl Into<String>, value: V, ttl: impl Into<Ttl>) -> Result<()> {
        let mut store = self.inner.store.write().await;
        store.replace(key.into(), value, ttl.into())
    }

    // == Delete ==
    /// Removes a key. Deleting an absent key is not an error.
    pub async fn delete(&self, key: &str) {
        let mut store = self.inner.store.write().await;
        store.delete(key);
    }

    /// Runs one reaper sweep immediately, returning how many entries were removed.
    pub async fn delete_expired(&self) -> usize {
        let now = Utc::now();
        let mut store = self.inner.store.write().await;
        store.delete_expired(now)
    }

    // == Count ==
    /// Returns the number of stored entries, including expired entries that
    /// have not been reaped yet.
    pub async fn count(&self) -> usize {
        self.inner.store.read().await.len()
    }

    // == Flush ==
    /// Discards every entry.
    pub async fn flush(&self) {
        self.inner.store.write().await.clear();
    }

    // == Reaper Lifecycle ==
    /// Stops the background reaper and waits for it to exit.
    ///
    /// Returns false if the reaper was disabled or already stopped; calling
    /// this more than once is harmless.
    pub async fn stop_reaper(&self) -> bool {
        let handle = self.inner.reaper.lock().await.take();
        match handle {
            Some(handle) => {
                handle.stop().await;
                true
            }
            None => false,
        }
    }

    /// Returns true while the background reaper is running.
    pub async fn reaper_running(&self) -> bool {
        self.inner
            .reaper
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Returns the TTL applied to `Ttl::Default` entries.
    pub async fn default_ttl(&self) -> Option<Duration> {
        self.inner.store.read().await.default_ttl()
    }

    /// Returns the configured reaper interval, zero when reaping is disabled.
    pub fn reaper_interval(&self) -> Duration {
        self.inner.reaper_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    const SHORT_TTL: Duration = Duration::from_millis(50);

    fn cache() -> Cache<String> {
        Cache::new(None, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = cache();

        cache.set("golang", "golang".to_string(), Ttl::Default).await;

        assert_eq!(cache.get("golang").await, Some("golang".to_string()));
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_zero_duration_uses_default_ttl() {
        let cache: Cache<u32> = Cache::new(Some(SHORT_TTL), Duration::ZERO);

        cache.set("a", 1, Duration::ZERO).await;
        cache.set("b", 2, Ttl::Never).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("b").await, Some(2));
    }

    #[tokio::test]
    async fn test_get_with_expiration() {
        let cache = cache();
        cache.set("timed", "v".to_string(), Duration::from_secs(60)).await;
        cache.set("never", "v".to_string(), Ttl::Never).await;

        let (_, expires_at) = cache.get_with_expiration("timed").await.unwrap();
        assert!(expires_at.unwrap() > Utc::now());
        assert_eq!(cache.get_with_expiration("never").await, Some(("v".to_string(), None)));
    }

    #[tokio::test]
    async fn test_add_and_replace() {
        let cache = cache();

        assert!(matches!(
            cache.replace("k", "v0".to_string(), Ttl::Default).await,
            Err(CacheError::NotFound(_))
        ));
        assert_eq!(cache.count().await, 0);

        cache.add("k", "v1".to_string(), Ttl::Default).await.unwrap();
        assert!(matches!(
            cache.add("k", "v2".to_string(), Ttl::Default).await,
            Err(CacheError::AlreadyExists(_))
        ));
        assert_eq!(cache.get("k").await, Some("v1".to_string()));

        cache.replace("k", "v3".to_string(), Ttl::Default).await.unwrap();
        assert_eq!(cache.get("k").await, Some("v3".to_string()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let cache = cache();
        cache.set("k", "v".to_string(), Ttl::Default).await;

        cache.delete("k").await;
        cache.delete("k").await;

        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.count().await, 0);
    }

    #[tokio::test]
    async fn test_count_includes_unreaped_entries() {
        let cache = cache();
        cache.set("k", "v".to_string(), SHORT_TTL).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.count().await, 1);

        assert_eq!(cache.delete_expired().await, 1);
        assert_eq!(cache.count().await, 0);
    }

    #[tokio::test]
    async fn test_flush() {
        let cache = cache();
        cache.set("a", "1".to_string(), Ttl::Default).await;
        cache.set("b", "2".to_string(), Ttl::Never).await;

        cache.flush().await;

        assert_eq!(cache.count().await, 0);
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("b").await, None);
    }

    #[tokio::test]
    async fn test_zero_interval_disables_reaper() {
        let cache = cache();

        assert!(!cache.reaper_running().await);
        assert!(!cache.stop_reaper().await);
        assert_eq!(cache.reaper_interval(), Duration::ZERO);
    }

    #[test]
    fn test_reaper_disabled_outside_runtime() {
        let cache: Cache<u32> = Cache::new(None, Duration::from_millis(10));

        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            assert!(!cache.reaper_running().await);
            assert!(!cache.stop_reaper().await);

            cache.set("k", 1, SHORT_TTL).await;
            tokio::time::sleep(Duration::from_millis(80)).await;
            assert_eq!(cache.get("k").await, None);
            assert_eq!(cache.delete_expired().await, 1);
        });
    }

    #[tokio::test]
    async fn test_zero_duration_ttl_variant_uses_default() {
        let cache: Cache<u32> = Cache::new(Some(Duration::from_secs(60)), Duration::ZERO);

        cache.set("z", 1, Ttl::For(Duration::ZERO)).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let (value, expires_at) = cache.get_with_expiration("z").await.unwrap();
        assert_eq!(value, 1);
        assert!(expires_at.unwrap() > Utc::now() + chrono::TimeDelta::seconds(50));
    }

    #[tokio::test]
    async fn test_stop_reaper_is_single_shot() {
        let cache: Cache<String> = Cache::new(None, Duration::from_secs(3600));

        assert!(cache.reaper_running().await);
        assert!(cache.stop_reaper().await);
        assert!(!cache.reaper_running().await);
        assert!(!cache.stop_reaper().await);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = CacheConfig {
            default_ttl: Some(Duration::from_secs(30)),
            reaper_interval: Duration::ZERO,
            ..CacheConfig::default()
        };
        let cache: Cache<String> = Cache::from_config(&config);

        assert_eq!(cache.default_ttl().await, Some(Duration::from_secs(30)));
        assert!(!cache.reaper_running().await);
    }
}
