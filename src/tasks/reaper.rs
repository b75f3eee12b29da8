//! Expired Entry Reaper
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

// == Reaper Handle ==
/// Owns a running reaper task and the signal that stops it.
///
/// Dropping the handle without calling [`ReaperHandle::stop`] also ends the
/// task, at its next wakeup, because the stop channel closes.
#[derive(Debug)]
pub struct ReaperHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signals the task to stop and waits for it to finish.
    pub async fn stop(self) {
        // The receiver is gone only if the task already ended.
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            warn!("Reaper task ended abnormally: {}", e);
        }
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that periodically removes expired cache entries.
///
/// Each tick samples the current time once, takes the write lock once,
/// removes every entry that expired before that time and releases the lock
/// before logging. The lock is never held across a suspension point.
///
/// # Arguments
/// * `store` - Shared reference to the cache store
/// * `interval` - Time between sweeps, must be non-zero
///
/// # Panics
/// Panics if called outside a tokio runtime, or if `interval` is zero.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::<String>::new(None)));
/// let reaper = spawn_reaper(store.clone(), Duration::from_secs(3));
/// // Later, during shutdown:
/// reaper.stop().await;
/// ```
pub fn spawn_reaper<V>(store: Arc<RwLock<CacheStore<V>>>, interval: Duration) -> ReaperHandle
where
    V: Send + Sync + 'static,
{
    let (stop, mut stop_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        info!("Starting reaper with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Utc::now();
                    let removed = {
                        let mut guard = store.write().await;
                        if guard.is_empty() {
                            0
                        } else {
                            guard.delete_expired(now)
                        }
                    };

                    if removed > 0 {
                        info!("Reaper: removed {} expired entries", removed);
                    } else {
                        debug!("Reaper: no expired entries found");
                    }
                }
                _ = &mut stop_rx => {
                    info!("Reaper stopped");
                    break;
                }
            }
        }
    });

    ReaperHandle { stop, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Ttl;

    #[tokio::test]
    async fn test_reaper_removes_expired_entries() {
        let store = Arc::new(RwLock::new(CacheStore::new(None)));

        store.write().await.set(
            "expire_soon".to_string(),
            "value".to_string(),
            Ttl::For(Duration::from_millis(50)),
        );

        let reaper = spawn_reaper(store.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(store.read().await.len(), 0, "Expired entry should have been reaped");

        reaper.stop().await;
    }

    #[tokio::test]
    async fn test_reaper_preserves_live_entries() {
        let store = Arc::new(RwLock::new(CacheStore::new(None)));

        {
            let mut guard = store.write().await;
            guard.set("long_lived".to_string(), "value".to_string(), Ttl::For(Duration::from_secs(3600)));
            guard.set("forever".to_string(), "value".to_string(), Ttl::Never);
        }

        let reaper = spawn_reaper(store.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        {
            let guard = store.read().await;
            assert_eq!(guard.len(), 2);
            assert_eq!(guard.get("long_lived").unwrap().value, "value");
            assert!(guard.get("forever").is_some());
        }

        reaper.stop().await;
    }

    #[tokio::test]
    async fn test_reaper_stop_finishes_task() {
        let store: Arc<RwLock<CacheStore<String>>> = Arc::new(RwLock::new(CacheStore::new(None)));
        let reaper = spawn_reaper(store, Duration::from_secs(3600));

        assert!(!reaper.is_finished());
        // Completes promptly even though the next tick is an hour away.
        tokio::time::timeout(Duration::from_secs(1), reaper.stop())
            .await
            .expect("stop should not hang");
    }

    #[tokio::test]
    async fn test_reaper_ends_when_handle_dropped() {
        let store: Arc<RwLock<CacheStore<String>>> = Arc::new(RwLock::new(CacheStore::new(None)));
        let reaper = spawn_reaper(store.clone(), Duration::from_secs(3600));
        let ReaperHandle { stop, task } = reaper;

        drop(stop);

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("task should end once the stop channel closes")
            .unwrap();
    }
}
