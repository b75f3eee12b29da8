//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TTL_SECS: u64 = 1800;
const DEFAULT_REAPER_INTERVAL_SECS: u64 = 3;
const DEFAULT_SNAPSHOT_PATH: &str = "minicache.snapshot";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied when an entry is stored with `Ttl::Default`, None = never expire
    pub default_ttl: Option<Duration>,
    /// Interval between reaper sweeps, zero disables automatic reaping
    pub reaper_interval: Duration,
    /// File used by the demo program for snapshots
    pub snapshot_path: PathBuf,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MINICACHE_DEFAULT_TTL` - Default TTL in seconds, 0 = never (default: 1800)
    /// - `MINICACHE_REAPER_INTERVAL` - Reaper interval in seconds, 0 = disabled (default: 3)
    /// - `MINICACHE_SNAPSHOT_PATH` - Snapshot file path (default: minicache.snapshot)
    pub fn from_env() -> Self {
        let default_ttl_secs = env::var("MINICACHE_DEFAULT_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECS);
        let reaper_interval_secs = env::var("MINICACHE_REAPER_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REAPER_INTERVAL_SECS);

        Self {
            default_ttl: ttl_from_secs(default_ttl_secs),
            reaper_interval: Duration::from_secs(reaper_interval_secs),
            snapshot_path: env::var("MINICACHE_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: ttl_from_secs(DEFAULT_TTL_SECS),
            reaper_interval: Duration::from_secs(DEFAULT_REAPER_INTERVAL_SECS),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        }
    }
}

fn ttl_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
