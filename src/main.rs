//! minicache demo
//!
//! Exercises set/get and snapshot save/load against a short-lived entry.

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minicache::{Cache, CacheConfig};

const DEMO_KEY: &str = "golang";
const DEMO_TTL: Duration = Duration::from_secs(2);

/// Main entry point for the minicache demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Store a value with a 2 second TTL and read it back
/// 4. Save a snapshot to disk and load it back
/// 5. Read the value just before and after it expires
/// 6. Stop the reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minicache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: default_ttl={:?}, reaper_interval={:?}, snapshot_path={}",
        config.default_ttl,
        config.reaper_interval,
        config.snapshot_path.display()
    );

    let cache: Cache<String> = Cache::from_config(&config);
    info!(
        "Cache ready: default_ttl={:?}, reaper_running={}",
        cache.default_ttl().await,
        cache.reaper_running().await
    );

    cache.set(DEMO_KEY, DEMO_KEY.to_string(), DEMO_TTL).await;
    report(&cache).await;

    cache
        .save_to_file(&config.snapshot_path)
        .await
        .with_context(|| format!("saving snapshot to {}", config.snapshot_path.display()))?;
    let adopted = cache
        .load_from_file(&config.snapshot_path)
        .await
        .with_context(|| format!("loading snapshot from {}", config.snapshot_path.display()))?;
    info!("Snapshot reloaded, {} entries adopted", adopted);

    tokio::time::sleep(Duration::from_millis(1999)).await;
    report(&cache).await;

    tokio::time::sleep(Duration::from_secs(1)).await;
    report(&cache).await;
    info!("Entries stored: {}", cache.count().await);

    if cache.stop_reaper().await {
        info!("Reaper stopped");
    } else {
        warn!("Reaper was not running");
    }

    Ok(())
}

async fn report(cache: &Cache<String>) {
    match cache.get(DEMO_KEY).await {
        Some(value) => info!("found {}: {}", DEMO_KEY, value),
        None => info!("not found {}", DEMO_KEY),
    }
}
