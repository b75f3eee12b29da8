//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and the TTL requests
//! that produce their expiration instants.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

// == TTL ==
/// Expiration requested by a caller when storing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Use the cache's configured default TTL
    #[default]
    Default,
    /// Never expire
    Never,
    /// Expire once the duration has elapsed after insertion
    For(Duration),
}

impl Ttl {
    /// Resolves the request into an absolute expiration instant.
    ///
    /// `None` means the entry never expires. A zero duration is treated as
    /// `Ttl::Default`. A duration too large to add to `now` resolves to `None`.
    pub fn resolve(self, default_ttl: Option<Duration>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let ttl = match self {
            Ttl::Default => default_ttl?,
            Ttl::For(ttl) if ttl.is_zero() => default_ttl?,
            Ttl::Never => return None,
            Ttl::For(ttl) => ttl,
        };
        TimeDelta::from_std(ttl)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
    }
}

/// A zero duration asks for the cache default.
impl From<Duration> for Ttl {
    fn from(ttl: Duration) -> Self {
        if ttl.is_zero() {
            Ttl::Default
        } else {
            Ttl::For(ttl)
        }
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and expiration instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration instant, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry expiring at the given instant.
    pub fn new(value: V, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// Boundary condition: the entry is still live at exactly its expiration
    /// instant and expired strictly after it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    /// Checks whether the entry has expired as of the current wall-clock time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
