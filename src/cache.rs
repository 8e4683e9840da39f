//! Short-lived response cache.
//!
//! Shields the provider from repeat calls: each endpoint's assembled
//! response is kept for a fixed TTL. Expired entries are not purged; they
//! read as absent and get overwritten by the next `set`. The key space is
//! a handful of league/slate pairs, so growth is bounded.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clock::Clock;

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL_SECS: i64 = 45;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Thread-safe key → (value, expiry) map with clock-driven expiry.
pub struct TtlCache<V> {
    inner: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            clock: Arc::clone(&self.clock),
            ttl: self.ttl,
        }
    }
}

impl<V: Clone> TtlCache<V> {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            clock,
            ttl,
        }
    }

    /// Return the value for `key` if it has not yet expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let cache = self.inner.read().await;
        cache
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key` with the default TTL.
    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.ttl).await;
    }

    pub async fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        let mut cache = self.inner.write().await;
        cache.insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Physical entry count, expired entries included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
