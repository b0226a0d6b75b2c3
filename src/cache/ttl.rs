//! Time-bounded cache with request coalescing
//!
//! Entries stay valid for a TTL; concurrent requests for the same missing
//! key are collapsed into one underlying producer run, with every caller
//! receiving the same result. Generic over key and value: group resolutions
//! and metadata lookups share it unchanged.

use crate::error::{GroupResolverError, Result};
use dashmap::DashMap;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock, broadcast};

/// Reference TTL for resolved group membership.
pub const DEFAULT_TTL: Duration = Duration::from_secs(900);

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Calls that attached to another caller's in-flight resolution.
    pub coalesced: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

enum Waiter<V> {
    Leader,
    Follower(broadcast::Receiver<Result<V>>),
}

pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    /// In-flight producers by key. Checking for a pending entry and
    /// registering as its leader must happen under one lock so two callers
    /// never both believe they are first.
    pending: Mutex<HashMap<K, broadcast::Sender<Result<V>>>>,
    ttl: Duration,
    stats: RwLock<CacheStats>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            pending: Mutex::new(HashMap::new()),
            ttl,
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Get a value if present and within its TTL.
    pub async fn get(&self, key: &K) -> Option<V> {
        let value = self
            .entries
            .get(key)
            .and_then(|entry| entry.is_fresh(self.ttl).then(|| entry.value.clone()));

        match value {
            Some(v) => {
                self.stats.write().await.hits += 1;
                Some(v)
            }
            None => {
                self.stats.write().await.misses += 1;
                None
            }
        }
    }

    /// Resolve `key` through the cache, collapsing concurrent duplicate
    /// requests into one `producer` run.
    ///
    /// The first caller for a missing key becomes the leader and runs the
    /// producer; callers arriving while it is in flight await the leader's
    /// result instead of producing again. Successful results populate the
    /// cache; failures are handed to every waiter but never cached, so the
    /// next caller retries.
    pub async fn resolve_with_coalescing<F, Fut>(&self, key: K, producer: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let waiter = {
            let mut pending = self.pending.lock().await;

            // A leader may have completed while we awaited the lock
            if let Some(value) = self
                .entries
                .get(&key)
                .and_then(|entry| entry.is_fresh(self.ttl).then(|| entry.value.clone()))
            {
                return Ok(value);
            }

            match pending.get(&key) {
                Some(tx) => Waiter::Follower(tx.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(1);
                    pending.insert(key.clone(), tx);
                    Waiter::Leader
                }
            }
        };

        match waiter {
            Waiter::Follower(mut rx) => {
                self.stats.write().await.coalesced += 1;
                match rx.recv().await {
                    Ok(result) => result,
                    // The leader dropped without sending; treat as transient
                    Err(_) => Err(GroupResolverError::Directory(
                        "coalesced request was abandoned".to_string(),
                    )),
                }
            }
            Waiter::Leader => {
                let result = producer().await;

                let tx = {
                    let mut pending = self.pending.lock().await;
                    if let Ok(value) = &result {
                        self.entries.insert(key.clone(), CacheEntry::new(value.clone()));
                    }
                    pending.remove(&key)
                };

                if let Some(tx) = tx {
                    // No receivers is fine; nobody coalesced onto us
                    let _ = tx.send(result.clone());
                }

                result
            }
        }
    }

    /// Drop one cache entry immediately. In-flight resolutions for other
    /// keys are unaffected.
    pub fn clear(&self, key: &K) {
        self.entries.remove(key);
    }

    /// Drop all cache entries immediately.
    pub fn clear_all(&self) {
        self.entries.clear();
    }

    /// Evict expired entries (for periodic cleanup)
    pub fn cleanup_stale(&self) {
        let ttl = self.ttl;
        let initial = self.entries.len();

        self.entries.retain(|_, entry| entry.is_fresh(ttl));

        let removed = initial - self.entries.len();
        if removed > 0 {
            tracing::info!(
                removed = removed,
                remaining = self.entries.len(),
                "Cleaned up stale cache entries"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
