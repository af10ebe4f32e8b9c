//! Bounded, expiring key/value store.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CacheKey;

/// Counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that found nothing live.
    pub misses: u64,
    /// Entries removed to make room.
    pub evictions: u64,
    /// Entries removed because their TTL had passed.
    pub expirations: u64,
    /// Entries currently stored.
    pub entries: usize,
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) <= self.ttl
    }
}

struct Inner<V> {
    entries: HashMap<CacheKey, Entry<V>>,
    // Insertion order, oldest first.
    order: VecDeque<CacheKey>,
    stats: CacheStats,
}

impl<V> Inner<V> {
    fn remove(&mut self, key: &CacheKey) -> Option<Entry<V>> {
        let entry = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(entry)
    }
}

/// A thread-safe cache with a fixed capacity and per-entry time-to-live.
///
/// When full, inserting a new key evicts the oldest-inserted entry, whether
/// or not it has been read since. Expired entries are dropped when looked up.
pub struct CalculationCache<V> {
    name: &'static str,
    capacity: usize,
    default_ttl: Duration,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> CalculationCache<V> {
    /// Creates an empty cache. A capacity of zero is treated as one.
    pub fn new(name: &'static str, capacity: usize, default_ttl: Duration) -> Self {
        Self {
            name,
            capacity: capacity.max(1),
            default_ttl,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                stats: CacheStats::default(),
            }),
        }
    }

    /// The cache's name, used in log events.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns a copy of the live value stored under `key`.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &CacheKey, now: Instant) -> Option<V> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let lookup = inner
            .entries
            .get(key)
            .map(|entry| entry.is_live(now).then(|| entry.value.clone()));
        let live = match lookup {
            Some(Some(value)) => Some(value),
            Some(None) => {
                inner.remove(key);
                inner.stats.expirations += 1;
                debug!(cache = self.name, key = %key, "cache entry expired");
                None
            }
            None => None,
        };

        if live.is_some() {
            inner.stats.hits += 1;
            debug!(cache = self.name, key = %key, "cache hit");
        } else {
            inner.stats.misses += 1;
            debug!(cache = self.name, key = %key, "cache miss");
        }
        live
    }

    /// Stores `value` with the default time-to-live.
    pub fn set(&self, key: CacheKey, value: V) {
        self.set_at(key, value, self.default_ttl, Instant::now());
    }

    /// Stores `value` with an explicit time-to-live.
    pub fn set_with_ttl(&self, key: CacheKey, value: V, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now());
    }

    fn set_at(&self, key: CacheKey, value: V, ttl: Duration, now: Instant) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        // Overwriting counts as a fresh insertion.
        if inner.remove(&key).is_none() {
            while inner.entries.len() >= self.capacity {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.entries.remove(&oldest);
                inner.stats.evictions += 1;
                debug!(cache = self.name, key = %oldest, "cache entry evicted");
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
                ttl,
            },
        );
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    ///
    /// The computation runs without holding the lock, so concurrent callers
    /// missing on the same key may both compute; the last write wins.
    pub fn get_or_insert_with<F>(&self, key: CacheKey, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.set(key, value.clone());
        value
    }

    /// Removes the entry stored under `key`.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    /// Removes every entry. Counters are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Number of stored entries, including expired ones not yet looked up.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether `key` is stored, without touching counters or expiry.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.entries.len(),
            ..inner.stats
        }
    }
}

impl<V> std::fmt::Debug for CalculationCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculationCache")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
