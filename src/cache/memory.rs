//! Bounded in-memory LRU store
//!
//! Bounded twice: by entry count and by total tracked bytes. Recency order is
//! kept by an unbounded [`LruCache`]; both bounds are enforced here, popping
//! the least recently used entry until a new value fits.
//!
//! All state lives behind one mutex, so concurrent fetch tasks can share a
//! single instance through an `Arc`.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;

use super::stats::CacheStats;

struct Slot<V> {
    value: V,
    size: u64,
    expires_at: Option<Instant>,
}

struct LruState<V> {
    entries: LruCache<String, Slot<V>>,
    total_bytes: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
}

impl<V> LruState<V> {
    fn remove(&mut self, key: &str) -> Option<Slot<V>> {
        let slot = self.entries.pop(key)?;
        self.total_bytes -= slot.size;
        Some(slot)
    }

    fn evict_oldest(&mut self) -> bool {
        let Some((key, slot)) = self.entries.pop_lru() else {
            return false;
        };
        self.total_bytes -= slot.size;
        self.evictions += 1;
        tracing::trace!(key = %key, "evicted least recently used cache entry");
        true
    }
}

/// Thread-safe LRU cache bounded by entry count and byte budget
pub struct MemoryCache<V> {
    state: Mutex<LruState<V>>,
    max_entries: usize,
    max_bytes: u64,
}

impl<V: Clone> MemoryCache<V> {
    /// Create a cache holding at most `max_entries` entries and `max_bytes` tracked bytes
    pub fn new(max_entries: usize, max_bytes: u64) -> Self {
        Self {
            state: Mutex::new(LruState {
                entries: LruCache::unbounded(),
                total_bytes: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
                expirations: 0,
            }),
            max_entries,
            max_bytes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a key, marking it most recently used on a hit
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.lock();

        let expired = match state.entries.peek(key) {
            None => {
                state.misses += 1;
                return None;
            }
            Some(slot) => slot.expires_at.is_some_and(|at| Instant::now() >= at),
        };

        if expired {
            state.remove(key);
            state.expirations += 1;
            state.misses += 1;
            return None;
        }

        let value = state.entries.get(key).map(|slot| slot.value.clone())?;
        state.hits += 1;
        Some(value)
    }

    /// Insert or replace a value, evicting least recently used entries first
    pub fn set(&self, key: impl Into<String>, value: V, size_hint: u64) {
        self.insert(key.into(), value, size_hint, None);
    }

    /// Insert a value that expires after `ttl`
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, size_hint: u64, ttl: Duration) {
        self.insert(key.into(), value, size_hint, Some(Instant::now() + ttl));
    }

    fn insert(&self, key: String, value: V, size: u64, expires_at: Option<Instant>) {
        let mut state = self.lock();
        state.remove(&key);

        if self.max_entries == 0 || size > self.max_bytes {
            tracing::debug!(
                key = %key,
                size,
                max_bytes = self.max_bytes,
                "value exceeds cache bounds, not cached"
            );
            return;
        }

        while state.entries.len() >= self.max_entries
            || state.total_bytes + size > self.max_bytes
        {
            if !state.evict_oldest() {
                break;
            }
        }

        state.total_bytes += size;
        state.entries.put(
            key,
            Slot {
                value,
                size,
                expires_at,
            },
        );
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Drop every entry (counters are kept)
    pub fn invalidate_all(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.total_bytes = 0;
    }

    /// Whether a key is present, without touching its recency
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_bytes(&self) -> u64 {
        self.lock().total_bytes
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            expirations: state.expirations,
            entries: state.entries.len(),
            current_size: state.total_bytes,
        }
    }
}
