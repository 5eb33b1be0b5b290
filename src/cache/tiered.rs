//! Memory-over-disk cache
//!
//! Lookups try the in-memory LRU first, then the disk store; disk hits are
//! promoted into memory. Writes go to both. Memory copies of disk-backed
//! entries expire with the disk TTL. The disk tier is optional so the same
//! type serves tests and configurations with `cache.disk: false`.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::disk::DiskCache;
use super::memory::MemoryCache;
use super::stats::CacheStats;
use super::Weigh;

pub struct TieredCache<V> {
    namespace: &'static str,
    memory: MemoryCache<V>,
    disk: Option<Arc<DiskCache>>,
}

impl<V> TieredCache<V>
where
    V: Clone + Serialize + DeserializeOwned + Weigh,
{
    /// Create a tiered cache; `namespace` keeps unrelated payloads apart on disk
    pub fn new(namespace: &'static str, memory: MemoryCache<V>, disk: Option<Arc<DiskCache>>) -> Self {
        Self {
            namespace,
            memory,
            disk,
        }
    }

    fn disk_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    pub fn get(&self, key: &str) -> Option<V> {
        if let Some(value) = self.memory.get(key) {
            return Some(value);
        }

        let disk = self.disk.as_ref()?;
        let value: V = disk.get(&self.disk_key(key))?;
        self.remember(key, value.clone());
        Some(value)
    }

    pub fn set(&self, key: &str, value: V) {
        if let Some(disk) = &self.disk {
            disk.set(&self.disk_key(key), &value);
        }
        self.remember(key, value);
    }

    fn remember(&self, key: &str, value: V) {
        let weight = value.weight();
        match &self.disk {
            Some(disk) => self.memory.set_with_ttl(key, value, weight, disk.ttl()),
            None => self.memory.set(key, value, weight),
        }
    }

    pub fn invalidate(&self, key: &str) {
        self.memory.invalidate(key);
        if let Some(disk) = &self.disk {
            disk.invalidate(&self.disk_key(key));
        }
    }

    /// Drop every entry of the memory tier
    pub fn invalidate_memory(&self) {
        self.memory.invalidate_all();
    }

    pub fn memory_stats(&self) -> CacheStats {
        self.memory.stats()
    }
}
