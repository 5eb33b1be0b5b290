//! Owner of the current catalog
//!
//! Readers take a cheap `Arc<Catalog>` snapshot; loads build a complete new
//! catalog off to the side and swap it in under a write lock held only for
//! the pointer assignment. A reader therefore sees either the old index or
//! the new one, never a partially built one.

use std::sync::{Arc, PoisonError, RwLock};

use super::{Catalog, fingerprint_records};
use crate::cache::{CacheStats, MemoryCache, TieredCache, Weigh};
use crate::domain::Resource;
use crate::error::Result;
use crate::source::CatalogSource;

/// Namespace of parsed record lists in the disk cache
pub const RECORDS_NAMESPACE: &str = "records";

pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
    /// Parsed records keyed by source fingerprint
    records: TieredCache<Vec<Resource>>,
    /// Built catalogs keyed by record fingerprint
    builds: MemoryCache<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(records: TieredCache<Vec<Resource>>, builds: MemoryCache<Arc<Catalog>>) -> Self {
        Self {
            current: RwLock::new(Arc::new(Catalog::default())),
            records,
            builds,
        }
    }

    /// Store without a disk tier, for tests and one-shot use
    pub fn in_memory(max_entries: usize, max_bytes: u64) -> Self {
        Self::new(
            TieredCache::new(RECORDS_NAMESPACE, MemoryCache::new(max_entries, max_bytes), None),
            MemoryCache::new(max_entries, max_bytes),
        )
    }

    /// Snapshot of the current catalog
    pub fn current(&self) -> Arc<Catalog> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Load records from `source` (through the record cache) and swap in their catalog
    pub fn load(&self, source: &dyn CatalogSource) -> Result<Arc<Catalog>> {
        let key = source.fingerprint()?;

        let records = match self.records.get(&key) {
            Some(records) => {
                tracing::debug!(origin = %source.origin(), "catalog records served from cache");
                records
            }
            None => {
                let records = source.load()?;
                tracing::debug!(
                    origin = %source.origin(),
                    resources = records.len(),
                    "parsed catalog source"
                );
                self.records.set(&key, records.clone());
                records
            }
        };

        Ok(self.replace(records))
    }

    /// Build (or reuse) the catalog for `records` and make it current
    pub fn replace(&self, records: Vec<Resource>) -> Arc<Catalog> {
        let fingerprint = fingerprint_records(&records);

        let catalog = match self.builds.get(&fingerprint) {
            Some(catalog) => {
                tracing::debug!(fingerprint = %fingerprint, "reusing memoized catalog build");
                catalog
            }
            None => {
                let catalog = Arc::new(Catalog::build(records));
                self.builds
                    .set(fingerprint, Arc::clone(&catalog), catalog.weight());
                catalog
            }
        };

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&catalog);
        catalog
    }

    /// Forget memoized builds and the cached records of `source`
    ///
    /// The current catalog stays in place until the next load.
    pub fn invalidate(&self, source: &dyn CatalogSource) -> Result<()> {
        self.builds.invalidate_all();
        self.records.invalidate_memory();
        let key = source.fingerprint()?;
        self.records.invalidate(&key);
        Ok(())
    }

    /// Forget every memoized build and in-memory record list
    pub fn clear_memory(&self) {
        self.builds.invalidate_all();
        self.records.invalidate_memory();
    }

    pub fn build_stats(&self) -> CacheStats {
        self.builds.stats()
    }

    pub fn record_stats(&self) -> CacheStats {
        self.records.memory_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceType;
    use crate::source::StaticSource;

    fn records(ids: &[&str]) -> Vec<Resource> {
        ids.iter()
            .map(|id| Resource::new(*id, ResourceType::Agent, format!("{id}.md")))
            .collect()
    }

    #[test]
    fn test_starts_empty() {
        let store = CatalogStore::in_memory(8, 1 << 20);
        assert!(store.current().is_empty());
    }

    #[test]
    fn test_load_swaps_catalog() {
        let store = CatalogStore::in_memory(8, 1 << 20);
        let before = store.current();

        let source = StaticSource::new("test", records(&["a", "b"]));
        let loaded = store.load(&source).unwrap();

        assert_eq!(loaded.len(), 2);
        assert!(before.is_empty());
        assert!(Arc::ptr_eq(&loaded, &store.current()));
    }

    #[test]
    fn test_identical_records_reuse_build() {
        let store = CatalogStore::in_memory(8, 1 << 20);
        let first = store.replace(records(&["a", "b"]));
        let second = store.replace(records(&["a", "b"]));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.build_stats().hits, 1);
    }

    #[test]
    fn test_changed_records_rebuild() {
        let store = CatalogStore::in_memory(8, 1 << 20);
        let first = store.replace(records(&["a"]));
        let second = store.replace(records(&["a", "b"]));

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(store.current().len(), 2);
    }

    #[test]
    fn test_second_load_hits_record_cache() {
        let store = CatalogStore::in_memory(8, 1 << 20);
        let source = StaticSource::new("test", records(&["a"]));
        store.load(&source).unwrap();
        store.load(&source).unwrap();
        assert_eq!(store.record_stats().hits, 1);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let store = CatalogStore::in_memory(8, 1 << 20);
        let source = StaticSource::new("test", records(&["a"]));
        let first = store.load(&source).unwrap();

        store.invalidate(&source).unwrap();
        assert_eq!(store.current().len(), 1);

        let second = store.load(&source).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.as_ref(), second.as_ref());
    }

    #[test]
    fn test_concurrent_readers_see_whole_catalogs() {
        let store = Arc::new(CatalogStore::in_memory(8, 1 << 20));
        let small = records(&["a"]);
        let large = records(&["a", "b", "c", "d"]);

        std::thread::scope(|scope| {
            let writer = Arc::clone(&store);
            scope.spawn(move || {
                for i in 0..50 {
                    let next = if i % 2 == 0 { large.clone() } else { small.clone() };
                    writer.replace(next);
                }
            });
            for _ in 0..4 {
                let reader = Arc::clone(&store);
                scope.spawn(move || {
                    for _ in 0..200 {
                        let catalog = reader.current();
                        let len = catalog.len();
                        assert!(len == 0 || len == 1 || len == 4);
                        assert_eq!(catalog.lookup_prefix("").len(), len);
                    }
                });
            }
        });
    }
}
