//! High-level operations behind the command line
//!
//! [`CatalogService`] wires the configured caches into the catalog store,
//! the search engine and the batch installer, and exposes one call per user
//! action:
//! - `load`: read a catalog source and swap in its index
//! - `search` / `browse` / `categories`: queries over a catalog snapshot
//! - `plan`: dependency resolution
//! - `installer`: a configured [`BatchInstaller`] for a destination root
//! - `cache_report` / `clear_cache`: cache maintenance

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::cache::{CacheStats, DiskCache, DiskUsage, MemoryCache, TieredCache};
use crate::catalog::{self, BrowseQuery, Catalog, CatalogStore, CategoryTree};
use crate::config::{CacheSettings, Config};
use crate::domain::Resource;
use crate::error::{Result, fs};
use crate::installer::{
    ARTIFACT_NAMESPACE, ArtifactCache, BatchInstaller, FileTransport, TypedLayout,
};
use crate::resolver::{self, InstallPlan};
use crate::search::{SearchCache, SearchEngine, SearchHit};
use crate::source::CatalogSource;

/// Counters of every cache the service owns
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheReport {
    pub records: CacheStats,
    pub builds: CacheStats,
    pub searches: CacheStats,
    pub artifacts: CacheStats,
    /// `None` when the disk tier is disabled
    pub disk: Option<DiskUsage>,
}

impl CacheReport {
    /// Counters of every in-memory store added together
    pub fn memory_total(&self) -> CacheStats {
        self.records
            .combined(&self.builds)
            .combined(&self.searches)
            .combined(&self.artifacts)
    }
}

/// In-memory tier sized by the cache settings
fn memory<V: Clone>(settings: &CacheSettings) -> MemoryCache<V> {
    MemoryCache::new(settings.max_entries, settings.max_bytes)
}

pub struct CatalogService {
    config: Config,
    store: CatalogStore,
    search: SearchEngine,
    searches: Arc<SearchCache>,
    artifacts: Arc<ArtifactCache>,
    disk: Option<Arc<DiskCache>>,
}

impl CatalogService {
    /// Service with the disk tier the configuration asks for
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the cache root cannot be
    /// determined.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let disk = if config.cache.disk {
            let root = config.cache.root()?;
            tracing::debug!(root = %root.display(), "disk cache enabled");
            Some(Arc::new(DiskCache::new(root, config.cache.ttl())))
        } else {
            None
        };
        Ok(Self::with_disk(config, disk))
    }

    /// Service without a disk tier
    pub fn in_memory(config: Config) -> Self {
        Self::with_disk(config, None)
    }

    fn with_disk(config: Config, disk: Option<Arc<DiskCache>>) -> Self {
        let settings = &config.cache;

        let store = CatalogStore::new(
            TieredCache::new(
                catalog::store::RECORDS_NAMESPACE,
                memory(settings),
                disk.clone(),
            ),
            memory(settings),
        );
        let searches = Arc::new(memory(settings));
        let search = SearchEngine::new(config.search.clone()).with_cache(Arc::clone(&searches));
        let artifacts = Arc::new(TieredCache::new(
            ARTIFACT_NAMESPACE,
            memory(settings),
            disk.clone(),
        ));

        Self {
            config,
            store,
            search,
            searches,
            artifacts,
            disk,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load `source` and make its catalog current
    pub fn load(&self, source: &dyn CatalogSource) -> Result<Arc<Catalog>> {
        self.store.load(source)
    }

    /// Snapshot of the current catalog
    pub fn catalog(&self) -> Arc<Catalog> {
        self.store.current()
    }

    pub fn search<'c>(&self, catalog: &'c Catalog, query: &str, limit: usize) -> Vec<SearchHit<'c>> {
        self.search.search(catalog, query, limit)
    }

    pub fn browse<'c>(&self, catalog: &'c Catalog, query: &BrowseQuery) -> Vec<&'c Resource> {
        catalog::browse(catalog, query)
    }

    pub fn categories<'c>(&self, catalog: &'c Catalog) -> &'c CategoryTree {
        catalog.category_tree()
    }

    /// Resolve `requested` into install order
    pub fn plan<S: AsRef<str>>(&self, catalog: &Catalog, requested: &[S]) -> Result<InstallPlan> {
        resolver::resolve_order(catalog, requested)
    }

    /// Installer writing under `root` with the configured options
    pub fn installer(&self, root: &Path) -> BatchInstaller {
        BatchInstaller::new(Arc::new(FileTransport), Arc::new(TypedLayout::new(root)))
            .with_options(self.config.install.options())
            .with_artifact_cache(Arc::clone(&self.artifacts))
    }

    pub fn cache_report(&self) -> CacheReport {
        CacheReport {
            records: self.store.record_stats(),
            builds: self.store.build_stats(),
            searches: self.searches.stats(),
            artifacts: self.artifacts.memory_stats(),
            disk: self.disk.as_ref().map(|disk| disk.usage()),
        }
    }

    /// Drop every cached entry, memory and disk
    pub fn clear_cache(&self) -> Result<()> {
        self.store.clear_memory();
        self.searches.invalidate_all();
        self.artifacts.invalidate_memory();
        if let Some(disk) = &self.disk {
            disk.clear()
                .map_err(|e| fs::write_failed(disk.entries_dir(), e))?;
            tracing::debug!(dir = %disk.entries_dir().display(), "disk cache cleared");
        }
        Ok(())
    }
}
