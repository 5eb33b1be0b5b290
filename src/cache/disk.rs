//! Disk-backed cache store with time-to-live expiry
//!
//! ## Layout
//!
//! ```text
//! <cache root>/
//! └── entries/
//!     └── <blake3(key)>.json    { "key", "written_at_ms", "payload" }
//! ```
//!
//! File names are always a digest of the logical key. Reads never fail:
//! missing, unreadable, corrupted or expired entries are misses, and the last
//! two are deleted on the way out. Writes never fail either; problems are
//! logged as warnings and the caller carries on with its in-memory copy.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::paths::{ENTRIES_DIR, entry_file_name};
use super::stats::{CacheStats, DiskUsage};

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    key: String,
    written_at_ms: u64,
    payload: T,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// TTL-bounded store of serialized payloads under a cache root
pub struct DiskCache {
    entries_dir: PathBuf,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
}

impl DiskCache {
    /// Open (lazily) a disk cache rooted at `root`
    pub fn new(root: impl AsRef<Path>, ttl: Duration) -> Self {
        Self {
            entries_dir: root.as_ref().join(ENTRIES_DIR),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn entries_dir(&self) -> &Path {
        &self.entries_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.entries_dir.join(entry_file_name(key))
    }

    fn miss<T>(&self) -> Option<T> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            tracing::debug!(path = %path.display(), error = %e, "failed to remove cache entry");
        }
    }

    /// Read a payload if present, intact and younger than the TTL
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return self.miss(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable cache entry");
                return self.miss();
            }
        };

        let envelope: Envelope<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupted cache entry, discarding");
                self.discard(&path);
                return self.miss();
            }
        };

        if envelope.key != key {
            tracing::debug!(key, stored = %envelope.key, "cache digest collision");
            return self.miss();
        }

        let age = Duration::from_millis(now_ms().saturating_sub(envelope.written_at_ms));
        if age >= self.ttl {
            tracing::debug!(key, ?age, "cache entry expired");
            self.expirations.fetch_add(1, Ordering::Relaxed);
            self.discard(&path);
            return self.miss();
        }

        match serde_json::from_value(envelope.payload) {
            Ok(payload) => {
                tracing::debug!(key, ?age, "disk cache hit");
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(payload)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache payload has unexpected shape, discarding");
                self.discard(&path);
                self.miss()
            }
        }
    }

    /// Persist a payload; returns whether the write landed
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.write_entry(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to write cache entry");
                false
            }
        }
    }

    fn write_entry<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> std::io::Result<()> {
        let envelope = Envelope {
            key: key.to_string(),
            written_at_ms: now_ms(),
            payload: value,
        };
        let encoded = serde_json::to_vec(&envelope)?;

        fs::create_dir_all(&self.entries_dir)?;
        let mut temp = tempfile::NamedTempFile::new_in(&self.entries_dir)?;
        temp.write_all(&encoded)?;
        temp.as_file().sync_all()?;
        temp.persist(self.entry_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    /// Remove one entry; returns whether a file was removed
    pub fn invalidate(&self, key: &str) -> bool {
        fs::remove_file(self.entry_path(key)).is_ok()
    }

    /// Remove every entry under the cache root
    pub fn clear(&self) -> std::io::Result<()> {
        match fs::remove_dir_all(&self.entries_dir) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Files and bytes currently on disk
    pub fn usage(&self) -> DiskUsage {
        let mut usage = DiskUsage::default();
        for entry in WalkDir::new(&self.entries_dir)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            usage.files += 1;
            usage.total_size += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
        usage
    }

    pub fn stats(&self) -> CacheStats {
        let usage = self.usage();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: 0,
            expirations: self.expirations.load(Ordering::Relaxed),
            entries: usage.files,
            current_size: usage.total_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(86_400);

    #[test]
    fn test_round_trip_and_hashed_file_name() {
        let temp = TempDir::new().unwrap();
        let cache = DiskCache::new(temp.path(), DAY);

        assert!(cache.set("records:../../etc", &vec!["a", "b"]));
        let value: Option<Vec<String>> = cache.get("records:../../etc");
        assert_eq!(value, Some(vec!["a".to_string(), "b".to_string()]));

        let names: Vec<String> = fs::read_dir(cache.entries_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(!names[0].contains("etc"));
        assert!(names[0].ends_with(".json"));
    }

    #[test]
    fn test_missing_entry_is_miss() {
        let temp = TempDir::new().unwrap();
        let cache = DiskCache::new(temp.path(), DAY);
        assert_eq!(cache.get::<String>("nope"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_corrupted_entry_is_miss_and_removed() {
        let temp = TempDir::new().unwrap();
        let cache = DiskCache::new(temp.path(), DAY);
        assert!(cache.set("k", &42u32));

        let path = cache.entry_path("k");
        fs::write(&path, b"{ not json").unwrap();

        assert_eq!(cache.get::<u32>("k"), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_wrong_payload_shape_is_miss() {
        let temp = TempDir::new().unwrap();
        let cache = DiskCache::new(temp.path(), DAY);
        assert!(cache.set("k", &"text"));
        assert_eq!(cache.get::<Vec<u32>>("k"), None);
    }

    #[test]
    fn test_expired_entry_is_miss_and_removed() {
        let temp = TempDir::new().unwrap();
        let cache = DiskCache::new(temp.path(), Duration::from_secs(60));

        let stale = Envelope {
            key: "k".to_string(),
            written_at_ms: now_ms() - 120_000,
            payload: 7u32,
        };
        fs::create_dir_all(cache.entries_dir()).unwrap();
        let path = cache.entry_path("k");
        fs::write(&path, serde_json::to_vec(&stale).unwrap()).unwrap();

        assert_eq!(cache.get::<u32>("k"), None);
        assert!(!path.exists());
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let temp = TempDir::new().unwrap();
        let cache = DiskCache::new(temp.path(), Duration::ZERO);
        assert!(cache.set("k", &1u8));
        assert_eq!(cache.get::<u8>("k"), None);
    }

    #[test]
    fn test_write_failure_is_absorbed() {
        let temp = TempDir::new().unwrap();
        // A regular file where the cache root directory should be
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let cache = DiskCache::new(&blocker, DAY);

        assert!(!cache.set("k", &1u8));
        assert_eq!(cache.get::<u8>("k"), None);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let temp = TempDir::new().unwrap();
        let cache = DiskCache::new(temp.path(), DAY);
        cache.set("a", &1u8);
        cache.set("b", &2u8);
        assert_eq!(cache.usage().files, 2);

        assert!(cache.invalidate("a"));
        assert_eq!(cache.get::<u8>("a"), None);

        cache.clear().unwrap();
        assert_eq!(cache.usage().files, 0);
        // Clearing twice is fine
        cache.clear().unwrap();
    }
}
