//! Cache statistics
//!
//! Counters reported by both cache stores, plus on-disk usage figures
//! for the `cache` command.

use serde::Serialize;

/// Format a byte count as a human-readable string
pub fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Hit/miss/eviction counters and current occupancy of a cache store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped to satisfy size bounds
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed
    pub expirations: u64,
    /// Entries currently held
    pub entries: usize,
    /// Tracked bytes currently held
    pub current_size: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, or `None` before the first lookup
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.hits + self.misses;
        if total == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.hits as f64 / total as f64;
        Some(rate)
    }

    pub fn formatted_size(&self) -> String {
        format_size(self.current_size)
    }

    /// Sum of two stores' counters
    pub fn combined(&self, other: &CacheStats) -> CacheStats {
        CacheStats {
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
            evictions: self.evictions + other.evictions,
            expirations: self.expirations + other.expirations,
            entries: self.entries + other.entries,
            current_size: self.current_size + other.current_size,
        }
    }
}

/// Files and bytes a disk cache occupies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    pub files: usize,
    pub total_size: u64,
}

impl DiskUsage {
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }
}
