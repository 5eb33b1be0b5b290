//! Cache layer for rescat
//!
//! Two stores with one contract (`get` / `set` / `invalidate` / `stats`):
//!
//! - [`MemoryCache`]: bounded LRU, limited by entry count and by a byte
//!   budget. Shared between concurrent fetch tasks.
//! - [`DiskCache`]: TTL-bounded JSON entries under the cache root, named by a
//!   BLAKE3 digest of the key. Corruption and write failures are absorbed.
//!
//! [`TieredCache`] stacks the two for payloads worth keeping across runs
//! (parsed catalog records, fetched artifacts).
//!
//! ## Cache Structure
//!
//! ```text
//! ~/.cache/rescat/
//! └── entries/
//!     └── <blake3-of-key>.json
//! ```
//!
//! A miss never has side effects; callers populate on miss.

pub mod blob;
pub mod disk;
pub mod memory;
pub mod paths;
pub mod stats;
pub mod tiered;

use std::sync::Arc;

pub use blob::Blob;
pub use disk::DiskCache;
pub use memory::MemoryCache;
pub use paths::cache_dir;
pub use stats::{CacheStats, DiskUsage, format_size};
pub use tiered::TieredCache;

use crate::domain::Resource;

/// Byte-size estimate used against a cache's byte budget
pub trait Weigh {
    fn weight(&self) -> u64;
}

impl Weigh for Resource {
    fn weight(&self) -> u64 {
        let deps: usize = self
            .dependencies
            .iter()
            .map(|(name, id)| name.len() + id.len())
            .sum();
        (self.id.len()
            + self.name.len()
            + self.description.len()
            + self.source.location.len()
            + deps
            + 64) as u64
    }
}

impl<T: Weigh> Weigh for Vec<T> {
    fn weight(&self) -> u64 {
        self.iter().map(Weigh::weight).sum()
    }
}

impl<T: Weigh + ?Sized> Weigh for Arc<T> {
    fn weight(&self) -> u64 {
        (**self).weight()
    }
}
