//! Cache path utilities and constants
//!
//! This module resolves the cache root and names entries inside it.

use std::path::PathBuf;

use crate::error::{Result, cache};
use crate::hash;

/// Default cache directory name under user's cache directory
const CACHE_DIR: &str = "rescat";

/// Environment variable overriding the cache root
pub const CACHE_DIR_ENV: &str = "RESCAT_CACHE_DIR";

/// Entries subdirectory within the cache root
pub const ENTRIES_DIR: &str = "entries";

/// Get the default cache directory path
///
/// Uses the platform's standard cache location (e.g. XDG on Linux, Library/Caches on macOS)
/// with a `rescat` subdirectory. Can be overridden with the `RESCAT_CACHE_DIR` environment variable.
pub fn cache_dir() -> Result<PathBuf> {
    if let Ok(cache_dir) = std::env::var(CACHE_DIR_ENV) {
        return Ok(PathBuf::from(cache_dir));
    }

    let base = dirs::cache_dir()
        .ok_or_else(|| cache::operation_failed("Could not determine cache directory"))?;

    Ok(base.join(CACHE_DIR))
}

/// File name of the entry stored under a logical key
///
/// Only the digest of the key reaches the file system.
pub fn entry_file_name(key: &str) -> String {
    format!("{}.json", hash::key_digest(key))
}
