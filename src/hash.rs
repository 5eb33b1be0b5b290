//! BLAKE3 hashing utilities
//!
//! Disk cache file names are a one-way hash of the logical key. Catalog
//! fingerprints and artifact checksums share the `blake3:` prefix.

/// Hash prefix for BLAKE3 checksums
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate the prefixed BLAKE3 checksum of a byte slice
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{}{}", HASH_PREFIX, blake3::hash(bytes).to_hex())
}

/// Hex digest of a logical cache key, safe to use as a file name
pub fn key_digest(key: &str) -> String {
    blake3::hash(key.as_bytes()).to_hex().to_string()
}

/// Verify a hash matches the expected value
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    // Normalize both hashes (ensure prefix)
    let normalize = |h: &str| {
        let h = h.trim().to_lowercase();
        if h.starts_with(HASH_PREFIX) {
            h
        } else {
            format!("{HASH_PREFIX}{h}")
        }
    };

    normalize(expected) == normalize(actual)
}
