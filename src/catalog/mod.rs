//! Catalog index
//!
//! A [`Catalog`] is built once from a flat list of resource records and is
//! immutable afterwards. Building derives three read structures in one pass:
//!
//! 1. **Exact table**: identifier -> position
//! 2. **Prefix trie**: identifier characters -> positions ([`PrefixTrie`])
//! 3. **Category tree**: identifier-derived category path -> positions
//!
//! Positions are indexes into the record list, which keeps insertion order.
//! Updates never mutate a catalog: [`CatalogStore`] builds a new one and
//! swaps the shared `Arc` in a single step.

pub mod browse;
pub mod category;
pub mod store;
pub mod trie;

use std::collections::HashMap;

use blake3::Hasher;

pub use browse::{BrowseQuery, Filter, FilterField, SortField, browse};
pub use category::{CategoryNode, CategorySummary, CategoryTree};
pub use store::CatalogStore;
pub use trie::PrefixTrie;

use crate::cache::Weigh;
use crate::domain::Resource;
use crate::hash::HASH_PREFIX;

/// Immutable resource catalog plus its derived indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<Resource>,
    exact: HashMap<String, usize>,
    trie: PrefixTrie,
    categories: CategoryTree,
    fingerprint: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::build(Vec::new())
    }
}

impl Catalog {
    /// Build a catalog and all its indexes in one pass over `records`
    ///
    /// Identifiers are expected to be unique; a repeated identifier keeps
    /// its first record and the repeat is dropped with a warning.
    pub fn build(records: Vec<Resource>) -> Self {
        let fingerprint = fingerprint_records(&records);

        let mut kept = Vec::with_capacity(records.len());
        let mut exact = HashMap::with_capacity(records.len());
        let mut trie = PrefixTrie::new();
        let mut categories = CategoryTree::default();

        for record in records {
            if exact.contains_key(&record.id) {
                tracing::warn!(id = %record.id, "duplicate resource identifier, keeping first");
                continue;
            }
            let position = kept.len();
            let path = record.category();

            exact.insert(record.id.clone(), position);
            trie.insert(&record.id, position);
            categories.insert(&path, position);
            kept.push(record);
        }

        tracing::debug!(
            resources = kept.len(),
            categories = categories.len(),
            trie_nodes = trie.node_count(),
            "built catalog index"
        );

        Self {
            records: kept,
            exact,
            trie,
            categories,
            fingerprint,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record, in insertion order
    pub fn all(&self) -> &[Resource] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&Resource> {
        self.records.get(position)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.exact.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.exact.contains_key(id)
    }

    pub fn lookup_exact(&self, id: &str) -> Option<&Resource> {
        self.position(id).map(|position| &self.records[position])
    }

    /// Positions of identifiers starting with `prefix`, in insertion order
    pub fn prefix_positions(&self, prefix: &str) -> Vec<usize> {
        self.trie.positions_with_prefix(prefix)
    }

    /// Records whose identifier starts with `prefix`, in insertion order
    ///
    /// The empty prefix matches every record.
    pub fn lookup_prefix(&self, prefix: &str) -> Vec<&Resource> {
        self.prefix_positions(prefix)
            .into_iter()
            .map(|position| &self.records[position])
            .collect()
    }

    pub fn category_tree(&self) -> &CategoryTree {
        &self.categories
    }

    /// Records in a category; `None` secondary lists the whole primary
    pub fn in_category(&self, primary: &str, secondary: Option<&str>) -> Vec<&Resource> {
        self.categories
            .positions(primary, secondary)
            .into_iter()
            .map(|position| &self.records[position])
            .collect()
    }

    /// Digest of the records this catalog was built from
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl Weigh for Catalog {
    fn weight(&self) -> u64 {
        // Records plus roughly the same again for the three indexes
        self.records.weight() * 2
    }
}

/// Digest of a record list, sensitive to content and order
pub fn fingerprint_records(records: &[Resource]) -> String {
    let mut hasher = Hasher::new();
    for record in records {
        for field in [
            record.id.as_str(),
            record.name.as_str(),
            record.resource_type.as_str(),
            record.source.location.as_str(),
            record
                .source
                .scheme
                .map_or("", crate::domain::TransportScheme::as_str),
            record.source.checksum.as_deref().unwrap_or(""),
            record.description.as_str(),
            record.version.as_deref().unwrap_or(""),
        ] {
            hasher.update(field.as_bytes());
            hasher.update(b"\0");
        }
        hasher.update(&record.updated_at.unwrap_or(0).to_le_bytes());
        for (name, target) in &record.dependencies {
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(target.as_bytes());
            hasher.update(b"\0");
        }
        hasher.update(b"\x1e");
    }
    format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex())
}

#[cfg(test)]
mod tests;
