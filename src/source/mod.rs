//! Catalog sources
//!
//! A [`CatalogSource`] hands the core a validated list of resource records.
//! Parsing and schema checks happen here, before anything is indexed.
//!
//! ## Module Organization
//!
//! - `file.rs`: [`FileCatalogSource`], a YAML or JSON catalog document
//! - `validate.rs`: record validation shared by every source

pub mod file;
pub mod validate;

pub use file::{CatalogDocument, FileCatalogSource};
pub use validate::validate_records;

use crate::domain::Resource;
use crate::error::Result;

/// Supplier of catalog records
pub trait CatalogSource: Send + Sync {
    /// Human-readable origin, used in diagnostics
    fn origin(&self) -> String;

    /// Cheap identity of the current content
    ///
    /// Two calls return the same value only if `load` would return the same
    /// records. Used as the record cache key.
    fn fingerprint(&self) -> Result<String>;

    /// Load and validate every record
    fn load(&self) -> Result<Vec<Resource>>;
}

/// In-memory record list
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    records: Vec<Resource>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, records: Vec<Resource>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl CatalogSource for StaticSource {
    fn origin(&self) -> String {
        format!("static:{}", self.name)
    }

    fn fingerprint(&self) -> Result<String> {
        Ok(crate::catalog::fingerprint_records(&self.records))
    }

    fn load(&self) -> Result<Vec<Resource>> {
        validate_records(&self.origin(), &self.records)?;
        Ok(self.records.clone())
    }
}
