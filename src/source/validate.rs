//! Record validation
//!
//! Rejects records the indexes cannot represent. Checks are structural only;
//! whether a dependency target exists is the resolver's concern.

use std::collections::HashSet;

use crate::domain::{CATEGORY_SEPARATOR, Resource};
use crate::error::{Result, source};

/// Validate one record
pub fn validate_record(origin: &str, resource: &Resource) -> Result<()> {
    let id = &resource.id;

    if id.is_empty() {
        return Err(source::invalid(origin, "resource identifier cannot be empty"));
    }
    if id.chars().any(char::is_whitespace) {
        return Err(source::invalid(
            origin,
            format!("resource identifier '{id}' contains whitespace"),
        ));
    }
    if id.starts_with(CATEGORY_SEPARATOR) || id.ends_with(CATEGORY_SEPARATOR) {
        return Err(source::invalid(
            origin,
            format!("resource identifier '{id}' cannot start or end with '{CATEGORY_SEPARATOR}'"),
        ));
    }
    if id.split(CATEGORY_SEPARATOR).any(|segment| segment.is_empty() || segment == "..") {
        return Err(source::invalid(
            origin,
            format!("resource identifier '{id}' has an empty or '..' segment"),
        ));
    }
    if resource.source.location.trim().is_empty() {
        return Err(source::invalid(
            origin,
            format!("resource '{id}' has an empty source location"),
        ));
    }
    for (name, target) in &resource.dependencies {
        if target.trim().is_empty() {
            return Err(source::invalid(
                origin,
                format!("dependency '{name}' of '{id}' has an empty target"),
            ));
        }
    }

    Ok(())
}

/// Validate every record and reject duplicate identifiers
pub fn validate_records(origin: &str, records: &[Resource]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for resource in records {
        validate_record(origin, resource)?;
        if !seen.insert(resource.id.as_str()) {
            return Err(source::invalid(
                origin,
                format!("duplicate resource identifier '{}'", resource.id),
            ));
        }
    }
    Ok(())
}
