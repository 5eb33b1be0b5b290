//! Category paths derived from resource identifiers
//!
//! A category is never stored on a record; it is recomputed from the
//! identifier's structure every time the catalog is built:
//!
//! ```text
//! "linter"                        -> general            / linter
//! "security/audit"                -> security           / audit
//! "dev/frontend/react-expert"     -> dev    / frontend  / react-expert
//! "dev/frontend/react/hooks-pro"  -> dev    / frontend  / react/hooks-pro
//! ```

use std::fmt;

use serde::Serialize;

/// Structural separator inside resource identifiers
pub const CATEGORY_SEPARATOR: char = '/';

/// Primary category for single-segment identifiers
pub const DEFAULT_CATEGORY: &str = "general";

/// Hierarchical category label (1-3 levels) of a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CategoryPath {
    /// First identifier segment, or [`DEFAULT_CATEGORY`]
    pub primary: String,
    /// Second segment when the identifier has three or more segments
    pub secondary: Option<String>,
    /// Remaining segments
    pub leaf: String,
}

impl CategoryPath {
    /// Derive the category path of an identifier
    pub fn from_id(id: &str) -> Self {
        let mut parts = id.splitn(3, CATEGORY_SEPARATOR);
        let first = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (None, _) => Self {
                primary: DEFAULT_CATEGORY.to_string(),
                secondary: None,
                leaf: first.to_string(),
            },
            (Some(leaf), None) => Self {
                primary: first.to_string(),
                secondary: None,
                leaf: leaf.to_string(),
            },
            (Some(second), Some(rest)) => Self {
                primary: first.to_string(),
                secondary: Some(second.to_string()),
                leaf: rest.to_string(),
            },
        }
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.secondary {
            Some(secondary) => write!(f, "{}/{}", self.primary, secondary),
            None => f.write_str(&self.primary),
        }
    }
}
