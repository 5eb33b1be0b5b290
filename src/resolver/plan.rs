//! Install plan produced by the resolver

use serde::Serialize;

use crate::domain::Resource;

/// Ordered, deduplicated resources to install
///
/// Every resource comes after all of its dependencies. Requested
/// identifiers the catalog does not know are listed in `unresolved`
/// instead of failing the resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallPlan {
    pub resources: Vec<Resource>,
    pub unresolved: Vec<String>,
}

impl InstallPlan {
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|resource| resource.id.as_str())
    }

    /// Position of `id` in install order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids().position(|candidate| candidate == id)
    }
}
