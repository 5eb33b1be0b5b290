//! Category tree built from identifier-derived category paths
//!
//! Two levels of grouping (primary, optional secondary); leaves are catalog
//! positions. Recomputed on every catalog build.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::CategoryPath;

/// One primary category and its members
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub name: String,
    /// Members without a secondary category
    pub members: Vec<usize>,
    /// Secondary category -> members
    pub subcategories: BTreeMap<String, Vec<usize>>,
}

impl CategoryNode {
    /// Members across the whole primary, in catalog order
    pub fn all_members(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self
            .members
            .iter()
            .chain(self.subcategories.values().flatten())
            .copied()
            .collect();
        all.sort_unstable();
        all
    }

    pub fn total(&self) -> usize {
        self.members.len() + self.subcategories.values().map(Vec::len).sum::<usize>()
    }
}

/// Count summary of one category, for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
    pub subcategories: Vec<(String, usize)>,
}

/// Hierarchical category view of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTree {
    primaries: BTreeMap<String, CategoryNode>,
}

impl CategoryTree {
    pub fn insert(&mut self, path: &CategoryPath, position: usize) {
        let node = self
            .primaries
            .entry(path.primary.clone())
            .or_insert_with(|| CategoryNode {
                name: path.primary.clone(),
                ..CategoryNode::default()
            });

        match &path.secondary {
            Some(secondary) => node
                .subcategories
                .entry(secondary.clone())
                .or_default()
                .push(position),
            None => node.members.push(position),
        }
    }

    /// Primary categories in name order
    pub fn primaries(&self) -> impl Iterator<Item = &CategoryNode> {
        self.primaries.values()
    }

    pub fn get(&self, primary: &str) -> Option<&CategoryNode> {
        self.primaries.get(primary)
    }

    /// Catalog positions in a category; `None` secondary means the whole primary
    pub fn positions(&self, primary: &str, secondary: Option<&str>) -> Vec<usize> {
        let Some(node) = self.primaries.get(primary) else {
            return Vec::new();
        };
        match secondary {
            Some(secondary) => node.subcategories.get(secondary).cloned().unwrap_or_default(),
            None => node.all_members(),
        }
    }

    pub fn len(&self) -> usize {
        self.primaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primaries.is_empty()
    }

    pub fn summary(&self) -> Vec<CategorySummary> {
        self.primaries
            .values()
            .map(|node| CategorySummary {
                name: node.name.clone(),
                count: node.total(),
                subcategories: node
                    .subcategories
                    .iter()
                    .map(|(name, members)| (name.clone(), members.len()))
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_CATEGORY;

    fn tree(ids: &[&str]) -> CategoryTree {
        let mut tree = CategoryTree::default();
        for (i, id) in ids.iter().enumerate() {
            tree.insert(&CategoryPath::from_id(id), i);
        }
        tree
    }

    #[test]
    fn test_groups_by_primary_and_secondary() {
        let tree = tree(&[
            "dev/frontend/react",
            "dev/backend/go",
            "dev/frontend/vue",
            "security/audit",
            "linter",
        ]);

        let names: Vec<&str> = tree.primaries().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["dev", DEFAULT_CATEGORY, "security"]);

        assert_eq!(tree.positions("dev", Some("frontend")), vec![0, 2]);
        assert_eq!(tree.positions("dev", None), vec![0, 1, 2]);
        assert_eq!(tree.positions("security", None), vec![3]);
        assert_eq!(tree.positions(DEFAULT_CATEGORY, None), vec![4]);
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let tree = tree(&["a/b"]);
        assert!(tree.positions("zzz", None).is_empty());
        assert!(tree.positions("a", Some("zzz")).is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let tree = tree(&["dev/frontend/react", "dev/frontend/vue", "dev/tools"]);
        let summary = tree.summary();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].count, 3);
        assert_eq!(summary[0].subcategories, vec![("frontend".to_string(), 2)]);
    }
}
