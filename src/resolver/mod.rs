//! Dependency resolution
//!
//! Turns a list of requested identifiers into an [`InstallPlan`]:
//!
//! 1. Build the subgraph reachable from the requests ([`DependencyGraph`])
//! 2. Reject cycles, reporting the loop ([`sort::find_cycle`])
//! 3. Order nodes dependencies-first ([`sort::install_order`])
//!
//! Pure computation over an immutable [`Catalog`]: no I/O, no caching.
//! A graph is built fresh for every request.

pub mod graph;
pub mod plan;
pub mod sort;

pub use graph::DependencyGraph;
pub use plan::InstallPlan;

use crate::catalog::Catalog;
use crate::error::Result;

/// Resolver bound to one catalog snapshot
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'c> {
    catalog: &'c Catalog,
}

impl<'c> Resolver<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Resolve `requested` and its transitive dependencies into install order
    ///
    /// # Errors
    ///
    /// - `CycleDetected` when the requested closure contains a loop
    /// - `UnresolvedDependency` when a declared dependency is not in the catalog
    pub fn resolve_order<S: AsRef<str>>(&self, requested: &[S]) -> Result<InstallPlan> {
        let (graph, unresolved) = DependencyGraph::build(self.catalog, requested)?;
        let order = sort::install_order(&graph)?;

        let resources = order
            .into_iter()
            .map(|node| self.catalog.all()[graph.position(node)].clone())
            .collect();

        if !unresolved.is_empty() {
            tracing::debug!(?unresolved, "requested identifiers not in catalog");
        }

        Ok(InstallPlan {
            resources,
            unresolved,
        })
    }
}

/// Shorthand for [`Resolver::resolve_order`]
pub fn resolve_order<S: AsRef<str>>(catalog: &Catalog, requested: &[S]) -> Result<InstallPlan> {
    Resolver::new(catalog).resolve_order(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Resource, ResourceType};
    use crate::error::RescatError;

    fn scenario() -> Catalog {
        Catalog::build(vec![
            Resource::new("api-client", ResourceType::Command, "api.md").with_dependency("auth"),
            Resource::new("auth", ResourceType::Hook, "auth.json"),
            Resource::new("web-server", ResourceType::Server, "web.json")
                .with_dependency("api-client"),
        ])
    }

    #[test]
    fn test_web_server_scenario() {
        let catalog = scenario();
        let plan = resolve_order(&catalog, &["web-server"]).unwrap();
        assert_eq!(plan.ids().collect::<Vec<_>>(), vec!["auth", "api-client", "web-server"]);
        assert!(plan.unresolved.is_empty());
    }

    #[test]
    fn test_unknown_request_is_reported_not_fatal() {
        let catalog = scenario();
        let plan = resolve_order(&catalog, &["auth", "missing"]).unwrap();
        assert_eq!(plan.ids().collect::<Vec<_>>(), vec!["auth"]);
        assert_eq!(plan.unresolved, vec!["missing".to_string()]);
    }

    #[test]
    fn test_breaking_the_cycle_makes_it_resolve() {
        let cyclic = Catalog::build(vec![
            Resource::new("a", ResourceType::Agent, "a.md").with_dependency("b"),
            Resource::new("b", ResourceType::Agent, "b.md").with_dependency("c"),
            Resource::new("c", ResourceType::Agent, "c.md").with_dependency("a"),
        ]);
        let err = resolve_order(&cyclic, &["a"]).unwrap_err();
        let RescatError::CycleDetected { cycle } = err else {
            panic!("expected a cycle");
        };
        for id in ["a", "b", "c"] {
            assert!(cycle.iter().any(|member| member == id));
        }

        let fixed = Catalog::build(vec![
            Resource::new("a", ResourceType::Agent, "a.md").with_dependency("b"),
            Resource::new("b", ResourceType::Agent, "b.md").with_dependency("c"),
            Resource::new("c", ResourceType::Agent, "c.md"),
        ]);
        let plan = resolve_order(&fixed, &["a"]).unwrap();
        assert_eq!(plan.ids().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_missing_dependency_names_both_ends() {
        let catalog = Catalog::build(vec![
            Resource::new("app", ResourceType::Agent, "app.md").with_dependency("lib"),
        ]);
        let err = resolve_order(&catalog, &["app"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dependency 'lib' (required by 'app') not found in catalog"
        );
    }

    #[test]
    fn test_duplicate_requests_are_deduplicated() {
        let catalog = scenario();
        let plan = resolve_order(&catalog, &["web-server", "auth", "web-server"]).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.position("auth"), Some(0));
    }
}
