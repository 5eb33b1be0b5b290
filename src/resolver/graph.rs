//! Dependency graph over an arena of node indexes
//!
//! Nodes are the resources reachable from the requested identifiers; an
//! edge `a -> b` means `a` depends on `b`. Node indexes are assigned in
//! depth-first discovery order starting from the requests, in request
//! order, so an index doubles as the node's tie-break rank.
//!
//! ```text
//! requested: [web-server]
//!
//!   web-server(0) --> api-client(1) --> auth(2)
//! ```

use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::error::{Result, deps};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    ids: Vec<String>,
    /// Catalog position of each node
    positions: Vec<usize>,
    index: HashMap<String, usize>,
    /// node -> dependencies, each listed once
    edges: Vec<Vec<usize>>,
    /// Requested nodes, deduplicated, in request order
    roots: Vec<usize>,
}

impl DependencyGraph {
    /// Build the subgraph reachable from `requested`
    ///
    /// Requested identifiers missing from the catalog are returned as the
    /// second element. A declared dependency missing from the catalog fails
    /// the whole build.
    pub fn build<S: AsRef<str>>(catalog: &Catalog, requested: &[S]) -> Result<(Self, Vec<String>)> {
        let mut graph = Self::default();
        let mut unresolved: Vec<String> = Vec::new();

        for id in requested {
            let id = id.as_ref();
            let Some(position) = catalog.position(id) else {
                if !unresolved.iter().any(|u| u == id) {
                    unresolved.push(id.to_string());
                }
                continue;
            };

            if let Some(&node) = graph.index.get(id) {
                if !graph.roots.contains(&node) {
                    graph.roots.push(node);
                }
                continue;
            }

            let root = graph.intern(id, position);
            graph.roots.push(root);
            graph.discover(catalog, root)?;
        }

        Ok((graph, unresolved))
    }

    /// Depth-first walk from `root`, interning every newly seen dependency
    fn discover(&mut self, catalog: &Catalog, root: usize) -> Result<()> {
        // (node, index of the next dependency to visit)
        let mut stack = vec![(root, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let resource = &catalog.all()[self.positions[node]];
            let Some(dep_id) = resource.dependency_ids().nth(next) else {
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let dep = match self.index.get(dep_id) {
                Some(&dep) => dep,
                None => {
                    let Some(position) = catalog.position(dep_id) else {
                        return Err(deps::unresolved(dep_id, resource.id.as_str()));
                    };
                    let dep = self.intern(dep_id, position);
                    stack.push((dep, 0));
                    dep
                }
            };

            if !self.edges[node].contains(&dep) {
                self.edges[node].push(dep);
            }
        }

        Ok(())
    }

    fn intern(&mut self, id: &str, position: usize) -> usize {
        let node = self.ids.len();
        self.ids.push(id.to_string());
        self.positions.push(position);
        self.index.insert(id.to_string(), node);
        self.edges.push(Vec::new());
        node
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id(&self, node: usize) -> &str {
        &self.ids[node]
    }

    pub fn node(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn position(&self, node: usize) -> usize {
        self.positions[node]
    }

    /// Direct dependencies of `node`
    pub fn dependencies(&self, node: usize) -> &[usize] {
        &self.edges[node]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Resource, ResourceType};
    use crate::error::RescatError;

    fn catalog() -> Catalog {
        Catalog::build(vec![
            Resource::new("web-server", ResourceType::Server, "w.json").with_dependency("api-client"),
            Resource::new("api-client", ResourceType::Command, "a.md").with_dependency("auth"),
            Resource::new("auth", ResourceType::Hook, "h.json"),
            Resource::new("unrelated", ResourceType::Agent, "u.md"),
            Resource::new("broken", ResourceType::Agent, "b.md").with_dependency("ghost"),
        ])
    }

    #[test]
    fn test_builds_reachable_subgraph_only() {
        let catalog = catalog();
        let (graph, unresolved) = DependencyGraph::build(&catalog, &["web-server"]).unwrap();

        assert!(unresolved.is_empty());
        assert_eq!(graph.len(), 3);
        assert!(graph.node("unrelated").is_none());
        assert_eq!(graph.id(0), "web-server");
        assert_eq!(graph.dependencies(0), &[1]);
        assert_eq!(graph.dependencies(1), &[2]);
        assert!(graph.dependencies(2).is_empty());
    }

    #[test]
    fn test_unknown_requested_ids_are_collected() {
        let catalog = catalog();
        let (graph, unresolved) =
            DependencyGraph::build(&catalog, &["nope", "auth", "nope"]).unwrap();

        assert_eq!(unresolved, vec!["nope".to_string()]);
        assert_eq!(graph.roots(), &[0]);
    }

    #[test]
    fn test_missing_dependency_fails() {
        let catalog = catalog();
        let err = DependencyGraph::build(&catalog, &["broken"]).unwrap_err();
        assert!(matches!(
            err,
            RescatError::UnresolvedDependency { ref missing, ref required_by }
                if missing == "ghost" && required_by == "broken"
        ));
    }

    #[test]
    fn test_requested_dependency_becomes_root_once() {
        let catalog = catalog();
        let (graph, _) = DependencyGraph::build(&catalog, &["web-server", "auth", "auth"]).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.roots(), &[0, 2]);
    }
}
