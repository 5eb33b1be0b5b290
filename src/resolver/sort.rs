//! Cycle detection and topological ordering
//!
//! ## Cycle detection
//!
//! Iterative DFS with three-colour marking over arena indexes:
//!
//! 1. **White**: not visited
//! 2. **Gray**: on the current DFS path
//! 3. **Black**: fully explored
//!
//! Reaching a Gray node closes a loop; the path from that node to the top of
//! the stack, plus the node again, is the reported cycle. A self-dependency
//! is the one-node loop `[a, a]`.
//!
//! ## Ordering
//!
//! Kahn's algorithm: repeatedly emit a node whose dependencies have all been
//! emitted. Among ready nodes the lowest discovery rank goes first, which
//! keeps request order for independent resources.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::graph::DependencyGraph;
use crate::error::{Result, deps};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// First cycle found, as a closed node path (`[a, b, c, a]`)
pub fn find_cycle(graph: &DependencyGraph) -> Option<Vec<usize>> {
    let mut color = vec![Color::White; graph.len()];

    for start in 0..graph.len() {
        if color[start] != Color::White {
            continue;
        }
        color[start] = Color::Gray;
        let mut stack = vec![(start, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let Some(&dep) = graph.dependencies(node).get(next) else {
                color[node] = Color::Black;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match color[dep] {
                Color::White => {
                    color[dep] = Color::Gray;
                    stack.push((dep, 0));
                }
                Color::Gray => {
                    let from = stack.iter().position(|&(n, _)| n == dep).unwrap_or(0);
                    let mut cycle: Vec<usize> = stack[from..].iter().map(|&(n, _)| n).collect();
                    cycle.push(dep);
                    return Some(cycle);
                }
                Color::Black => {}
            }
        }
    }

    None
}

fn cycle_error(graph: &DependencyGraph, cycle: &[usize]) -> crate::error::RescatError {
    deps::cycle(cycle.iter().map(|&n| graph.id(n).to_string()).collect())
}

/// Nodes in install order: every node after all of its dependencies
///
/// # Errors
///
/// `CycleDetected` with the loop's identifiers when the graph is cyclic.
pub fn install_order(graph: &DependencyGraph) -> Result<Vec<usize>> {
    if let Some(cycle) = find_cycle(graph) {
        return Err(cycle_error(graph, &cycle));
    }

    let n = graph.len();
    let mut pending: Vec<usize> = (0..n).map(|node| graph.dependencies(node).len()).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for node in 0..n {
        for &dep in graph.dependencies(node) {
            dependents[dep].push(node);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&node| pending[node] == 0)
        .map(Reverse)
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &dependent in &dependents[node] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if order.len() < n {
        // Only reachable if find_cycle missed a loop
        let stuck: Vec<String> = (0..n)
            .filter(|&node| pending[node] > 0)
            .map(|node| graph.id(node).to_string())
            .collect();
        return Err(deps::cycle(stuck));
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::domain::{Resource, ResourceType};
    use crate::error::RescatError;

    fn resource(id: &str, deps: &[&str]) -> Resource {
        deps.iter().fold(
            Resource::new(id, ResourceType::Agent, format!("{id}.md")),
            |r, dep| r.with_dependency(*dep),
        )
    }

    fn order(catalog: &Catalog, requested: &[&str]) -> Result<Vec<String>> {
        let (graph, _) = DependencyGraph::build(catalog, requested)?;
        Ok(install_order(&graph)?
            .into_iter()
            .map(|n| graph.id(n).to_string())
            .collect())
    }

    fn cycle_of(result: Result<Vec<String>>) -> Vec<String> {
        match result {
            Err(RescatError::CycleDetected { cycle }) => cycle,
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_chain() {
        let catalog = Catalog::build(vec![
            resource("a", &["b"]),
            resource("b", &["c"]),
            resource("c", &[]),
        ]);
        assert_eq!(order(&catalog, &["a"]).unwrap(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_three_node_cycle_names_every_member() {
        let catalog = Catalog::build(vec![
            resource("a", &["b"]),
            resource("b", &["c"]),
            resource("c", &["a"]),
        ]);
        assert_eq!(cycle_of(order(&catalog, &["a"])), vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_self_dependency_is_one_node_cycle() {
        let catalog = Catalog::build(vec![resource("a", &["a"])]);
        assert_eq!(cycle_of(order(&catalog, &["a"])), vec!["a", "a"]);
    }

    #[test]
    fn test_cycle_below_the_request() {
        let catalog = Catalog::build(vec![
            resource("app", &["x"]),
            resource("x", &["y"]),
            resource("y", &["x"]),
        ]);
        assert_eq!(cycle_of(order(&catalog, &["app"])), vec!["x", "y", "x"]);
    }

    #[test]
    fn test_shared_dependency_appears_once_before_both() {
        let catalog = Catalog::build(vec![
            resource("left", &["shared"]),
            resource("right", &["shared"]),
            resource("shared", &[]),
        ]);
        let order = order(&catalog, &["left", "right"]).unwrap();
        assert_eq!(order, vec!["shared", "left", "right"]);
    }

    #[test]
    fn test_independent_requests_keep_request_order() {
        let catalog = Catalog::build(vec![resource("a", &[]), resource("b", &[]), resource("c", &[])]);
        assert_eq!(order(&catalog, &["c", "a", "b"]).unwrap(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_diamond() {
        let catalog = Catalog::build(vec![
            resource("top", &["l", "r"]),
            resource("l", &["base"]),
            resource("r", &["base"]),
            resource("base", &[]),
        ]);
        let order = order(&catalog, &["top"]).unwrap();
        assert_eq!(order, vec!["base", "l", "r", "top"]);
    }
}
