//! Prefix trie over resource identifiers
//!
//! Nodes live in one arena `Vec`; children are keyed by `char`. Each node
//! stores the catalog positions of identifiers ending exactly there, so a
//! prefix query walks `k` nodes and then collects the subtree.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TrieNode {
    children: BTreeMap<char, usize>,
    terminals: Vec<usize>,
}

/// Arena-backed prefix tree mapping identifiers to catalog positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTrie {
    nodes: Vec<TrieNode>,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Record that `key` lives at catalog position `position`
    pub fn insert(&mut self, key: &str, position: usize) {
        let mut node = 0;
        for ch in key.chars() {
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(ch, child);
                    child
                }
            };
        }
        self.nodes[node].terminals.push(position);
    }

    fn find(&self, prefix: &str) -> Option<usize> {
        prefix.chars().try_fold(0, |node, ch| {
            self.nodes[node].children.get(&ch).copied()
        })
    }

    /// Catalog positions of every key starting with `prefix`, ascending
    pub fn positions_with_prefix(&self, prefix: &str) -> Vec<usize> {
        let Some(start) = self.find(prefix) else {
            return Vec::new();
        };

        let mut positions = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            let node = &self.nodes[node];
            positions.extend_from_slice(&node.terminals);
            stack.extend(node.children.values().copied());
        }
        positions.sort_unstable();
        positions
    }

    /// Number of arena nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie(keys: &[&str]) -> PrefixTrie {
        let mut trie = PrefixTrie::new();
        for (i, key) in keys.iter().enumerate() {
            trie.insert(key, i);
        }
        trie
    }

    #[test]
    fn test_prefix_returns_insertion_order() {
        let trie = trie(&["web/server", "api/client", "web/socket", "auth"]);
        assert_eq!(trie.positions_with_prefix("web/"), vec![0, 2]);
        assert_eq!(trie.positions_with_prefix("a"), vec![1, 3]);
    }

    #[test]
    fn test_empty_prefix_returns_everything() {
        let trie = trie(&["b", "a", "c"]);
        assert_eq!(trie.positions_with_prefix(""), vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_prefix_is_empty() {
        let trie = trie(&["alpha", "beta"]);
        assert!(trie.positions_with_prefix("gamma").is_empty());
        assert!(trie.positions_with_prefix("alphabet").is_empty());
    }

    #[test]
    fn test_key_that_is_prefix_of_another() {
        let trie = trie(&["lint", "lint-fix"]);
        assert_eq!(trie.positions_with_prefix("lint"), vec![0, 1]);
        assert_eq!(trie.positions_with_prefix("lint-"), vec![1]);
    }

    #[test]
    fn test_multibyte_characters() {
        let trie = trie(&["café/menu", "cafe/menu"]);
        assert_eq!(trie.positions_with_prefix("caf\u{e9}"), vec![0]);
    }

    #[test]
    fn test_shared_prefixes_share_nodes() {
        let trie = trie(&["abc", "abd"]);
        // root + a + b + c + d
        assert_eq!(trie.node_count(), 5);
    }
}
