#![forbid(unsafe_code)]

//! Character trie over command names, used for nearest-name completion.
//!
//! Nodes live in an arena and refer to each other by index. Each node maps
//! ordered [`TrieKey`]s to child nodes. A registered name spells a path from
//! the root that ends in a [`TrieKey::End`] child, and `End` sorts before
//! every character. Nodes left without children after a removal are pruned
//! and their slots recycled.
//!
//! Mutation is crate-private: the [`CommandRegistry`](crate::CommandRegistry)
//! keeps the trie in step with its sorted name index.

use std::collections::BTreeMap;
use std::iter;
use std::ops::Bound;

use smallvec::SmallVec;

/// Edge label in the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrieKey {
    /// Terminates a registered name.
    End,
    Char(char),
}

/// Which neighbour a completion walk looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toward {
    Next,
    Prev,
}

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Default, Clone)]
struct Node {
    children: BTreeMap<TrieKey, NodeId>,
}

/// Arena-backed trie of command names.
#[derive(Debug, Clone)]
pub struct CommandTrie {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl Default for CommandTrie {
    fn default() -> Self {
        Self {
            nodes: vec![Node::default()],
            free: Vec::new(),
        }
    }
}

fn keys(name: &str) -> impl Iterator<Item = TrieKey> + '_ {
    name.chars().map(TrieKey::Char).chain(iter::once(TrieKey::End))
}

impl CommandTrie {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no names are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].children.is_empty()
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Whether `name` is stored as a complete name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let mut cur = ROOT;
        for key in keys(name) {
            match self.nodes[cur].children.get(&key) {
                Some(&next) => cur = next,
                None => return false,
            }
        }
        true
    }

    fn alloc(&mut self) -> NodeId {
        match self.free.pop() {
            Some(id) => id,
            None => {
                self.nodes.push(Node::default());
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id].children.clear();
        self.free.push(id);
    }

    pub(crate) fn insert(&mut self, name: &str) {
        let mut cur = ROOT;
        for key in keys(name) {
            cur = match self.nodes[cur].children.get(&key) {
                Some(&next) => next,
                None => {
                    let id = self.alloc();
                    self.nodes[cur].children.insert(key, id);
                    id
                }
            };
        }
    }

    /// Remove `name`, pruning childless nodes up toward the root.
    ///
    /// Returns `false` when `name` was not stored.
    pub(crate) fn remove(&mut self, name: &str) -> bool {
        let mut path: SmallVec<[(NodeId, TrieKey); 32]> = SmallVec::new();
        let mut cur = ROOT;
        for key in keys(name) {
            let Some(&next) = self.nodes[cur].children.get(&key) else {
                return false;
            };
            path.push((cur, key));
            cur = next;
        }

        let mut child = cur;
        while let Some((parent, key)) = path.pop() {
            if !self.nodes[child].children.is_empty() {
                break;
            }
            self.nodes[parent].children.remove(&key);
            self.release(child);
            child = parent;
        }
        true
    }

    /// Synthesize the stored name nearest to `input` in the given direction.
    ///
    /// Follows `input` down the trie as far as it matches. From there, at
    /// each level still inside `input` it takes the closest key beyond the
    /// input character (smallest greater for [`Toward::Next`], largest
    /// smaller for [`Toward::Prev`]); past the end of `input`, or when no
    /// such key exists, it takes the smallest (or largest) key. The walk
    /// stops when it takes [`TrieKey::End`].
    ///
    /// Returns `None` only when the trie is empty.
    #[must_use]
    pub fn nearest(&self, input: &str, toward: Toward) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let input: Vec<char> = input.chars().collect();
        let mut out = String::new();
        let mut cur = ROOT;
        let mut level = 0;

        while let Some(&c) = input.get(level) {
            match self.nodes[cur].children.get(&TrieKey::Char(c)) {
                Some(&next) => {
                    out.push(c);
                    cur = next;
                    level += 1;
                }
                None => break,
            }
        }

        loop {
            let children = &self.nodes[cur].children;
            let bound = input.get(level).map(|&c| TrieKey::Char(c));
            let beyond = bound.and_then(|b| match toward {
                Toward::Next => children
                    .range((Bound::Excluded(b), Bound::Unbounded))
                    .next(),
                Toward::Prev => children.range(..b).next_back(),
            });
            let picked = beyond.or_else(|| match toward {
                Toward::Next => children.iter().next(),
                Toward::Prev => children.iter().next_back(),
            });
            match picked {
                Some((TrieKey::End, _)) => return Some(out),
                Some((&TrieKey::Char(c), &next)) => {
                    out.push(c);
                    cur = next;
                    level += 1;
                }
                None => panic!("command trie node {cur} has no terminal path"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie(names: &[&str]) -> CommandTrie {
        let mut t = CommandTrie::new();
        for name in names {
            t.insert(name);
        }
        t
    }

    #[test]
    fn insert_and_contains() {
        let t = trie(&["foo", "foobar"]);
        assert!(t.contains("foo"));
        assert!(t.contains("foobar"));
        assert!(!t.contains("fo"));
        assert!(!t.contains("foob"));
        assert!(!t.contains("foobarx"));
    }

    #[test]
    fn remove_prunes_and_recycles() {
        let mut t = trie(&["foo", "foobar"]);
        let full = t.node_count();
        assert!(t.remove("foobar"));
        // "bar" and its terminal leaf are gone; "foo" survives.
        assert_eq!(t.node_count(), full - 4);
        assert!(t.contains("foo"));
        assert!(!t.contains("foobar"));
        assert!(!t.remove("foobar"));

        t.insert("fox");
        assert_eq!(t.node_count(), full - 2);
        assert!(t.remove("foo"));
        assert!(t.remove("fox"));
        assert!(t.is_empty());
        assert_eq!(t.node_count(), 1);
    }

    #[test]
    fn remove_prefix_keeps_longer_name() {
        let mut t = trie(&["foo", "foobar"]);
        assert!(t.remove("foo"));
        assert!(!t.contains("foo"));
        assert!(t.contains("foobar"));
    }

    #[test]
    fn nearest_extends_partial_input() {
        let t = trie(&["foo", "foobar", "goo"]);
        assert_eq!(t.nearest("foob", Toward::Next).as_deref(), Some("foobar"));
        assert_eq!(t.nearest("g", Toward::Next).as_deref(), Some("goo"));
    }

    #[test]
    fn nearest_next_takes_smallest_greater() {
        let t = trie(&["alpha", "beta", "delta", "gamma"]);
        assert_eq!(t.nearest("c", Toward::Next).as_deref(), Some("delta"));
        assert_eq!(t.nearest("", Toward::Next).as_deref(), Some("alpha"));
    }

    #[test]
    fn nearest_prev_takes_largest_smaller() {
        let t = trie(&["alpha", "beta", "delta", "gamma"]);
        assert_eq!(t.nearest("c", Toward::Prev).as_deref(), Some("beta"));
        assert_eq!(t.nearest("", Toward::Prev).as_deref(), Some("gamma"));
    }

    #[test]
    fn nearest_prev_stops_on_stored_prefix() {
        let t = trie(&["fo", "fox"]);
        // At "fo", End sorts below 'o' so the walk terminates there.
        assert_eq!(t.nearest("foo", Toward::Prev).as_deref(), Some("fo"));
    }

    #[test]
    fn nearest_on_empty_trie() {
        assert_eq!(CommandTrie::new().nearest("x", Toward::Next), None);
    }
}
