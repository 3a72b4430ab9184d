//! # multitrie
//!
//! A prefix tree mapping string keys to multisets of values.
//!
//! Every key spells a path of `char`s from the root. Values are appended to the
//! node at the end of that path, so one key can hold many values, duplicates
//! included. A prefix search returns the values of a node and of every node
//! below it; an exact search returns only the node's own values.
//!
//! ## Example
//!
//! ```rust
//! use multitrie::TrieTree;
//!
//! let mut trie: TrieTree<u32> = TrieTree::new();
//! trie.add("abcd", 1);
//! trie.add("abc", 2);
//! trie.add("abdc", 3);
//!
//! assert_eq!(trie.search("ab"), vec![2, 1, 3]);
//! assert_eq!(trie.search_exact("abc"), &[2]);
//!
//! assert!(trie.remove("abc", &2));
//! assert_eq!(trie.search("ab"), vec![1, 3]);
//! ```
//!
//! ## Lookups create nodes
//!
//! `search`, `search_exact` and `remove` walk the key with the same routine
//! `add` uses, so querying a key that was never added leaves an empty node
//! behind. Removing the last value of a node does not prune it either. A
//! long-running trie queried with many distinct one-off keys grows accordingly;
//! `clear` releases everything.

use indexmap::IndexMap;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

// =============================================================================
// Node representation
// =============================================================================

/// Index of a node in the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One position in the key space.
///
/// Children are kept in the order they were first created, which is the order
/// prefix searches visit them in.
#[derive(Clone, Debug)]
pub struct TrieNode<T> {
    /// Character on the edge from the parent; `None` for the root.
    label: Option<char>,
    values: Vec<T>,
    children: IndexMap<char, NodeId>,
}

impl<T> TrieNode<T> {
    fn empty(label: Option<char>) -> Self {
        Self {
            label,
            values: Vec::new(),
            children: IndexMap::new(),
        }
    }

    #[inline]
    pub fn label(&self) -> Option<char> {
        self.label
    }

    /// Values stored at exactly this key, oldest first.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn children(&self) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.children.iter().map(|(&label, &id)| (label, id))
    }

    #[inline]
    pub fn child(&self, label: char) -> Option<NodeId> {
        self.children.get(&label).copied()
    }
}

// =============================================================================
// Tree
// =============================================================================

/// Prefix tree from string keys to multisets of `T`.
///
/// Nodes live in an arena owned by the tree. A `NodeId` is only ever stored in
/// its parent's child map, so the arena always describes a tree rooted at
/// [`NodeId::ROOT`].
#[derive(Clone, Debug)]
pub struct TrieTree<T> {
    nodes: Vec<TrieNode<T>>,
    /// Total number of values across all nodes.
    count: usize,
}

impl<T> TrieTree<T> {
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates an empty trie with room for `nodes` nodes (root included)
    /// before the arena reallocates.
    pub fn with_capacity(nodes: usize) -> Self {
        let mut arena = Vec::with_capacity(nodes.max(1));
        arena.push(TrieNode::empty(None));
        Self {
            nodes: arena,
            count: 0,
        }
    }

    /// Number of values stored in the whole trie.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of nodes, root included. Grows on lookups of unseen keys.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn root(&self) -> &TrieNode<T> {
        &self.nodes[NodeId::ROOT.0]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&TrieNode<T>> {
        self.nodes.get(id.0)
    }

    /// Walks `key` from the root one `char` at a time, creating every missing
    /// node on the way, and returns the node the whole key lands on. The empty
    /// key is the root.
    fn dig(&mut self, key: &str) -> NodeId {
        let mut current = NodeId::ROOT;
        for (depth, label) in key.chars().enumerate() {
            current = match self.nodes[current.0].child(label) {
                Some(child) => child,
                None => self.create_child(current, label, depth + 1),
            };
            debug_assert_eq!(self.nodes[current.0].label, Some(label));
        }
        current
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn create_child(&mut self, parent: NodeId, label: char, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TrieNode::empty(Some(label)));
        self.nodes[parent.0].children.insert(label, id);
        #[cfg(feature = "tracing")]
        trace!(%label, depth, "created trie node");
        id
    }

    /// Returns `start` followed by all of its descendants, breadth first.
    /// Siblings appear in creation order.
    fn collect_subtree(&self, start: NodeId) -> Vec<NodeId> {
        let mut visited = vec![start];
        let mut cursor = 0;
        while cursor < visited.len() {
            let node = &self.nodes[visited[cursor].0];
            visited.extend(node.children.values().copied());
            cursor += 1;
        }
        visited
    }

    /// Appends `value` at `key` and returns how many values that key now holds.
    pub fn add(&mut self, key: &str, value: T) -> usize {
        let id = self.dig(key);
        let values = &mut self.nodes[id.0].values;
        values.push(value);
        self.count += 1;
        values.len()
    }

    /// Adds every `(key, value)` pair in order.
    pub fn add_all<K, I>(&mut self, entries: I)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, T)>,
    {
        for (key, value) in entries {
            self.add(key.as_ref(), value);
        }
    }

    /// Prefix search: values at `key` and at every key that extends it.
    ///
    /// The node's own values come first, then its descendants level by level,
    /// siblings in the order they were created. Creates the node for `key` if
    /// it does not exist yet.
    pub fn search(&mut self, key: &str) -> Vec<T>
    where
        T: Clone,
    {
        let start = self.dig(key);
        let mut out = Vec::new();
        for id in self.collect_subtree(start) {
            out.extend_from_slice(&self.nodes[id.0].values);
        }
        out
    }

    /// Values stored at exactly `key`. Creates the node if needed.
    pub fn search_exact(&mut self, key: &str) -> &[T] {
        let id = self.dig(key);
        &self.nodes[id.0].values
    }

    /// Removes the first value at `key` equal to `value`.
    ///
    /// Returns `false` and leaves the node untouched when nothing matches. The
    /// node stays in the tree even once it holds no values.
    pub fn remove(&mut self, key: &str, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.remove_by(key, |candidate| candidate == value)
    }

    /// Removes the first value at `key` for which `matches` returns `true`.
    pub fn remove_by<F>(&mut self, key: &str, mut matches: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let id = self.dig(key);
        let values = &mut self.nodes[id.0].values;
        match values.iter().position(|v| matches(v)) {
            Some(pos) => {
                values.remove(pos);
                self.count -= 1;
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                trace!(key, "no matching value to remove");
                false
            }
        }
    }

    /// Drops every node and value, leaving a lone empty root.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        debug!(nodes = self.nodes.len(), values = self.count, "clearing trie");
        // Nodes only hold ids, so dropping the arena never recurses.
        self.nodes = vec![TrieNode::empty(None)];
        self.count = 0;
    }
}

impl<T> Default for TrieTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: AsRef<str>> Extend<(K, T)> for TrieTree<T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<T, K: AsRef<str>> FromIterator<(K, T)> for TrieTree<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.add_all(iter);
        trie
    }
}
