//! Segment trie used for route matching.
//!
//! Each node holds one path segment. Literal segments are reachable in O(1)
//! through a per-node index; wildcard segments (`:name`, `*name`) are kept in
//! declaration order and tried after the literal child.
//!
//! ## Matching rules
//!
//! - A literal child is always tried before the wildcard children of the same
//!   node. This preference is local: it does not make a literal route win over
//!   a wildcard route declared higher up the tree.
//! - Wildcard children are tried in the order they were created and the first
//!   depth-first success wins.
//! - A node whose own segment starts with `*` consumes the rest of the request.
//! - Only nodes that terminate a registered route (non-empty `pattern`) match.
//!
//! The trie stores an arbitrary value at terminal nodes; the router stores the
//! route handler there so a match needs no secondary lookup.

use std::collections::HashMap;
use std::fmt;

use super::pattern::{is_catch_all, is_wild};

/// Node in the segment trie
pub(crate) struct Node<H> {
    /// Full registered pattern, empty unless a route terminates here
    pattern: String,
    /// This node's own segment, e.g. `users`, `:id` or `*filepath`
    part: String,
    children: Vec<Node<H>>,
    is_wild: bool,
    /// Literal segment -> position of the matching non-wild child in `children`
    static_index: HashMap<String, usize>,
    /// Value registered for `pattern`
    value: Option<H>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl<H> Node<H> {
    fn new(part: String) -> Self {
        Self {
            is_wild: is_wild(&part),
            part,
            pattern: String::new(),
            children: Vec::new(),
            static_index: HashMap::new(),
            value: None,
        }
    }

    /// Registered pattern ending at this node (empty for intermediate nodes)
    #[inline]
    pub(crate) fn pattern(&self) -> &str {
        &self.pattern
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<&H> {
        self.value.as_ref()
    }

    /// First child usable for insertion: the literal match, else any wildcard.
    fn match_child(&self, part: &str) -> Option<usize> {
        self.static_index
            .get(part)
            .copied()
            .or_else(|| self.children.iter().position(|c| c.is_wild))
    }

    /// Insert `pattern` (already split into `parts`) below this node.
    ///
    /// Returns the value previously registered for the same terminal node,
    /// if any; the new registration always replaces it.
    pub(crate) fn insert(
        &mut self,
        pattern: &str,
        parts: &[&str],
        depth: usize,
        value: H,
    ) -> Option<H> {
        let Some(&part) = parts.get(depth) else {
            pattern.clone_into(&mut self.pattern);
            return self.value.replace(value);
        };

        let idx = match self.match_child(part) {
            Some(idx) => idx,
            None => {
                let child = Node::new(part.to_owned());
                let idx = self.children.len();
                if !child.is_wild {
                    self.static_index.insert(part.to_owned(), idx);
                }
                self.children.push(child);
                idx
            }
        };
        self.children[idx].insert(pattern, parts, depth + 1, value)
    }

    /// Find the terminal node matching the request `parts` from `depth` on.
    pub(crate) fn search(&self, parts: &[&str], depth: usize) -> Option<&Node<H>> {
        if parts.len() == depth || is_catch_all(&self.part) {
            return if self.pattern.is_empty() {
                None
            } else {
                Some(self)
            };
        }

        let part = parts[depth];
        let exact = self.static_index.get(part).map(|&i| &self.children[i]);
        let wild = self.children.iter().filter(|c| c.is_wild);

        exact
            .into_iter()
            .chain(wild)
            .find_map(|child| child.search(parts, depth + 1))
    }

    /// Append every registered pattern in this subtree to `out`.
    pub(crate) fn collect_patterns(&self, out: &mut Vec<String>) {
        if !self.pattern.is_empty() {
            out.push(self.pattern.clone());
        }
        for child in &self.children {
            child.collect_patterns(out);
        }
    }
}

impl<H> fmt::Debug for Node<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("part", &self.part)
            .field("pattern", &self.pattern)
            .field("is_wild", &self.is_wild)
            .field("children", &self.children)
            .finish()
    }
}
