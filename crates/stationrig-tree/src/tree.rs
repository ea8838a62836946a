//! The configuration forest and its traversals.
//!
//! An ordered sequence of root nodes, acyclic by construction. Every search
//! is a depth-first pre-order walk over the whole forest; forests hold tens
//! of nodes, so no indexing is kept and every operation is O(node count).
//!
//! The forest is entirely derived state — rebuilt from the action history on
//! every probe-instant change, never persisted.

use crate::{ConfigurationNode, NodeId, Result, TreeError};

/// Ordered forest of configuration nodes.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationsTree {
    roots: Vec<ConfigurationNode>,
}

/// Outcome of a [`ConfigurationsTree::parent_of`] query.
///
/// Distinguishes "the node is a root" from "the node is not in this tree" —
/// callers that promote or re-attach nodes need to tell these apart.
#[derive(Debug)]
pub enum ParentQuery<'a> {
    /// The node is a root of this forest; it has no parent.
    Root,
    /// The node's structural parent.
    Parent(&'a ConfigurationNode),
    /// The node is not present anywhere in this forest.
    NotFound,
}

impl ConfigurationsTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root node.
    pub fn push(&mut self, node: ConfigurationNode) {
        self.roots.push(node);
    }

    /// The root at `index`.
    pub fn at(&self, index: usize) -> Result<&ConfigurationNode> {
        self.roots.get(index).ok_or(TreeError::IndexOutOfRange {
            index,
            len: self.roots.len(),
        })
    }

    /// Remove and return the root at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<ConfigurationNode> {
        if index >= self.roots.len() {
            return Err(TreeError::IndexOutOfRange {
                index,
                len: self.roots.len(),
            });
        }
        Ok(self.roots.remove(index))
    }

    /// Remove the first node matching `target` by structural identity
    /// (shared action allocation, see [`ConfigurationNode::same_node`]).
    ///
    /// Recurses into every node that reports `can_have_children()`, whether
    /// or not it currently has any. Returns whether a node was removed.
    pub fn remove(&mut self, target: &ConfigurationNode) -> bool {
        if let Some(pos) = self.roots.iter().position(|n| n.same_node(target)) {
            self.roots.remove(pos);
            return true;
        }
        for node in &mut self.roots {
            if node.can_have_children() && node.children_mut().remove(target) {
                return true;
            }
        }
        false
    }

    /// Find a node by id equality (value, not identity). Pre-order: the
    /// first match in document order wins.
    pub fn get_by_id(&self, id: &NodeId) -> Option<&ConfigurationNode> {
        for node in &self.roots {
            if node.id() == *id {
                return Some(node);
            }
            if let Some(found) = node.children().get_by_id(id) {
                return Some(found);
            }
        }
        None
    }

    /// Names along the path from a root down to the node with `id`,
    /// inclusive on both ends. Empty when the id is not in the forest —
    /// a silent miss, not an error.
    pub fn path_to(&self, id: &NodeId) -> Vec<String> {
        for node in &self.roots {
            if node.id() == *id {
                return vec![node.name()];
            }
            let below = node.children().path_to(id);
            if !below.is_empty() {
                let mut path = Vec::with_capacity(below.len() + 1);
                path.push(node.name());
                path.extend(below);
                return path;
            }
        }
        Vec::new()
    }

    /// The structural parent of `target`, by identity.
    pub fn parent_of(&self, target: &ConfigurationNode) -> ParentQuery<'_> {
        if self.roots.iter().any(|n| n.same_node(target)) {
            return ParentQuery::Root;
        }
        match self.find_parent(target) {
            Some(parent) => ParentQuery::Parent(parent),
            None => ParentQuery::NotFound,
        }
    }

    fn find_parent(&self, target: &ConfigurationNode) -> Option<&ConfigurationNode> {
        for node in &self.roots {
            if node.children().roots.iter().any(|c| c.same_node(target)) {
                return Some(node);
            }
            if let Some(parent) = node.children().find_parent(target) {
                return Some(parent);
            }
        }
        None
    }

    /// Ancestors of `target` from root down to its immediate parent.
    /// Empty for roots and for nodes not in the forest.
    pub fn ancestors_of(&self, target: &ConfigurationNode) -> Vec<&ConfigurationNode> {
        fn walk<'a>(
            tree: &'a ConfigurationsTree,
            target: &ConfigurationNode,
            trail: &mut Vec<&'a ConfigurationNode>,
        ) -> bool {
            for node in &tree.roots {
                if node.same_node(target) {
                    return true;
                }
                trail.push(node);
                if walk(node.children(), target, trail) {
                    return true;
                }
                trail.pop();
            }
            false
        }

        let mut trail = Vec::new();
        if walk(self, target, &mut trail) { trail } else { Vec::new() }
    }

    /// The root nodes, in order.
    pub fn roots(&self) -> &[ConfigurationNode] {
        &self.roots
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Total node count across the whole forest.
    pub fn len(&self) -> usize {
        self.roots.iter().map(|n| 1 + n.children().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// All nodes in depth-first pre-order.
    pub fn flatten(&self) -> Vec<&ConfigurationNode> {
        self.iter().collect()
    }

    /// Depth-first pre-order iterator over the whole forest.
    pub fn iter(&self) -> PreOrderIter<'_> {
        // Roots pushed in reverse so the first root is visited first.
        PreOrderIter { stack: self.roots.iter().rev().collect() }
    }
}

impl FromIterator<ConfigurationNode> for ConfigurationsTree {
    fn from_iter<I: IntoIterator<Item = ConfigurationNode>>(iter: I) -> Self {
        Self { roots: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a ConfigurationsTree {
    type Item = &'a ConfigurationNode;
    type IntoIter = PreOrderIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first pre-order iterator over a forest.
pub struct PreOrderIter<'a> {
    stack: Vec<&'a ConfigurationNode>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a ConfigurationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.children().roots.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

// ============================================================================
// Tests
// ============================================================================
