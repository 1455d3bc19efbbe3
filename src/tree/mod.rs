//! The labeled Dollo tree individual.
//!
//! A [`DolloTree`] is a rooted, ordered tree whose non-root nodes carry
//! plus/minus event labels: `a+` on the edge where trait `a` is gained, `a-`
//! on an edge where it is lost. Each node caches a binary signature (its
//! `tags`) describing which traits are active on the path from the root,
//! which is what read assignment compares against.
//!
//! Nodes live in an arena addressed by [`NodeId`]. Structural edits detach
//! and graft arena nodes in place; [`DolloTree::clone_individual`] rebuilds a
//! compact arena from the root and is the deep-copy every operator uses
//! before mutating, so callers' trees are never aliased.
//!
//! Submodules:
//! - [`init`]: randomized Dollo-k initialization
//! - [`normalize`]: compaction, canonical sibling order, grafting
//! - [`partition`]: plus-label partition extraction

pub mod init;
pub mod normalize;
pub mod partition;

use crate::base::{BitVector, EventLabel, LabelId, LabelSet, NodeLabel, Read, ReadError, Sign};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Handle to a node within one tree's arena.
///
/// Ids are only meaningful for the tree that issued them; a deep copy issues
/// fresh ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of a Dollo tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DolloNode {
    label: NodeLabel,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Traits active on the root path up to and including this node's event.
    tags: BitVector,
}

impl DolloNode {
    /// The node's label.
    #[inline]
    pub fn label(&self) -> NodeLabel {
        self.label
    }

    /// The node's parent, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered child handles.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The cached binary signature.
    #[inline]
    pub fn tags(&self) -> &BitVector {
        &self.tags
    }
}

/// A rooted, ordered, plus/minus-labeled tree individual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DolloTree {
    labels: LabelSet,
    nodes: Vec<DolloNode>,
    root: NodeId,
}

impl DolloTree {
    /// Create a tree consisting of the sentinel root only.
    pub fn new_root(labels: LabelSet) -> Self {
        let tags = BitVector::zeros(labels.len());
        let root = DolloNode {
            label: NodeLabel::Root,
            parent: None,
            children: Vec::new(),
            tags,
        };
        Self {
            labels,
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The label alphabet this tree was built over.
    #[inline]
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// The root handle.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node.
    #[inline]
    pub fn node(&self, id: NodeId) -> &DolloNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut DolloNode {
        &mut self.nodes[id.index()]
    }

    /// Append a child with zeroed tags under `parent`.
    ///
    /// Signatures are refreshed separately via
    /// [`set_binary_tags`](Self::set_binary_tags).
    pub fn add_child(&mut self, parent: NodeId, label: NodeLabel) -> NodeId {
        let tags = BitVector::zeros(self.labels.len());
        self.push_linked(parent, label, tags)
    }

    pub(crate) fn push_linked(
        &mut self,
        parent: NodeId,
        label: NodeLabel,
        tags: BitVector,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(DolloNode {
            label,
            parent: Some(parent),
            children: Vec::new(),
            tags,
        });
        self.node_mut(parent).children.push(id);
        id
    }

    /// Preorder traversal of the subtree rooted at `from`, `from` included.
    pub fn preorder(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            // Reverse push keeps children in order on the stack.
            for &c in self.node(id).children.iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    /// All non-root nodes in preorder.
    pub fn descendants(&self) -> Vec<NodeId> {
        self.preorder(self.root).into_iter().skip(1).collect()
    }

    /// Number of non-root nodes.
    pub fn descendant_count(&self) -> usize {
        self.preorder(self.root).len() - 1
    }

    /// First node (in preorder) carrying the given event label.
    pub fn find_event(&self, event: EventLabel) -> Option<NodeId> {
        self.preorder(self.root)
            .into_iter()
            .find(|&id| self.node(id).label == NodeLabel::Event(event))
    }

    /// Number of loss events recorded for a trait across the whole tree.
    pub fn loss_count(&self, label: LabelId) -> usize {
        self.preorder(self.root)
            .into_iter()
            .filter(|&id| {
                self.node(id).label == NodeLabel::Event(EventLabel::minus(label))
            })
            .count()
    }

    /// Compute the root-path signature of a node from labels alone.
    ///
    /// Unlike the cached `tags`, this is always correct, even right after a
    /// structural edit; the normalization passes rely on that.
    pub fn path_signature(&self, node: NodeId) -> BitVector {
        let mut chain = Vec::new();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            chain.push(id);
            cursor = self.node(id).parent;
        }
        let mut sig = BitVector::zeros(self.labels.len());
        for id in chain.into_iter().rev() {
            apply_event(&mut sig, self.node(id).label);
        }
        sig
    }

    /// Recompute cached signatures for the subtree rooted at `from`.
    ///
    /// The subtree's ancestors are consulted through their labels, so this is
    /// safe to call while their own caches are stale.
    pub fn set_binary_tags(&mut self, from: NodeId) {
        let base = match self.node(from).parent {
            Some(p) => self.path_signature(p),
            None => BitVector::zeros(self.labels.len()),
        };
        self.refresh_tags(from, &base);
    }

    fn refresh_tags(&mut self, node: NodeId, parent_sig: &BitVector) {
        let mut sig = parent_sig.clone();
        apply_event(&mut sig, self.node(node).label);
        self.node_mut(node).tags = sig.clone();
        for c in self.node(node).children.clone() {
            self.refresh_tags(c, &sig);
        }
    }

    /// Nearest node to a read by Hamming distance over observed positions.
    ///
    /// Ties resolve to the first minimal node in preorder, which keeps
    /// fitness values reproducible.
    ///
    /// # Errors
    /// Fails when the read's length does not match the label alphabet.
    pub fn closest_node_in_tree(&self, read: &Read) -> Result<(NodeId, u32), ReadError> {
        if read.len() != self.labels.len() {
            return Err(ReadError::AlphabetMismatch {
                read: read.len(),
                alphabet: self.labels.len(),
            });
        }
        let order = self.preorder(self.root);
        let mut best_node = self.root;
        let mut best_d = self
            .node(self.root)
            .tags
            .hamming_ignoring(read.bits(), read.unknown());
        for &id in order.iter().skip(1) {
            let d = self
                .node(id)
                .tags
                .hamming_ignoring(read.bits(), read.unknown());
            if d < best_d {
                best_node = id;
                best_d = d;
            }
        }
        Ok((best_node, best_d))
    }

    /// Structural equality of two whole trees.
    ///
    /// Order-sensitive on children; trees produced by the initializer and the
    /// operators are kept in canonical sibling order, so this doubles as
    /// isomorphism for them.
    pub fn is_equal(&self, other: &DolloTree) -> bool {
        self.subtree_equal(self.root, other, other.root)
    }

    /// Structural equality of two subtrees, possibly from different trees.
    pub fn subtree_equal(&self, node: NodeId, other: &DolloTree, other_node: NodeId) -> bool {
        let a = self.node(node);
        let b = other.node(other_node);
        if a.label != b.label || a.children.len() != b.children.len() {
            return false;
        }
        a.children
            .iter()
            .zip(&b.children)
            .all(|(&ca, &cb)| self.subtree_equal(ca, other, cb))
    }

    /// Content-derived structural hash of the tree.
    ///
    /// Equal trees hash equal; used as the tree component of the distance
    /// cache key. Never mutate a tree between caching and lookup without
    /// recomputing.
    pub fn fingerprint(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.hash_subtree(self.root, &mut h);
        h.finish()
    }

    fn hash_subtree(&self, node: NodeId, h: &mut impl Hasher) {
        let n = self.node(node);
        n.label.hash(h);
        n.children.len().hash(h);
        for &c in &n.children {
            self.hash_subtree(c, h);
        }
    }

    /// A fully independent deep copy.
    ///
    /// Rebuilds the arena from the root, which also discards any slots left
    /// behind by earlier detach operations.
    pub fn clone_individual(&self) -> DolloTree {
        let mut out = DolloTree::new_root(self.labels.clone());
        out.node_mut(out.root).tags = self.node(self.root).tags.clone();
        self.copy_children_into(self.root, &mut out, NodeId(0));
        out
    }

    fn copy_children_into(&self, src: NodeId, dst: &mut DolloTree, dst_node: NodeId) {
        for &c in &self.node(src).children {
            let node = self.node(c);
            let id = dst.push_linked(dst_node, node.label, node.tags.clone());
            self.copy_children_into(c, dst, id);
        }
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, node: NodeId, depth: usize) -> fmt::Result {
        let n = self.node(node);
        writeln!(
            f,
            "{}{} [{}]",
            "  ".repeat(depth),
            self.labels.format_node(n.label),
            n.tags.to_bit_string()
        )?;
        for &c in &n.children {
            self.fmt_subtree(f, c, depth + 1)?;
        }
        Ok(())
    }
}

/// Apply a node's event to a running root-path signature.
pub(crate) fn apply_event(sig: &mut BitVector, label: NodeLabel) {
    if let NodeLabel::Event(ev) = label {
        match ev.sign {
            Sign::Plus => sig.set(ev.label.0 as usize),
            Sign::Minus => sig.clear(ev.label.0 as usize),
        }
    }
}

/// Indented dump of labels and signatures, for debugging.
impl fmt::Display for DolloTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_subtree(f, self.root, 0)
    }
}
