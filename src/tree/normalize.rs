//! Structural normalization and grafting.
//!
//! After a subtree changes parents its event labels may no longer describe
//! genuine trait transitions, and sibling order may drift from canonical.
//! Crossover therefore runs, on each grafted side: vertical compaction,
//! horizontal compaction, label rearrangement, then signature recompute.
//! All passes mutate only the subtree rooted at the receiver node.

use crate::base::{BitVector, NodeLabel, Sign, TreeError};
use crate::tree::{apply_event, DolloTree, NodeId};

impl DolloTree {
    /// Splice out nodes whose event is redundant on their root path.
    ///
    /// An event is redundant when it does not change the path signature: a
    /// plus where the trait is already active, or a minus where it is not.
    /// Such a node is removed and its children take its place, preserving
    /// order. Signatures are derived from labels on the fly, so stale cached
    /// tags are fine.
    pub fn compact_vertical(&mut self, from: NodeId) {
        let base = match self.node(from).parent() {
            Some(p) => self.path_signature(p),
            None => BitVector::zeros(self.labels().len()),
        };
        self.compact_subtree(from, &base);
    }

    /// `sig` is the path signature above `node`. The node itself may have
    /// become redundant by reattachment, in which case its children are
    /// promoted and re-examined against the same signature.
    fn compact_subtree(&mut self, node: NodeId, sig: &BitVector) {
        if self.node(node).parent().is_some() && is_redundant(sig, self.node(node).label()) {
            let promoted = self.node(node).children().to_vec();
            self.splice_out(node);
            for c in promoted {
                self.compact_subtree(c, sig);
            }
            return;
        }
        let mut child_sig = sig.clone();
        apply_event(&mut child_sig, self.node(node).label());
        let mut i = 0;
        while i < self.node(node).children().len() {
            let child = self.node(node).children()[i];
            self.compact_subtree(child, &child_sig);
            // A spliced child leaves its (already compacted) promotions at
            // this slot; only advance past a child that survived.
            if self.node(node).children().get(i) == Some(&child) {
                i += 1;
            }
        }
    }

    /// Remove `node`, inserting its children in its place under its parent.
    fn splice_out(&mut self, node: NodeId) {
        let parent = self
            .node(node)
            .parent()
            .expect("splice_out is only applied to non-root nodes");
        let children = std::mem::take(&mut self.node_mut(node).children);
        let pos = self.child_position(parent, node);
        self.node_mut(parent).children.remove(pos);
        for (offset, &c) in children.iter().enumerate() {
            self.node_mut(c).parent = Some(parent);
            self.node_mut(parent).children.insert(pos + offset, c);
        }
        self.node_mut(node).parent = None;
    }

    /// Merge same-labeled siblings throughout the receiver's subtree.
    ///
    /// When two siblings carry the same event label the second folds into the
    /// first: its children move to the end of the first's child list and the
    /// duplicate node is dropped. Recursion into the survivors resolves any
    /// duplicates the fold created one level down.
    pub fn compact_horizontal(&mut self, from: NodeId) {
        let mut i = 0;
        while i < self.node(from).children().len() {
            let keeper = self.node(from).children()[i];
            let mut j = i + 1;
            while j < self.node(from).children().len() {
                let other = self.node(from).children()[j];
                if self.node(other).label() == self.node(keeper).label() {
                    let moved = std::mem::take(&mut self.node_mut(other).children);
                    for &m in &moved {
                        self.node_mut(m).parent = Some(keeper);
                    }
                    self.node_mut(keeper).children.extend(moved);
                    self.node_mut(from).children.remove(j);
                    self.node_mut(other).parent = None;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        for c in self.node(from).children().to_vec() {
            self.compact_horizontal(c);
        }
    }

    /// Sort siblings into canonical order (label index, plus before minus)
    /// throughout the receiver's subtree.
    pub fn rearrange_by_label(&mut self, from: NodeId) {
        let mut children = std::mem::take(&mut self.node_mut(from).children);
        children.sort_by_key(|&c| self.node(c).label());
        self.node_mut(from).children = children;
        for c in self.node(from).children().to_vec() {
            self.rearrange_by_label(c);
        }
    }

    /// Exchange two subtrees between two trees.
    ///
    /// Each subtree is detached from its parent and a copy of the other
    /// tree's subtree is grafted at the vacated child position. Returns the
    /// grafted roots `(in_a, in_b)`; their signatures are stale until the
    /// caller regularizes. Detached source nodes stay in their arena until
    /// the next deep copy.
    ///
    /// # Errors
    /// Fails if either node is a root.
    pub fn swap_subtrees(
        a: &mut DolloTree,
        node_a: NodeId,
        b: &mut DolloTree,
        node_b: NodeId,
    ) -> Result<(NodeId, NodeId), TreeError> {
        let (parent_a, pos_a) = a.detach(node_a)?;
        let (parent_b, pos_b) = b.detach(node_b)?;
        let a_copy_in_b = b.copy_subtree_from(a, node_a);
        let b_copy_in_a = a.copy_subtree_from(b, node_b);
        a.attach_at(parent_a, pos_a, b_copy_in_a);
        b.attach_at(parent_b, pos_b, a_copy_in_b);
        Ok((b_copy_in_a, a_copy_in_b))
    }

    /// Re-parent a node within this tree: unlink it and append it to
    /// `new_parent`'s children.
    ///
    /// Precondition: `new_parent` is not inside the subtree being moved.
    ///
    /// # Errors
    /// Fails when `node` is the root.
    pub fn set_parent(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
        self.detach(node)?;
        debug_assert!(
            !self.preorder(node).contains(&new_parent),
            "re-parenting under a descendant would create a cycle"
        );
        let pos = self.node(new_parent).children().len();
        self.attach_at(new_parent, pos, node);
        Ok(())
    }

    /// Unlink `node` from its parent, returning the parent and the child slot
    /// it occupied.
    fn detach(&mut self, node: NodeId) -> Result<(NodeId, usize), TreeError> {
        let Some(parent) = self.node(node).parent() else {
            return Err(TreeError::CannotDetachRoot);
        };
        let pos = self.child_position(parent, node);
        self.node_mut(parent).children.remove(pos);
        self.node_mut(node).parent = None;
        Ok((parent, pos))
    }

    /// Insert a parentless node at a specific child slot.
    fn attach_at(&mut self, parent: NodeId, pos: usize, node: NodeId) {
        let pos = pos.min(self.node(parent).children().len());
        self.node_mut(parent).children.insert(pos, node);
        self.node_mut(node).parent = Some(parent);
    }

    /// Copy the subtree rooted at `src_node` of `src` into this arena.
    ///
    /// The copied root is left parentless for the caller to attach.
    fn copy_subtree_from(&mut self, src: &DolloTree, src_node: NodeId) -> NodeId {
        let node = src.node(src_node);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(super::DolloNode {
            label: node.label(),
            parent: None,
            children: Vec::new(),
            tags: node.tags().clone(),
        });
        for &c in node.children() {
            let child = self.copy_subtree_from(src, c);
            self.node_mut(child).parent = Some(id);
            self.node_mut(id).children.push(child);
        }
        id
    }

    fn child_position(&self, parent: NodeId, child: NodeId) -> usize {
        self.node(parent)
            .children()
            .iter()
            .position(|&c| c == child)
            .expect("child is linked under its parent")
    }
}

/// True when applying `label` to a path with signature `sig` changes nothing.
fn is_redundant(sig: &BitVector, label: NodeLabel) -> bool {
    match label {
        NodeLabel::Root => false,
        NodeLabel::Event(ev) => {
            let active = sig.get(ev.label.0 as usize);
            match ev.sign {
                Sign::Plus => active,
                Sign::Minus => !active,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{EventLabel, LabelId, LabelSet};

    fn labels() -> LabelSet {
        LabelSet::new(["a", "b", "c"]).unwrap()
    }

    fn plus(i: u16) -> NodeLabel {
        NodeLabel::Event(EventLabel::plus(LabelId(i)))
    }

    fn minus(i: u16) -> NodeLabel {
        NodeLabel::Event(EventLabel::minus(LabelId(i)))
    }

    #[test]
    fn test_compact_vertical_removes_redundant_minus() {
        // root -> b+ -> a- : a was never gained, the loss is redundant.
        let mut t = DolloTree::new_root(labels());
        let b = t.add_child(t.root(), plus(1));
        let dead = t.add_child(b, minus(0));
        t.add_child(dead, plus(2));
        t.compact_vertical(t.root());
        t.set_binary_tags(t.root());

        let kept: Vec<NodeLabel> = t
            .descendants()
            .into_iter()
            .map(|id| t.node(id).label())
            .collect();
        // The redundant a- is gone, its child was promoted into its place.
        assert_eq!(kept, vec![plus(1), plus(2)]);
    }

    #[test]
    fn test_compact_vertical_removes_duplicate_gain() {
        // root -> a+ -> a+ : the inner gain changes nothing.
        let mut t = DolloTree::new_root(labels());
        let a = t.add_child(t.root(), plus(0));
        let dup = t.add_child(a, plus(0));
        t.add_child(dup, minus(0));
        t.compact_vertical(t.root());
        t.set_binary_tags(t.root());

        let kept: Vec<NodeLabel> = t
            .descendants()
            .into_iter()
            .map(|id| t.node(id).label())
            .collect();
        assert_eq!(kept, vec![plus(0), minus(0)]);
    }

    #[test]
    fn test_compact_horizontal_merges_duplicate_siblings() {
        let mut t = DolloTree::new_root(labels());
        let a1 = t.add_child(t.root(), plus(0));
        t.add_child(a1, plus(1));
        let a2 = t.add_child(t.root(), plus(0));
        t.add_child(a2, plus(2));
        t.compact_horizontal(t.root());
        t.set_binary_tags(t.root());

        assert_eq!(t.node(t.root()).children().len(), 1);
        let merged = t.node(t.root()).children()[0];
        let child_labels: Vec<NodeLabel> = t
            .node(merged)
            .children()
            .iter()
            .map(|&c| t.node(c).label())
            .collect();
        assert_eq!(child_labels, vec![plus(1), plus(2)]);
    }

    #[test]
    fn test_rearrange_sorts_siblings() {
        let mut t = DolloTree::new_root(labels());
        t.add_child(t.root(), plus(2));
        t.add_child(t.root(), minus(0));
        t.add_child(t.root(), plus(0));
        t.rearrange_by_label(t.root());

        let order: Vec<NodeLabel> = t
            .node(t.root())
            .children()
            .iter()
            .map(|&c| t.node(c).label())
            .collect();
        assert_eq!(order, vec![plus(0), minus(0), plus(2)]);
    }

    #[test]
    fn test_swap_subtrees() {
        // t1: root -> a+ -> b+        t2: root -> a+ -> c+
        let mut t1 = DolloTree::new_root(labels());
        let a1 = t1.add_child(t1.root(), plus(0));
        t1.add_child(a1, plus(1));
        t1.set_binary_tags(t1.root());

        let mut t2 = DolloTree::new_root(labels());
        let a2 = t2.add_child(t2.root(), plus(0));
        t2.add_child(a2, plus(2));
        t2.set_binary_tags(t2.root());

        let before1 = t1.clone_individual();
        let before2 = t2.clone_individual();
        let (g1, g2) = DolloTree::swap_subtrees(&mut t1, a1, &mut t2, a2).unwrap();
        t1.set_binary_tags(g1);
        t2.set_binary_tags(g2);

        assert!(t1.is_equal(&before2));
        assert!(t2.is_equal(&before1));
    }

    #[test]
    fn test_set_parent_moves_subtree() {
        // root -> {a+ -> b+, c+}; move b+ under c+.
        let mut t = DolloTree::new_root(labels());
        let a = t.add_child(t.root(), plus(0));
        let b = t.add_child(a, plus(1));
        let c = t.add_child(t.root(), plus(2));

        t.set_parent(b, c).unwrap();
        t.set_binary_tags(t.root());

        assert!(t.node(a).children().is_empty());
        assert_eq!(t.node(c).children(), &[b][..]);
        assert_eq!(t.node(b).parent(), Some(c));
    }

    #[test]
    fn test_set_parent_root_is_error() {
        let mut t = DolloTree::new_root(labels());
        let a = t.add_child(t.root(), plus(0));
        let root = t.root();
        assert_eq!(t.set_parent(root, a).unwrap_err(), TreeError::CannotDetachRoot);
        // The failed move leaves the tree untouched.
        assert_eq!(t.node(a).parent(), Some(root));
        assert_eq!(t.node(root).children(), &[a][..]);
    }

    #[test]
    fn test_swap_root_fails() {
        let mut t1 = DolloTree::new_root(labels());
        let mut t2 = DolloTree::new_root(labels());
        let r1 = t1.root();
        let r2 = t2.root();
        let err = DolloTree::swap_subtrees(&mut t1, r1, &mut t2, r2).unwrap_err();
        assert_eq!(err, TreeError::CannotDetachRoot);
    }
}
