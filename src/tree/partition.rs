//! Plus-label partition extraction.
//!
//! The partition maps every gain node to the event labels of its strict
//! descendants. Crossover compares the plus-label portion of two trees'
//! coverage at a candidate attachment point: only subtrees that gain exactly
//! the same traits may be exchanged.

use crate::base::{EventLabel, NodeLabel, Sign};
use crate::tree::DolloTree;
use std::collections::{BTreeMap, BTreeSet};

impl DolloTree {
    /// Map each plus-labeled node to the event labels covered by its strict
    /// descendants.
    ///
    /// The node's own label is excluded, so a gain node with no descendants
    /// maps to the empty set. Built fresh on every call; nothing is cached.
    pub fn partition(&self) -> BTreeMap<EventLabel, BTreeSet<EventLabel>> {
        let mut map = BTreeMap::new();
        for id in self.preorder(self.root()) {
            let NodeLabel::Event(event) = self.node(id).label() else {
                continue;
            };
            if event.sign != Sign::Plus {
                continue;
            }
            let mut covered = BTreeSet::new();
            for d in self.preorder(id).into_iter().skip(1) {
                if let NodeLabel::Event(ev) = self.node(d).label() {
                    covered.insert(ev);
                }
            }
            map.insert(event, covered);
        }
        map
    }
}

/// Restrict a coverage set to its plus labels.
pub fn plus_coverage(covered: &BTreeSet<EventLabel>) -> BTreeSet<EventLabel> {
    covered
        .iter()
        .filter(|ev| ev.sign == Sign::Plus)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{LabelId, LabelSet};

    fn plus(i: u16) -> NodeLabel {
        NodeLabel::Event(EventLabel::plus(LabelId(i)))
    }

    fn minus(i: u16) -> NodeLabel {
        NodeLabel::Event(EventLabel::minus(LabelId(i)))
    }

    #[test]
    fn test_partition_coverage() {
        // root -> a+ -> { b+ -> a-, c+ }
        let labels = LabelSet::new(["a", "b", "c"]).unwrap();
        let mut t = DolloTree::new_root(labels);
        let a = t.add_child(t.root(), plus(0));
        let b = t.add_child(a, plus(1));
        t.add_child(b, minus(0));
        t.add_child(a, plus(2));
        t.set_binary_tags(t.root());

        let part = t.partition();
        assert_eq!(part.len(), 3);

        let a_cov = &part[&EventLabel::plus(LabelId(0))];
        assert!(a_cov.contains(&EventLabel::plus(LabelId(1))));
        assert!(a_cov.contains(&EventLabel::plus(LabelId(2))));
        assert!(a_cov.contains(&EventLabel::minus(LabelId(0))));

        // Leaf gain node covers nothing.
        assert!(part[&EventLabel::plus(LabelId(2))].is_empty());
    }

    #[test]
    fn test_plus_coverage_filters_losses() {
        let mut set = BTreeSet::new();
        set.insert(EventLabel::plus(LabelId(0)));
        set.insert(EventLabel::minus(LabelId(1)));
        let plus_only = plus_coverage(&set);
        assert_eq!(plus_only.len(), 1);
        assert!(plus_only.contains(&EventLabel::plus(LabelId(0))));
    }
}
