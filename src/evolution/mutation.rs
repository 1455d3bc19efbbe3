//! Structural mutation scaffolding.
//!
//! Four mutation kinds are contracted (add, remove, promote, demote), each
//! operating on a deep copy and reporting `(success, mutant)`. The bodies
//! that restructure the tree (and the plus/minus repair that must follow)
//! are open extension points: every kind currently reports failure, and the
//! orchestrator degrades to returning an unchanged copy. Mutation, like
//! crossover, never fails outright and never touches its input.

use crate::base::{EventLabel, LabelId, LabelSet};
use crate::evolution::random_sign;
use crate::tree::DolloTree;
use rand::Rng;

/// Mutate by adding one node.
///
/// Draws the attachment parent uniformly over descendants, a uniform label
/// and a size-weighted sign, mirroring edge exchange. Attaching the node and
/// repairing plus/minus consistency around it is the pending extension;
/// until then the draw is discarded and failure is reported.
pub fn mutation_add<R: Rng + ?Sized>(
    labels: &LabelSet,
    _k: usize,
    individual: &DolloTree,
    rng: &mut R,
) -> (bool, DolloTree) {
    let mutant = individual.clone_individual();
    let descendants = mutant.descendants();
    if !descendants.is_empty() {
        let _parent = descendants[rng.random_range(0..descendants.len())];
    }
    let label = LabelId(rng.random_range(0..labels.len()) as u16);
    let sign = random_sign(labels, &mutant, rng);
    let _event = EventLabel { label, sign };
    (false, mutant)
}

/// Mutate by removing one node. Extension point; always declines.
pub fn mutation_remove(
    _labels: &LabelSet,
    _k: usize,
    individual: &DolloTree,
) -> (bool, DolloTree) {
    (false, individual.clone_individual())
}

/// Mutate by moving a node `level` steps toward the root. Extension point;
/// always declines.
pub fn mutation_promote(
    _labels: &LabelSet,
    _k: usize,
    _level: usize,
    individual: &DolloTree,
) -> (bool, DolloTree) {
    (false, individual.clone_individual())
}

/// Mutate by moving a node `level` steps away from the root. Extension
/// point; always declines.
pub fn mutation_demote(
    _labels: &LabelSet,
    _k: usize,
    _level: usize,
    individual: &DolloTree,
) -> (bool, DolloTree) {
    (false, individual.clone_individual())
}

/// Mutation orchestrator: attempts the add mutation only; on failure the
/// result is an independent, unchanged copy of the input.
pub fn mutate<R: Rng + ?Sized>(
    labels: &LabelSet,
    k: usize,
    individual: &DolloTree,
    rng: &mut R,
) -> DolloTree {
    let (success, mutant) = mutation_add(labels, k, individual, rng);
    if success {
        mutant
    } else {
        individual.clone_individual()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn setup() -> (LabelSet, DolloTree) {
        let labels = LabelSet::new(["a", "b", "c", "d"]).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(13);
        let tree = DolloTree::initialize(&labels, 2, &mut rng);
        (labels, tree)
    }

    #[test]
    fn test_mutations_decline_with_unchanged_copies() {
        let (labels, tree) = setup();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);

        let (ok, m) = mutation_add(&labels, 2, &tree, &mut rng);
        assert!(!ok);
        assert!(m.is_equal(&tree));

        let (ok, m) = mutation_remove(&labels, 2, &tree);
        assert!(!ok);
        assert!(m.is_equal(&tree));

        let (ok, m) = mutation_promote(&labels, 2, 1, &tree);
        assert!(!ok);
        assert!(m.is_equal(&tree));

        let (ok, m) = mutation_demote(&labels, 2, 1, &tree);
        assert!(!ok);
        assert!(m.is_equal(&tree));
    }

    #[test]
    fn test_mutate_degrades_to_identity() {
        let (labels, tree) = setup();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let mutant = mutate(&labels, 2, &tree, &mut rng);
        assert!(mutant.is_equal(&tree));
    }

    #[test]
    fn test_mutant_is_independent_of_parent() {
        let (labels, tree) = setup();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let mut mutant = mutate(&labels, 2, &tree, &mut rng);
        let target = mutant.descendants()[0];
        mutant.add_child(
            target,
            crate::base::NodeLabel::Event(EventLabel::minus(LabelId(0))),
        );
        mutant.set_binary_tags(mutant.root());
        assert!(!tree.is_equal(&mutant));
        // Parent keeps its own structure and Dollo bound.
        for id in labels.ids() {
            assert!(tree.loss_count(id) <= 2);
        }
    }
}
