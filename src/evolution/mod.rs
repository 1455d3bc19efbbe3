//! Evolutionary operators over Dollo tree individuals.
//!
//! - **Assignment**: nearest-node queries with a bounded memo cache
//! - **Evaluation**: multi-level false-positive-aware fitness
//! - **Crossover**: subtree exchange and edge exchange
//! - **Mutation**: add/remove/promote/demote scaffolding
//!
//! Operators never mutate their inputs: they deep-copy first and either
//! succeed or degrade to returning the copies unchanged.

pub mod assignment;
pub mod crossover;
pub mod evaluation;
pub mod mutation;

pub use assignment::{DistanceEngine, DEFAULT_CACHE_CAPACITY};
pub use crossover::{crossover, crossover_edge, crossover_subtrees};
pub use evaluation::{evaluate_population, Evaluator};
pub use mutation::{
    mutate, mutation_add, mutation_demote, mutation_promote, mutation_remove,
};

use crate::base::{LabelSet, Sign};
use crate::tree::DolloTree;
use rand::Rng;

/// Decide plus versus minus with the size-weighted coin shared by edge
/// exchange and mutation: `p(plus) = |labels| / (1 + descendants)`, so gain
/// edges get picked less often as trees grow.
pub(crate) fn random_sign<R: Rng + ?Sized>(
    labels: &LabelSet,
    tree: &DolloTree,
    rng: &mut R,
) -> Sign {
    let p = labels.len() as f64 / (1.0 + tree.descendant_count() as f64);
    if rng.random::<f64>() < p {
        Sign::Plus
    } else {
        Sign::Minus
    }
}
