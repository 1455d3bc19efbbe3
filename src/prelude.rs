//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use dollevo::prelude::*;
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//!
//! let labels = LabelSet::new(["a", "b", "c"]).unwrap();
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
//! let tree = DolloTree::initialize(&labels, 2, &mut rng);
//! assert!(tree.descendant_count() >= labels.len());
//! ```

pub use crate::base::{
    BitVector, EventLabel, LabelError, LabelId, LabelSet, NodeLabel, Read, ReadError, Sign,
    TreeError,
};
pub use crate::evolution::{
    crossover, crossover_edge, crossover_subtrees, evaluate_population, mutate, mutation_add,
    mutation_demote, mutation_promote, mutation_remove, DistanceEngine, Evaluator,
};
pub use crate::tree::{DolloTree, NodeId};
