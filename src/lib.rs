//! Dollevo: evolutionary operators for phylogenetic tree search under the
//! Dollo parsimony model.
//!
//! This library evolves populations of plus/minus-labeled tree individuals
//! toward trees that best explain observed binary character reads under a
//! noisy-measurement model. It provides the operator core of such a search:
//! read-to-tree assignment with memoized distances, multi-level
//! false-positive-aware fitness, structural crossover and mutation
//! scaffolding, together with the labeled Dollo tree they operate on.

pub mod base;
pub mod evolution;
pub mod prelude;
pub mod tree;

// Re-export the types most consumers reach for first.
pub use base::{BitVector, LabelSet, Read};
pub use tree::DolloTree;
