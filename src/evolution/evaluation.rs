//! Noise-aware fitness evaluation.
//!
//! Fitness is a total weighted distance: lower is better. Level 0 sums each
//! read's distance to its closest node. Each higher level adds the distances
//! of all reads with 1, 2 or 3 set bits flipped to zero (simulated false
//! positives), weighted by the false-positive probability `alpha`.
//!
//! Two quirks are kept for compatibility with existing fitness values:
//! - level 3 weighs triple flips by `alpha²`, not `alpha³`; consumers may
//!   depend on the scores, so the weight is not corrected here;
//! - the combined [`Evaluator::evaluate`] entry point takes
//!   `(reads, individual, alpha)` while the level methods take
//!   `(reads, alpha, individual)`. The positional meanings are as documented
//!   here; watch the order when switching between them.

use crate::base::{Read, ReadError};
use crate::evolution::assignment::DistanceEngine;
use crate::tree::DolloTree;
use rayon::prelude::*;

/// Multi-level noise-aware evaluator.
///
/// Owns the distance engine whose memo cache makes the perturbation sweeps
/// affordable; reuse one evaluator across evaluations of the same trees to
/// keep the cache warm.
pub struct Evaluator {
    engine: DistanceEngine,
}

impl Evaluator {
    /// Evaluator with the default cache capacity.
    pub fn new() -> Self {
        Self {
            engine: DistanceEngine::new(),
        }
    }

    /// Evaluator with an explicit cache capacity.
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            engine: DistanceEngine::with_capacity(capacity),
        }
    }

    /// Access the underlying distance engine.
    pub fn engine_mut(&mut self) -> &mut DistanceEngine {
        &mut self.engine
    }

    /// Level 0: sum of exact-match distances. `alpha` is unused here but kept
    /// for signature uniformity across levels.
    pub fn evaluate_level0(
        &mut self,
        reads: &[Read],
        _alpha: f64,
        tree: &DolloTree,
    ) -> Result<f64, ReadError> {
        let mut total = 0.0;
        for read in reads {
            let (_, d) = self.engine.closest_node(tree, read)?;
            total += f64::from(d);
        }
        Ok(total)
    }

    /// Level 1: level 0 plus every single-position false-positive flip,
    /// weighted by `alpha`.
    ///
    /// Precondition (documented, not validated): `alpha` is in `[0, 1]`.
    pub fn evaluate_level1(
        &mut self,
        reads: &[Read],
        alpha: f64,
        tree: &DolloTree,
    ) -> Result<f64, ReadError> {
        let mut total = self.evaluate_level0(reads, alpha, tree)?;
        for read in reads {
            for i in read.bits().ones() {
                let perturbed = read.without_positions(&[i]);
                let (_, d) = self.engine.closest_node(tree, &perturbed)?;
                total += f64::from(d) * alpha;
            }
        }
        Ok(total)
    }

    /// Level 2: level 1 plus every unordered pair of flips, weighted by
    /// `alpha²`.
    pub fn evaluate_level2(
        &mut self,
        reads: &[Read],
        alpha: f64,
        tree: &DolloTree,
    ) -> Result<f64, ReadError> {
        let mut total = self.evaluate_level1(reads, alpha, tree)?;
        for read in reads {
            let ones: Vec<usize> = read.bits().ones().collect();
            for (a, &i) in ones.iter().enumerate() {
                for &j in &ones[a + 1..] {
                    let perturbed = read.without_positions(&[i, j]);
                    let (_, d) = self.engine.closest_node(tree, &perturbed)?;
                    total += f64::from(d) * alpha * alpha;
                }
            }
        }
        Ok(total)
    }

    /// Level 3: level 2 plus every unordered triple of flips, weighted by
    /// `alpha²` (sic, see the module docs).
    pub fn evaluate_level3(
        &mut self,
        reads: &[Read],
        alpha: f64,
        tree: &DolloTree,
    ) -> Result<f64, ReadError> {
        let mut total = self.evaluate_level2(reads, alpha, tree)?;
        for read in reads {
            let ones: Vec<usize> = read.bits().ones().collect();
            for (a, &i) in ones.iter().enumerate() {
                for (b, &j) in ones.iter().enumerate().skip(a + 1) {
                    for &l in &ones[b + 1..] {
                        let perturbed = read.without_positions(&[i, j, l]);
                        let (_, d) = self.engine.closest_node(tree, &perturbed)?;
                        total += f64::from(d) * alpha * alpha;
                    }
                }
            }
        }
        Ok(total)
    }

    /// Combined entry point: level-2 fitness wrapped in a single-element
    /// tuple, which keeps the evaluator pluggable into multi-objective
    /// frameworks.
    ///
    /// Note the argument order: `(reads, individual, alpha)`, reversed
    /// relative to the level methods.
    pub fn evaluate(
        &mut self,
        reads: &[Read],
        individual: &DolloTree,
        alpha: f64,
    ) -> Result<(f64,), ReadError> {
        Ok((self.evaluate_level2(reads, alpha, individual)?,))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Level-2 fitness for a whole population, in parallel.
///
/// Each worker gets its own evaluator: distance caches are engine-local and
/// must never be shared across workers.
pub fn evaluate_population(
    reads: &[Read],
    alpha: f64,
    individuals: &[DolloTree],
) -> Result<Vec<f64>, ReadError> {
    individuals
        .par_iter()
        .map(|tree| {
            let mut evaluator = Evaluator::new();
            evaluator.evaluate_level2(reads, alpha, tree)
        })
        .collect()
}
