//! Reproducibility tests: seeded runs must replay exactly.

use dollevo::base::{BitVector, LabelSet, Read};
use dollevo::evolution::{crossover, Evaluator};
use dollevo::tree::DolloTree;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

fn alphabet() -> LabelSet {
    LabelSet::new(["a", "b", "c", "d", "e", "f"]).unwrap()
}

#[test]
fn test_seeded_initialization_replays() {
    let labels = alphabet();
    for seed in [111133u64, 1, 982451653] {
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(seed);
        // Three trees drawn from one stream, as in the demo driver.
        for _ in 0..3 {
            let t1 = DolloTree::initialize(&labels, 2, &mut rng1);
            let t2 = DolloTree::initialize(&labels, 2, &mut rng2);
            assert!(t1.is_equal(&t2));
        }
    }
}

#[test]
fn test_trees_from_one_stream_differ() {
    let labels = alphabet();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(111133);
    let t1 = DolloTree::initialize(&labels, 2, &mut rng);
    let t2 = DolloTree::initialize(&labels, 2, &mut rng);
    let t3 = DolloTree::initialize(&labels, 2, &mut rng);
    // Not guaranteed in general, but stable for this fixed seed; the stream
    // advances between draws.
    assert!(!t1.is_equal(&t2) || !t2.is_equal(&t3));
}

#[test]
fn test_seeded_crossover_replays() {
    let labels = alphabet();
    let mut init_rng = Xoshiro256PlusPlus::seed_from_u64(40);
    let p1 = DolloTree::initialize(&labels, 2, &mut init_rng);
    let p2 = DolloTree::initialize(&labels, 2, &mut init_rng);

    let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(8);
    let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(8);
    let (a1, a2) = crossover(&labels, &p1, &p2, &mut rng1).unwrap();
    let (b1, b2) = crossover(&labels, &p1, &p2, &mut rng2).unwrap();
    assert!(a1.is_equal(&b1));
    assert!(a2.is_equal(&b2));
}

#[test]
fn test_fitness_is_stable_across_cache_states() {
    let labels = alphabet();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(64);
    let tree = DolloTree::initialize(&labels, 2, &mut rng);
    let reads = vec![
        Read::fully_observed(
            "r0",
            BitVector::from_bools(&[true, true, false, false, true, false]),
        ),
        Read::fully_observed(
            "r1",
            BitVector::from_bools(&[false, false, true, true, false, true]),
        ),
    ];

    // A cold evaluator, a warm one, and one with a tiny cache must agree.
    let mut cold = Evaluator::new();
    let cold_value = cold.evaluate_level2(&reads, 0.3, &tree).unwrap();

    let mut warm = Evaluator::new();
    warm.evaluate_level2(&reads, 0.3, &tree).unwrap();
    let warm_value = warm.evaluate_level2(&reads, 0.3, &tree).unwrap();

    let mut tiny = Evaluator::with_cache_capacity(2);
    let tiny_value = tiny.evaluate_level2(&reads, 0.3, &tree).unwrap();

    assert_eq!(cold_value, warm_value);
    assert_eq!(cold_value, tiny_value);
}
