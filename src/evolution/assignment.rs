//! Read-to-tree assignment with a bounded, content-keyed memo cache.
//!
//! Closest-node queries dominate the cost of evaluation: level-3 fitness
//! issues O(reads × positions³) of them per individual, and perturbed reads
//! repeat heavily across levels. The engine memoizes per
//! `(tree fingerprint, read bits, unknown mask)` so identical queries hit the
//! cache regardless of which `Read` value carried them: the identifier is
//! deliberately not part of the key.
//!
//! The cache is keyed by content, never by object identity, and is bounded:
//! least-recently-used entries are evicted once the capacity is reached, so
//! long searches cannot grow it without limit. Engines are cheap to build;
//! parallel callers use one engine per worker instead of sharing.

use crate::base::{BitVector, Read, ReadError};
use crate::tree::{DolloTree, NodeId};
use std::collections::{HashMap, VecDeque};

/// Default cache capacity, in entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 8192;

#[derive(Clone, PartialEq, Eq, Hash)]
struct DistanceKey {
    tree: u64,
    bits: BitVector,
    unknown: BitVector,
}

struct CacheEntry {
    node: NodeId,
    distance: u32,
    stamp: u64,
}

/// Nearest-node query engine with a bounded LRU memo cache.
pub struct DistanceEngine {
    map: HashMap<DistanceKey, CacheEntry>,
    order: VecDeque<(DistanceKey, u64)>,
    counter: u64,
    capacity: usize,
}

impl DistanceEngine {
    /// Engine with the default cache capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Engine with an explicit cache capacity (entries).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            counter: 0,
            capacity: capacity.max(1),
        }
    }

    /// Number of cached distances.
    pub fn cached_entries(&self) -> usize {
        self.map.len()
    }

    /// Nearest node of `tree` to `read` and the distance to it.
    ///
    /// Distance counts disagreeing positions outside the read's unknown
    /// mask; ties break to the first minimal node in preorder.
    ///
    /// # Errors
    /// Fails when the read's length does not match the tree's alphabet.
    pub fn closest_node(
        &mut self,
        tree: &DolloTree,
        read: &Read,
    ) -> Result<(NodeId, u32), ReadError> {
        let key = DistanceKey {
            tree: tree.fingerprint(),
            bits: read.bits().clone(),
            unknown: read.unknown().clone(),
        };
        if let Some(hit) = self.lookup(&key) {
            return Ok(hit);
        }
        let (node, distance) = tree.closest_node_in_tree(read)?;
        self.insert(key, node, distance);
        Ok((node, distance))
    }

    /// Assign every read to its nearest node.
    ///
    /// Returns the assigned nodes, parallel to the input order, and the sum
    /// of distances, the plain non-noise-aware fitness baseline.
    pub fn assign_reads(
        &mut self,
        tree: &DolloTree,
        reads: &[Read],
    ) -> Result<(Vec<NodeId>, u32), ReadError> {
        let mut nodes = Vec::with_capacity(reads.len());
        let mut total = 0u32;
        for read in reads {
            let (node, d) = self.closest_node(tree, read)?;
            nodes.push(node);
            total += d;
        }
        Ok((nodes, total))
    }

    fn lookup(&mut self, key: &DistanceKey) -> Option<(NodeId, u32)> {
        let entry = self.map.get_mut(key)?;
        let stamp = self.counter;
        self.counter = self.counter.wrapping_add(1);
        entry.stamp = stamp;
        let hit = (entry.node, entry.distance);
        self.order.push_back((key.clone(), stamp));
        self.compact_order();
        Some(hit)
    }

    fn insert(&mut self, key: DistanceKey, node: NodeId, distance: u32) {
        let stamp = self.counter;
        self.counter = self.counter.wrapping_add(1);
        self.map.insert(
            key.clone(),
            CacheEntry {
                node,
                distance,
                stamp,
            },
        );
        self.order.push_back((key, stamp));
        self.evict();
    }

    fn evict(&mut self) {
        while self.map.len() > self.capacity {
            let Some((key, stamp)) = self.order.pop_front() else {
                break;
            };
            // Skip stale order entries left behind by later touches.
            if self.map.get(&key).is_some_and(|e| e.stamp == stamp) {
                self.map.remove(&key);
            }
        }
        self.compact_order();
    }

    /// Drop stale order entries once they dominate the queue, so cache-hit
    /// heavy workloads cannot grow it without bound.
    fn compact_order(&mut self) {
        if self.order.len() > self.capacity.saturating_mul(8) {
            let map = &self.map;
            self.order
                .retain(|(key, stamp)| map.get(key).is_some_and(|e| e.stamp == *stamp));
        }
    }
}

impl Default for DistanceEngine {
    fn default() -> Self {
        Self::new()
    }
}
