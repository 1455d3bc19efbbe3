//! Fixed-length bit vector used for node signatures, read bits and unknown
//! masks.
//!
//! Bits are packed into `u64` words. Each position corresponds to one trait
//! label of the run's alphabet, so vectors are short (tens of bits) but are
//! compared and hashed constantly by the distance engine, which makes the
//! word-level representation worthwhile.

use serde::{Deserialize, Serialize};

/// A fixed-length bit vector.
///
/// Invariant: bits at positions `>= len` are always zero, so word-level
/// operations never see garbage in the trailing word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
}

impl BitVector {
    /// Create a vector of `len` zero bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Build from explicit bit values.
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut v = Self::zeros(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b {
                v.set(i);
            }
        }
        v
    }

    /// Number of bit positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the vector has no positions at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the bit at `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        assert!(idx < self.len, "bit index {idx} out of range (len {})", self.len);
        (self.words[idx >> 6] >> (idx & 63)) & 1 == 1
    }

    /// Set the bit at `idx` to 1.
    #[inline]
    pub fn set(&mut self, idx: usize) {
        assert!(idx < self.len, "bit index {idx} out of range (len {})", self.len);
        self.words[idx >> 6] |= 1u64 << (idx & 63);
    }

    /// Set the bit at `idx` to 0.
    #[inline]
    pub fn clear(&mut self, idx: usize) {
        assert!(idx < self.len, "bit index {idx} out of range (len {})", self.len);
        self.words[idx >> 6] &= !(1u64 << (idx & 63));
    }

    /// Set the bit at `idx` to `value`.
    #[inline]
    pub fn assign(&mut self, idx: usize, value: bool) {
        if value {
            self.set(idx);
        } else {
            self.clear(idx);
        }
    }

    /// Number of set bits.
    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Iterate over the indices of set bits, in increasing order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }

    /// Hamming distance to `other`, counting only positions whose bit in
    /// `ignore` is clear.
    ///
    /// All three vectors must have the same length. Because trailing bits
    /// beyond `len` are zero in `self` and `other`, the high bits that
    /// `!ignore` turns on in the last word never contribute.
    pub fn hamming_ignoring(&self, other: &BitVector, ignore: &BitVector) -> u32 {
        debug_assert_eq!(self.len, other.len);
        debug_assert_eq!(self.len, ignore.len);
        self.words
            .iter()
            .zip(&other.words)
            .zip(&ignore.words)
            .map(|((&a, &b), &m)| ((a ^ b) & !m).count_ones())
            .sum()
    }

    /// Render as a `0`/`1` string, most significant position last.
    pub fn to_bit_string(&self) -> String {
        (0..self.len)
            .map(|i| if self.get(i) { '1' } else { '0' })
            .collect()
    }
}
