//! The read model: observed binary trait vectors with unknown-position masks.

use crate::base::bits::BitVector;
use crate::base::errors::ReadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier given to perturbed copies produced during evaluation.
const PERTURBED_ID: &str = "perturbed";

/// An observed binary character read.
///
/// A read pairs a binary vector over the trait alphabet with an unknown mask
/// of equal length; a set mask bit means the true state at that position was
/// not observed. Reads are immutable once constructed. Perturbed variants are
/// always fresh values produced by [`Read::without_positions`].
///
/// The identifier is carried for reporting only: it takes no part in
/// equality, hashing or distance computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Read {
    id: Arc<str>,
    bits: BitVector,
    unknown: BitVector,
}

impl Read {
    /// Create a read from an identifier, a binary vector and an unknown mask.
    ///
    /// # Errors
    /// Returns an error when vector and mask lengths differ.
    pub fn new(
        id: impl Into<Arc<str>>,
        bits: BitVector,
        unknown: BitVector,
    ) -> Result<Self, ReadError> {
        if bits.len() != unknown.len() {
            return Err(ReadError::LengthMismatch {
                bits: bits.len(),
                unknown: unknown.len(),
            });
        }
        Ok(Self {
            id: id.into(),
            bits,
            unknown,
        })
    }

    /// Create a read with every position observed.
    pub fn fully_observed(id: impl Into<Arc<str>>, bits: BitVector) -> Self {
        let unknown = BitVector::zeros(bits.len());
        Self {
            id: id.into(),
            bits,
            unknown,
        }
    }

    /// The read identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The observed binary vector.
    #[inline]
    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    /// The unknown-position mask.
    #[inline]
    pub fn unknown(&self) -> &BitVector {
        &self.unknown
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for a zero-length read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// A new read with the given positions flipped to 0.
    ///
    /// Used by the evaluator to simulate false positives; the unknown mask is
    /// carried over unchanged and the caller's read is untouched.
    pub fn without_positions(&self, positions: &[usize]) -> Read {
        let mut bits = self.bits.clone();
        for &p in positions {
            bits.clear(p);
        }
        Read {
            id: Arc::from(PERTURBED_ID),
            bits,
            unknown: self.unknown.clone(),
        }
    }
}

/// Equality disregards the identifier: two reads are equal iff their binary
/// vectors and unknown masks are equal.
impl PartialEq for Read {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits && self.unknown == other.unknown
    }
}

impl Eq for Read {}

impl fmt::Display for Read {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (unknown {})",
            self.id,
            self.bits.to_bit_string(),
            self.unknown.to_bit_string()
        )
    }
}
