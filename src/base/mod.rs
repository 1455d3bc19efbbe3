//! Foundational value types: bit vectors, trait labels, and reads.

pub mod bits;
pub mod errors;
pub mod labels;
pub mod read;

pub use bits::BitVector;
pub use errors::{LabelError, ReadError, TreeError};
pub use labels::{EventLabel, LabelId, LabelSet, NodeLabel, Sign};
pub use read::Read;
