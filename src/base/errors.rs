use std::error;
use std::fmt;

/// Errors raised when building a label alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// The alphabet contained no labels.
    Empty,

    /// The same label name appeared more than once.
    Duplicate(String),
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Label alphabet must not be empty"),
            Self::Duplicate(name) => write!(f, "Duplicate label in alphabet: '{name}'"),
        }
    }
}

impl error::Error for LabelError {}

/// Errors raised when constructing or applying a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Binary vector and unknown mask had different lengths.
    LengthMismatch { bits: usize, unknown: usize },

    /// A read's length did not match the tree's label alphabet.
    AlphabetMismatch { read: usize, alphabet: usize },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { bits, unknown } => write!(
                f,
                "Read length mismatch: binary vector has {bits} bits, unknown mask has {unknown}"
            ),
            Self::AlphabetMismatch { read, alphabet } => write!(
                f,
                "Read has {read} positions but the label alphabet has {alphabet}"
            ),
        }
    }
}

impl error::Error for ReadError {}

/// Errors raised by structural tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A labeled node required by an operator was not present in the tree.
    LabelNotFound(String),

    /// A subtree operation targeted the root, which has no parent edge.
    CannotDetachRoot,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LabelNotFound(label) => write!(f, "Node with label '{label}' not found in tree"),
            Self::CannotDetachRoot => write!(f, "Cannot detach the root node from its parent"),
        }
    }
}

impl error::Error for TreeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReadError::LengthMismatch { bits: 6, unknown: 4 };
        assert!(format!("{err}").contains("mismatch"));

        let err = TreeError::LabelNotFound("a+".into());
        assert!(format!("{err}").contains("a+"));

        let err = LabelError::Duplicate("b".into());
        assert!(format!("{err}").contains("'b'"));
    }
}
