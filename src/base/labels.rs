//! Trait labels and the plus/minus event alphabet.
//!
//! Every node of a Dollo tree carries either the root sentinel or an event
//! label: a trait label paired with a sign, `+` for the edge where the trait
//! is gained and `-` for an edge where it is lost. Labels are interned into
//! a [`LabelSet`] once per run and referenced by index everywhere else.

use crate::base::errors::LabelError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Index of a trait label within its [`LabelSet`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LabelId(pub u16);

/// Whether a trait is gained or lost on the edge into a node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Sign {
    Plus,
    Minus,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
        }
    }
}

/// A signed trait label, e.g. `a+` or `c-`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EventLabel {
    pub label: LabelId,
    pub sign: Sign,
}

impl EventLabel {
    /// Gain event for `label`.
    pub fn plus(label: LabelId) -> Self {
        Self { label, sign: Sign::Plus }
    }

    /// Loss event for `label`.
    pub fn minus(label: LabelId) -> Self {
        Self { label, sign: Sign::Minus }
    }
}

/// Label of a tree node: the root sentinel or a signed trait event.
///
/// The root sentinel renders as `--`, matching the conventional dump format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum NodeLabel {
    Root,
    Event(EventLabel),
}

/// The ordered trait-label alphabet of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSet {
    names: Vec<String>,
    index: HashMap<String, LabelId>,
}

impl LabelSet {
    /// Build an alphabet from label names, preserving their order.
    ///
    /// # Errors
    /// Returns an error if the alphabet is empty or a name repeats.
    pub fn new<I, S>(names: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(LabelError::Empty);
        }
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), LabelId(i as u16)).is_some() {
                return Err(LabelError::Duplicate(name.clone()));
            }
        }
        Ok(Self { names, index })
    }

    /// Number of trait labels.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the alphabet has no labels (never the case post-construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Label ids in alphabet order.
    pub fn ids(&self) -> impl Iterator<Item = LabelId> + '_ {
        (0..self.names.len()).map(|i| LabelId(i as u16))
    }

    /// Name of a label.
    #[inline]
    pub fn name(&self, id: LabelId) -> &str {
        &self.names[id.0 as usize]
    }

    /// Look up a label by name.
    pub fn id(&self, name: &str) -> Option<LabelId> {
        self.index.get(name).copied()
    }

    /// Render an event label using this alphabet's names, e.g. `a+`.
    pub fn format_event(&self, event: EventLabel) -> String {
        format!("{}{}", self.name(event.label), event.sign)
    }

    /// Render any node label; the root sentinel is `--`.
    pub fn format_node(&self, label: NodeLabel) -> String {
        match label {
            NodeLabel::Root => "--".to_string(),
            NodeLabel::Event(ev) => self.format_event(ev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_lookup() {
        let labels = LabelSet::new(["a", "b", "c"]).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.id("b"), Some(LabelId(1)));
        assert_eq!(labels.id("z"), None);
        assert_eq!(labels.name(LabelId(2)), "c");
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = LabelSet::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, LabelError::Duplicate("a".into()));
    }

    #[test]
    fn test_empty_rejected() {
        let err = LabelSet::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, LabelError::Empty);
    }

    #[test]
    fn test_event_formatting() {
        let labels = LabelSet::new(["a", "b"]).unwrap();
        assert_eq!(labels.format_event(EventLabel::plus(LabelId(0))), "a+");
        assert_eq!(labels.format_event(EventLabel::minus(LabelId(1))), "b-");
        assert_eq!(labels.format_node(NodeLabel::Root), "--");
    }

    #[test]
    fn test_event_ordering() {
        // Canonical sibling order: by label index, plus before minus.
        let a_plus = EventLabel::plus(LabelId(0));
        let a_minus = EventLabel::minus(LabelId(0));
        let b_plus = EventLabel::plus(LabelId(1));
        assert!(a_plus < a_minus);
        assert!(a_minus < b_plus);
    }
}
