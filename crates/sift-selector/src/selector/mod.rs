//! Selector AST.
//!
//! A [`Selector`] is a chain of [`Sequence`]s joined by [`Combinator`]s.
//! Sequences live in an arena and refer to each other through
//! [`SequenceId`] indices, so walking the chain in either direction is
//! O(1) and the chain can be edited from both ends.
//!
//! Printing any node with `Display` produces canonical text: parsing that
//! text yields an equal AST.

mod sequence;
mod simple;

use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use strum_macros::IntoStaticStr;

use crate::error::StructureError;

pub use sequence::Sequence;
pub use simple::{
    Attribute, Operator, Path, PathItem, Pseudo, SelectorKind, SimpleSelector, SortOrder, Value,
};

/// Relationship between a sequence and the one after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Combinator {
    /// `a b`: b is a descendant of a
    Descendant,
    /// `a>b`: b is a direct child of a
    Child,
    /// `a+b`: b immediately follows a
    AdjacentSibling,
    /// `a~b`: b follows a
    GeneralSibling,
}

impl Combinator {
    /// Every combinator character.
    pub const CHARS: [char; 4] = [' ', '>', '+', '~'];

    /// The combinator written as `c`.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Self::Descendant),
            '>' => Some(Self::Child),
            '+' => Some(Self::AdjacentSibling),
            '~' => Some(Self::GeneralSibling),
            _ => None,
        }
    }

    /// The canonical character for this combinator.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Descendant => ' ',
            Self::Child => '>',
            Self::AdjacentSibling => '+',
            Self::GeneralSibling => '~',
        }
    }

    /// Kebab-case name, e.g. `adjacent-sibling`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Index of a sequence inside a [`Selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceId(pub usize);

#[derive(Debug, Clone, PartialEq)]
struct SequenceNode {
    sequence: Sequence,
    parent: Option<SequenceId>,
    child: Option<SequenceId>,
    /// Combinator between this sequence and its child
    child_combinator: Option<Combinator>,
}

/// One element of [`Selector::sequence_path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathStep<'a> {
    /// A sequence
    Sequence(&'a Sequence),
    /// The combinator between the surrounding sequences
    Combinator(Combinator),
}

/// A full selector: sequences joined by combinators.
///
/// Nodes are kept in chain order, so `SequenceId(0)` is always the first
/// sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    nodes: Vec<SequenceNode>,
}

impl Selector {
    /// An empty selector.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append `sequence` to the end of the chain.
    ///
    /// The first sequence takes no combinator; every later one requires
    /// one, which is stored on the sequence before it.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::CombinatorOnFirstSequence`] or
    /// [`StructureError::MissingCombinator`] when that rule is broken.
    pub fn append_sequence(
        &mut self,
        sequence: Sequence,
        combinator: Option<Combinator>,
    ) -> Result<SequenceId, StructureError> {
        let id = SequenceId(self.nodes.len());
        let parent = match (self.nodes.last_mut(), combinator) {
            (None, Some(_)) => return Err(StructureError::CombinatorOnFirstSequence),
            (Some(_), None) => return Err(StructureError::MissingCombinator),
            (None, None) => None,
            (Some(last), Some(combinator)) => {
                last.child = Some(id);
                last.child_combinator = Some(combinator);
                Some(SequenceId(id.0 - 1))
            }
        };

        self.nodes.push(SequenceNode {
            sequence,
            parent,
            child: None,
            child_combinator: None,
        });
        Ok(id)
    }

    /// Number of sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the selector has no sequences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id of the first sequence.
    #[must_use]
    pub fn first(&self) -> Option<SequenceId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(SequenceId(0))
        }
    }

    /// Id of the last sequence.
    #[must_use]
    pub fn last(&self) -> Option<SequenceId> {
        match self.nodes.len() {
            0 => None,
            len => Some(SequenceId(len - 1)),
        }
    }

    /// Sequence stored under `id`.
    #[must_use]
    pub fn get(&self, id: SequenceId) -> Option<&Sequence> {
        self.nodes.get(id.0).map(|node| &node.sequence)
    }

    /// Mutable sequence stored under `id`.
    pub fn get_mut(&mut self, id: SequenceId) -> Option<&mut Sequence> {
        self.nodes.get_mut(id.0).map(|node| &mut node.sequence)
    }

    /// Sequence that follows `id`.
    #[must_use]
    pub fn child(&self, id: SequenceId) -> Option<SequenceId> {
        self.nodes.get(id.0).and_then(|node| node.child)
    }

    /// Sequence that precedes `id`.
    #[must_use]
    pub fn parent(&self, id: SequenceId) -> Option<SequenceId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Combinator between `id` and its child.
    #[must_use]
    pub fn child_combinator(&self, id: SequenceId) -> Option<Combinator> {
        self.nodes.get(id.0).and_then(|node| node.child_combinator)
    }

    /// Sequence at chain position `index`.
    #[must_use]
    pub fn sequence(&self, index: usize) -> Option<&Sequence> {
        self.get(SequenceId(index))
    }

    /// The first sequence.
    #[must_use]
    pub fn first_sequence(&self) -> Option<&Sequence> {
        self.first().and_then(|id| self.get(id))
    }

    /// The last sequence.
    #[must_use]
    pub fn last_sequence(&self) -> Option<&Sequence> {
        self.last().and_then(|id| self.get(id))
    }

    /// Iterate sequences from first to last.
    pub fn sequences(&self) -> impl Iterator<Item = &Sequence> {
        self.nodes.iter().map(|node| &node.sequence)
    }

    /// Sequences interleaved with the combinators between them.
    #[must_use]
    pub fn sequence_path(&self) -> Vec<PathStep<'_>> {
        let mut path = Vec::with_capacity(self.nodes.len() * 2);
        for node in &self.nodes {
            path.push(PathStep::Sequence(&node.sequence));
            if let Some(combinator) = node.child_combinator {
                path.push(PathStep::Combinator(combinator));
            }
        }
        path
    }

    /// Remove the last sequence, unlinking it from its parent.
    pub fn pop_sequence(&mut self) -> Option<Sequence> {
        let node = self.nodes.pop()?;
        if let Some(last) = self.nodes.last_mut() {
            last.child = None;
            last.child_combinator = None;
        }
        Some(node.sequence)
    }

    /// Remove the first sequence. The next sequence becomes first and loses
    /// its inbound combinator.
    pub fn shift_sequence(&mut self) -> Option<Sequence> {
        if self.nodes.is_empty() {
            return None;
        }
        let node = self.nodes.remove(0);
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.parent = index.checked_sub(1).map(SequenceId);
            node.child = node.child.map(|_| SequenceId(index + 1));
        }
        Some(node.sequence)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            node.sequence.fmt(f)?;
            if let Some(combinator) = node.child_combinator {
                combinator.fmt(f)?;
            }
        }
        Ok(())
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Step<'a> {
            sequence: &'a Sequence,
            #[serde(skip_serializing_if = "Option::is_none")]
            combinator: Option<Combinator>,
        }

        let mut seq = serializer.serialize_seq(Some(self.nodes.len()))?;
        for node in &self.nodes {
            seq.serialize_element(&Step {
                sequence: &node.sequence,
                combinator: node.child_combinator,
            })?;
        }
        seq.end()
    }
}
