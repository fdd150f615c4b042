//! Parse and construction errors.

use thiserror::Error;

use crate::selector::SelectorKind;

/// Error raised while turning a pattern string into a [`crate::Selector`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The pattern was empty or whitespace only.
    #[error("selector pattern is empty")]
    EmptyPattern,

    /// A token did not match any simple selector grammar.
    #[error("unrecognized simple selector \"{token}\"")]
    UnrecognizedSelector {
        /// Offending token
        token: String,
    },

    /// Text followed the universal selector inside one token.
    #[error("unexpected text after universal selector in \"{token}\"")]
    UnexpectedUniversalValue {
        /// Offending token
        token: String,
    },

    /// An id, role or class selector had nothing after its prefix.
    #[error("{kind:?} selector requires a value")]
    MissingValue {
        /// Kind of the empty selector
        kind: SelectorKind,
    },

    /// An attribute selector had no attribute name.
    #[error("attribute selector \"{pattern}\" has no attribute name")]
    EmptyAttributeName {
        /// Attribute selector body
        pattern: String,
    },

    /// An attribute selector used an operator outside the supported set.
    #[error("invalid operator \"{operator}\" in attribute selector \"{pattern}\"")]
    InvalidOperator {
        /// Operator text as written
        operator: String,
        /// Attribute selector body
        pattern: String,
    },

    /// A quoted value had no closing quote.
    #[error("unterminated quote in \"{pattern}\"")]
    UnterminatedQuote {
        /// Text containing the quote
        pattern: String,
    },

    /// An attribute selector had no closing `]`.
    #[error("unterminated attribute selector \"{token}\"")]
    UnterminatedAttribute {
        /// Offending token
        token: String,
    },

    /// A pseudo selector without a class name, or a registered pseudo
    /// selector with an unusable value.
    #[error("invalid pseudo selector \"{pattern}\"")]
    InvalidPseudo {
        /// Pseudo selector body
        pattern: String,
    },

    /// A pseudo selector value had no closing `)`.
    #[error("missing closing parenthesis in pseudo selector \"{pattern}\"")]
    MissingClosingParen {
        /// Pseudo selector body
        pattern: String,
    },

    /// `:sort` was given an order other than `asc` or `desc`.
    #[error("invalid sort order \"{order}\", expected asc or desc")]
    InvalidSortOrder {
        /// Order as written
        order: String,
    },

    /// A combinator was not followed by a sequence.
    #[error("combinator at position {position} is not followed by a sequence")]
    DanglingCombinator {
        /// Character position of the combinator in the trimmed pattern
        position: usize,
    },

    /// The parsed pieces violate a structural rule of the AST.
    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// Error raised when assembling sequences and selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Universal, element and path selectors may only start a sequence.
    #[error("{kind:?} selector must be the first item of a sequence")]
    NotFirstInSequence {
        /// Kind of the misplaced selector
        kind: SelectorKind,
    },

    /// Only attribute and pseudo selectors may directly follow a path.
    #[error("{kind:?} selector cannot directly follow a path selector")]
    NotAfterPath {
        /// Kind of the misplaced selector
        kind: SelectorKind,
    },

    /// The first sequence of a selector was given a combinator.
    #[error("the first sequence of a selector cannot have a combinator")]
    CombinatorOnFirstSequence,

    /// A sequence after the first was appended without a combinator.
    #[error("a sequence after the first must be preceded by a combinator")]
    MissingCombinator,

    /// A path root was neither an id nor a role selector.
    #[error("path root must be an id or role selector, found {kind:?}")]
    InvalidPathRoot {
        /// Kind of the rejected root
        kind: SelectorKind,
    },

    /// An embedded selector appeared after the first path item.
    #[error("an embedded selector is only allowed as the first path item")]
    MisplacedPathRoot,
}
