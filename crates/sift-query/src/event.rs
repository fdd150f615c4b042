//! Events fired by [`QueryBuilder`](crate::QueryBuilder).
//!
//! Every event carries the query accumulator, mutably, and the selector
//! being built. Simple selector events also carry the selector node, and
//! `combine-sequence` carries the two sequences and their combinator.

use std::mem;

use sift_selector::{Combinator, Selector, SelectorKind, Sequence, SimpleSelector};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Named hooks a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum EventKind {
    /// Before the first selector; handlers initialise the accumulator
    PrepareQuery,
    /// `*`
    ApplyUniversalSelector,
    /// `article`
    ApplyElementSelector,
    /// `#id`
    ApplyIdSelector,
    /// `$role`
    ApplyRoleSelector,
    /// `.class`
    ApplyClassSelector,
    /// `/a/b`
    ApplyPathSelector,
    /// `[name op value]`
    ApplyAttributeSelector,
    /// `:name(value)`
    ApplyPseudoSelector,
    /// After a sequence's selectors, when it has a child sequence
    CombineSequence,
    /// After the outermost sequence
    FinalizeQuery,
}

impl EventKind {
    /// The event fired for a simple selector of `kind`.
    #[must_use]
    pub const fn for_selector(kind: SelectorKind) -> Self {
        match kind {
            SelectorKind::Universal => Self::ApplyUniversalSelector,
            SelectorKind::Element => Self::ApplyElementSelector,
            SelectorKind::Id => Self::ApplyIdSelector,
            SelectorKind::Role => Self::ApplyRoleSelector,
            SelectorKind::Class => Self::ApplyClassSelector,
            SelectorKind::Path => Self::ApplyPathSelector,
            SelectorKind::Attribute => Self::ApplyAttributeSelector,
            SelectorKind::Pseudo => Self::ApplyPseudoSelector,
        }
    }

    /// Whether this event applies a simple selector.
    #[must_use]
    pub const fn is_selector_event(self) -> bool {
        !matches!(
            self,
            Self::PrepareQuery | Self::CombineSequence | Self::FinalizeQuery
        )
    }
}

/// The AST node an event is about.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Query,
    Simple(&'a SimpleSelector),
    Combine {
        sequence: &'a Sequence,
        child: &'a Sequence,
        combinator: Combinator,
    },
}

/// A fired event, handed to each handler in turn.
#[derive(Debug)]
pub struct Event<'a, Q> {
    kind: EventKind,
    query: &'a mut Q,
    selector: &'a Selector,
    target: Target<'a>,
}

impl<'a, Q> Event<'a, Q> {
    /// `prepare-query` or `finalize-query`.
    pub(crate) const fn structural(
        kind: EventKind,
        query: &'a mut Q,
        selector: &'a Selector,
    ) -> Self {
        Self {
            kind,
            query,
            selector,
            target: Target::Query,
        }
    }

    /// `apply-*-selector` for `simple`.
    pub(crate) const fn simple(
        query: &'a mut Q,
        selector: &'a Selector,
        simple: &'a SimpleSelector,
    ) -> Self {
        Self {
            kind: EventKind::for_selector(simple.kind()),
            query,
            selector,
            target: Target::Simple(simple),
        }
    }

    /// `combine-sequence` for `sequence` and its `child`.
    pub(crate) const fn combine(
        query: &'a mut Q,
        selector: &'a Selector,
        sequence: &'a Sequence,
        child: &'a Sequence,
        combinator: Combinator,
    ) -> Self {
        Self {
            kind: EventKind::CombineSequence,
            query,
            selector,
            target: Target::Combine {
                sequence,
                child,
                combinator,
            },
        }
    }

    /// The event kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The query accumulator.
    #[must_use]
    pub const fn accumulator(&self) -> &Q {
        self.query
    }

    /// The query accumulator, mutably.
    pub const fn accumulator_mut(&mut self) -> &mut Q {
        self.query
    }

    /// Replace the accumulator, returning the previous one.
    pub fn set_accumulator(&mut self, query: Q) -> Q {
        mem::replace(self.query, query)
    }

    /// The selector being built.
    #[must_use]
    pub const fn selector(&self) -> &'a Selector {
        self.selector
    }

    /// The simple selector of an `apply-*-selector` event.
    #[must_use]
    pub const fn simple_selector(&self) -> Option<&'a SimpleSelector> {
        match self.target {
            Target::Simple(simple) => Some(simple),
            _ => None,
        }
    }

    /// The parent sequence of a `combine-sequence` event.
    #[must_use]
    pub const fn sequence(&self) -> Option<&'a Sequence> {
        match self.target {
            Target::Combine { sequence, .. } => Some(sequence),
            _ => None,
        }
    }

    /// The child sequence of a `combine-sequence` event.
    #[must_use]
    pub const fn child_sequence(&self) -> Option<&'a Sequence> {
        match self.target {
            Target::Combine { child, .. } => Some(child),
            _ => None,
        }
    }

    /// The combinator of a `combine-sequence` event.
    #[must_use]
    pub const fn combinator(&self) -> Option<Combinator> {
        match self.target {
            Target::Combine { combinator, .. } => Some(combinator),
            _ => None,
        }
    }
}

/// What a handler did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response<E> {
    /// The handler applied the event; later handlers are skipped for
    /// simple selector events
    Handled,
    /// The handler ignored the event
    Unhandled,
    /// The handler accepted the event but could not apply it
    Failed(E),
}

impl<E> Response<E> {
    /// Whether this is [`Response::Handled`].
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled)
    }

    /// Whether this is [`Response::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl<E> From<Result<(), E>> for Response<E> {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Handled,
            Err(error) => Self::Failed(error),
        }
    }
}
