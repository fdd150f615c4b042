//! Folds a parsed selector into a query.
//!
//! The builder knows nothing about any backend. It walks the selector and
//! fires one event per node; registered handlers do the translation.
//!
//! # Order
//!
//! Sequences are visited innermost first. For `A>B>C` the events are:
//!
//! ```text
//! prepare-query
//! apply-*(C...)
//! apply-*(B...)  combine-sequence(B, C)
//! apply-*(A...)  combine-sequence(A, B)
//! finalize-query
//! ```

use serde_json::Value as Json;
use sift_selector::{Selector, SequenceId};
use tracing::{debug, trace};

use crate::error::BuildError;
use crate::event::{Event, EventKind, Response};
use crate::registry::EventRegistry;

/// A value handlers fold a selector into.
pub trait Accumulator {
    /// Whether the value can hold query terms. Checked after
    /// `prepare-query`.
    fn is_container(&self) -> bool;
}

impl Accumulator for Json {
    fn is_container(&self) -> bool {
        self.is_object() || self.is_array()
    }
}

impl<T> Accumulator for Vec<T> {
    fn is_container(&self) -> bool {
        true
    }
}

/// Builds queries of type `Q` with handlers failing with `E`.
#[derive(Debug)]
pub struct QueryBuilder<Q, E> {
    registry: EventRegistry<Q, E>,
}

impl<Q, E> Default for QueryBuilder<Q, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q, E> QueryBuilder<Q, E> {
    /// Create a builder with an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registry: EventRegistry::new(),
        }
    }

    /// Create a builder around an existing registry.
    #[must_use]
    pub const fn with_registry(registry: EventRegistry<Q, E>) -> Self {
        Self { registry }
    }

    /// The handler registry.
    #[must_use]
    pub const fn registry(&self) -> &EventRegistry<Q, E> {
        &self.registry
    }

    /// The handler registry, mutably.
    pub const fn registry_mut(&mut self) -> &mut EventRegistry<Q, E> {
        &mut self.registry
    }
}

impl<Q: Accumulator, E> QueryBuilder<Q, E> {
    /// Build a query starting from `Q::default()`.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::build_with`].
    pub fn build(&mut self, selector: &Selector) -> Result<Q, BuildError<E>>
    where
        Q: Default,
    {
        self.build_with(selector, Q::default())
    }

    /// Build a query starting from `initial`.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidAccumulator`] if the accumulator is not a
    ///   container once `prepare-query` has run
    /// - [`BuildError::SelectorNotSupported`] if no handler handled a simple
    ///   selector and none failed
    /// - [`BuildError::Handler`] with the first failure otherwise
    pub fn build_with(&mut self, selector: &Selector, initial: Q) -> Result<Q, BuildError<E>> {
        let mut query = initial;
        debug!(%selector, sequences = selector.len(), "building query");

        self.fire(&mut Event::structural(
            EventKind::PrepareQuery,
            &mut query,
            selector,
        ))?;
        if !query.is_container() {
            return Err(BuildError::InvalidAccumulator);
        }

        let mut cursor = selector.last();
        while let Some(id) = cursor {
            self.build_sequence(selector, id, &mut query)?;
            cursor = selector.parent(id);
        }

        self.fire(&mut Event::structural(
            EventKind::FinalizeQuery,
            &mut query,
            selector,
        ))?;
        Ok(query)
    }

    /// Apply the selectors of one sequence, then combine it with its child.
    /// The child has already been built.
    fn build_sequence(
        &mut self,
        selector: &Selector,
        id: SequenceId,
        query: &mut Q,
    ) -> Result<(), BuildError<E>> {
        let Some(sequence) = selector.get(id) else {
            return Ok(());
        };

        for simple in sequence {
            let mut event = Event::simple(query, selector, simple);
            trace!(event = %event.kind(), %simple, "dispatching");
            match self.registry.fire_until_handled(&mut event) {
                Response::Handled => {}
                Response::Failed(error) => return Err(BuildError::Handler(error)),
                Response::Unhandled => {
                    debug!(%simple, "no handler accepted selector");
                    return Err(BuildError::SelectorNotSupported {
                        kind: simple.kind(),
                    });
                }
            }
        }

        let child = selector
            .child(id)
            .zip(selector.child_combinator(id))
            .and_then(|(child, combinator)| Some((selector.get(child)?, combinator)));
        if let Some((child, combinator)) = child {
            self.fire(&mut Event::combine(
                query, selector, sequence, child, combinator,
            ))?;
        }
        Ok(())
    }

    fn fire(&mut self, event: &mut Event<'_, Q>) -> Result<(), BuildError<E>> {
        trace!(event = %event.kind(), "dispatching");
        self.registry.fire(event).map_err(BuildError::Handler)
    }
}
