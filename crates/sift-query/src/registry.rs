//! Handler registry.
//!
//! Handlers are kept in one list sorted by priority, highest first.
//! Handlers with equal priority run in registration order. A handler is
//! registered either for one [`EventKind`] or for every event.

use std::cmp::Reverse;
use std::fmt;

use crate::event::{Event, EventKind, Response};

/// A boxed event handler.
pub type Handler<Q, E> = Box<dyn FnMut(&mut Event<'_, Q>) -> Response<E>>;

/// Token returned by [`EventRegistry::attach`], used to detach the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Registration<Q, E> {
    id: ListenerId,
    /// `None` matches every event
    kind: Option<EventKind>,
    priority: i32,
    handler: Handler<Q, E>,
}

impl<Q, E> Registration<Q, E> {
    fn accepts(&self, kind: EventKind) -> bool {
        self.kind.is_none_or(|registered| registered == kind)
    }
}

/// Event to handler mapping for one accumulator type `Q` and handler error
/// type `E`.
pub struct EventRegistry<Q, E> {
    registrations: Vec<Registration<Q, E>>,
    next_id: u64,
}

impl<Q, E> Default for EventRegistry<Q, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q, E> fmt::Debug for EventRegistry<Q, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("listeners", &self.registrations.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<Q, E> EventRegistry<Q, E> {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registrations: Vec::new(),
            next_id: 0,
        }
    }

    /// Register `handler` for `kind`. Higher priorities run first.
    pub fn attach<F>(&mut self, kind: EventKind, priority: i32, handler: F) -> ListenerId
    where
        F: FnMut(&mut Event<'_, Q>) -> Response<E> + 'static,
    {
        self.register(Some(kind), priority, Box::new(handler))
    }

    /// Register `handler` for every event.
    pub fn attach_all<F>(&mut self, priority: i32, handler: F) -> ListenerId
    where
        F: FnMut(&mut Event<'_, Q>) -> Response<E> + 'static,
    {
        self.register(None, priority, Box::new(handler))
    }

    fn register(
        &mut self,
        kind: Option<EventKind>,
        priority: i32,
        handler: Handler<Q, E>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            kind,
            priority,
            handler,
        });
        // Stable, so equal priorities keep registration order.
        self.registrations
            .sort_by_key(|registration| Reverse(registration.priority));
        id
    }

    /// Remove the handler registered under `id`. Returns whether it was
    /// registered.
    pub fn detach(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|registration| registration.id != id);
        self.registrations.len() != before
    }

    /// Number of handlers that receive `kind`, wildcards included.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registrations
            .iter()
            .filter(|registration| registration.accepts(kind))
            .count()
    }

    /// Total number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Run every handler for the event. The first failure stops dispatch.
    ///
    /// # Errors
    ///
    /// Returns the error of the first handler that fails.
    pub fn fire(&mut self, event: &mut Event<'_, Q>) -> Result<(), E> {
        let kind = event.kind();
        for registration in &mut self.registrations {
            if !registration.accepts(kind) {
                continue;
            }
            if let Response::Failed(error) = (registration.handler)(event) {
                return Err(error);
            }
        }
        Ok(())
    }

    /// Run handlers until one handles the event.
    ///
    /// Returns [`Response::Handled`] as soon as a handler does. Otherwise
    /// returns the first failure, or [`Response::Unhandled`] if no handler
    /// failed.
    pub fn fire_until_handled(&mut self, event: &mut Event<'_, Q>) -> Response<E> {
        let kind = event.kind();
        let mut failure = None;
        for registration in &mut self.registrations {
            if !registration.accepts(kind) {
                continue;
            }
            match (registration.handler)(event) {
                Response::Handled => return Response::Handled,
                Response::Unhandled => {}
                Response::Failed(error) => {
                    let _ = failure.get_or_insert(error);
                }
            }
        }
        failure.map_or(Response::Unhandled, Response::Failed)
    }
}

/// A listener that registers several handlers at once.
pub trait ListenerAggregate<Q, E> {
    /// Register this listener's handlers.
    fn attach(&mut self, registry: &mut EventRegistry<Q, E>);

    /// Remove every handler registered by [`ListenerAggregate::attach`].
    fn detach(&mut self, registry: &mut EventRegistry<Q, E>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_selector::{Selector, SimpleSelector};

    type Log = Vec<&'static str>;

    fn fire_id(registry: &mut EventRegistry<Log, &'static str>) -> (Response<&'static str>, Log) {
        let selector = Selector::new();
        let simple = SimpleSelector::Id("x".into());
        let mut log = Log::new();
        let response =
            registry.fire_until_handled(&mut Event::simple(&mut log, &selector, &simple));
        (response, log)
    }

    #[test]
    fn test_priority_order_with_stable_ties() {
        let mut registry = EventRegistry::new();
        let _ = registry.attach(EventKind::ApplyIdSelector, 0, |event: &mut Event<'_, Log>| {
            event.accumulator_mut().push("first zero");
            Response::Unhandled
        });
        let _ = registry.attach(EventKind::ApplyIdSelector, 10, |event: &mut Event<'_, Log>| {
            event.accumulator_mut().push("ten");
            Response::Unhandled
        });
        let _ = registry.attach(EventKind::ApplyIdSelector, 0, |event: &mut Event<'_, Log>| {
            event.accumulator_mut().push("second zero");
            Response::Unhandled
        });

        let (response, log) = fire_id(&mut registry);
        assert_eq!(response, Response::Unhandled);
        assert_eq!(log, ["ten", "first zero", "second zero"]);
    }

    #[test]
    fn test_first_handled_stops_dispatch() {
        let mut registry = EventRegistry::new();
        let _ = registry.attach(EventKind::ApplyIdSelector, 2, |_: &mut Event<'_, Log>| {
            Response::Failed("broken")
        });
        let _ = registry.attach(EventKind::ApplyIdSelector, 1, |event: &mut Event<'_, Log>| {
            event.accumulator_mut().push("handled");
            Response::Handled
        });
        let _ = registry.attach(EventKind::ApplyIdSelector, 0, |event: &mut Event<'_, Log>| {
            event.accumulator_mut().push("skipped");
            Response::Handled
        });

        let (response, log) = fire_id(&mut registry);
        assert_eq!(response, Response::Handled);
        assert_eq!(log, ["handled"]);
    }

    #[test]
    fn test_first_failure_wins_when_unhandled() {
        let mut registry = EventRegistry::new();
        let _ = registry.attach_all(1, |_: &mut Event<'_, Log>| Response::Failed("first"));
        let _ = registry.attach(EventKind::ApplyIdSelector, 0, |_: &mut Event<'_, Log>| {
            Response::Failed("second")
        });

        let (response, _) = fire_id(&mut registry);
        assert_eq!(response, Response::Failed("first"));
    }

    #[test]
    fn test_detach() {
        let mut registry = EventRegistry::<Log, ()>::new();
        let wildcard = registry.attach_all(0, |_| Response::Unhandled);
        let id = registry.attach(EventKind::ApplyIdSelector, 0, |_| Response::Handled);

        assert_eq!(registry.listener_count(EventKind::ApplyIdSelector), 2);
        assert_eq!(registry.listener_count(EventKind::PrepareQuery), 1);

        assert!(registry.detach(id));
        assert!(!registry.detach(id));
        assert_eq!(registry.listener_count(EventKind::ApplyIdSelector), 1);

        assert!(registry.detach(wildcard));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_fire_stops_at_failure() {
        let mut registry = EventRegistry::new();
        let _ = registry.attach(EventKind::PrepareQuery, 1, |_: &mut Event<'_, Log>| {
            Response::Failed("stop")
        });
        let _ = registry.attach(EventKind::PrepareQuery, 0, |event: &mut Event<'_, Log>| {
            event.accumulator_mut().push("unreachable");
            Response::Handled
        });

        let selector = Selector::new();
        let mut log = Log::new();
        let result = registry.fire(&mut Event::structural(
            EventKind::PrepareQuery,
            &mut log,
            &selector,
        ));
        assert_eq!(result, Err("stop"));
        assert!(log.is_empty());
    }
}
