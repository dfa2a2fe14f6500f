// src/events/bus.rs

//! Synchronous in-process event bus.
//!
//! Unlike a broadcast channel, [`EventBus::emit`] calls each observer inline:
//! the operation that raised an event does not continue until every observer
//! registered for that kind has returned. Observers of one kind are invoked in
//! registration order.

use std::collections::HashMap;
use std::fmt;

use super::event::{EventKind, ServerEvent};

/// Receiver of [`ServerEvent`]s.
///
/// Implemented for any `Fn(&ServerEvent) + Send + Sync`, so plain closures can
/// be registered directly.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &ServerEvent);
}

impl<F> Observer for F
where
    F: Fn(&ServerEvent) + Send + Sync,
{
    fn on_event(&self, event: &ServerEvent) {
        self(event)
    }
}

#[derive(Default)]
pub struct EventBus {
    observers: HashMap<EventKind, Vec<Box<dyn Observer>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<EventKind, usize> = self
            .observers
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("observers", &counts)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` for events of `kind`.
    pub fn on<O>(&mut self, kind: EventKind, observer: O) -> &mut Self
    where
        O: Observer + 'static,
    {
        self.observers
            .entry(kind)
            .or_default()
            .push(Box::new(observer));
        self
    }

    /// Register one shared observer for every event kind.
    pub fn on_all<O>(&mut self, observer: O) -> &mut Self
    where
        O: Observer + Clone + 'static,
    {
        for kind in EventKind::ALL {
            self.on(kind, observer.clone());
        }
        self
    }

    /// Number of observers registered for `kind`.
    pub fn observer_count(&self, kind: EventKind) -> usize {
        self.observers.get(&kind).map_or(0, Vec::len)
    }

    /// Dispatch `event` to every observer of its kind, in registration order.
    pub fn emit(&self, event: ServerEvent) {
        if let Some(list) = self.observers.get(&event.kind()) {
            for observer in list {
                observer.on_event(&event);
            }
        }
    }
}
