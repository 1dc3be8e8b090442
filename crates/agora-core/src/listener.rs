#![forbid(unsafe_code)]

//! Listener registration with guaranteed release.
//!
//! Every registration hands back a [`Listener`] guard. Dropping the guard (or
//! calling [`Listener::detach`]) removes exactly the handler it registered, so
//! a component that keeps its guards for the duration of a mount cannot leak
//! handlers past its lifetime.
//!
//! [`EventBus`] is the in-memory, host-driven event source: the embedding
//! environment pushes [`Event`] values through [`EventBus::dispatch`]. The
//! `wasm32` bindings provide the DOM-backed equivalent.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::error::ListenError;
use crate::event::{Event, EventKind};
use crate::provider::ScrollEventSource;

/// Boxed event handler.
pub type Handler = Box<dyn FnMut(&Event)>;

/// Guard for one registered handler.
///
/// The handler stays attached until the guard is dropped or detached.
pub struct Listener {
    kind: EventKind,
    detach: Option<Box<dyn FnOnce()>>,
}

impl Listener {
    /// Wrap a detach action. The action runs exactly once.
    pub fn new(kind: EventKind, detach: impl FnOnce() + 'static) -> Self {
        Self {
            kind,
            detach: Some(Box::new(detach)),
        }
    }

    /// Event kind this listener is attached to.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Detach now instead of at drop.
    pub fn detach(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            trace!(kind = %self.kind, "listener detached");
            detach();
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("kind", &self.kind)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

struct Entry {
    id: u64,
    kind: EventKind,
    handler: Rc<RefCell<Handler>>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }
}

/// Host-driven event source.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Registry>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every handler registered for its kind, in
    /// registration order. Returns how many handlers ran.
    ///
    /// A handler removed by an earlier handler in the same dispatch is
    /// skipped. A handler that re-enters dispatch for the same event kind
    /// does not run recursively.
    pub fn dispatch(&self, event: &Event) -> usize {
        let kind = event.kind();
        let targets: Vec<(u64, Rc<RefCell<Handler>>)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| (entry.id, Rc::clone(&entry.handler)))
            .collect();

        let mut ran = 0;
        for (id, handler) in targets {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            let Ok(mut handler) = handler.try_borrow_mut() else {
                continue;
            };
            (*handler)(event);
            ran += 1;
        }
        ran
    }

    /// Total number of attached handlers.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Number of attached handlers for one event kind.
    #[must_use]
    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }
}

impl ScrollEventSource for EventBus {
    fn listen(&self, kind: EventKind, handler: Handler) -> Result<Listener, ListenError> {
        let id = {
            let mut registry = self.inner.borrow_mut();
            registry.next_id += 1;
            let id = registry.next_id;
            registry.entries.push(Entry {
                id,
                kind,
                handler: Rc::new(RefCell::new(handler)),
            });
            id
        };
        trace!(%kind, id, "listener attached");

        let registry: Weak<RefCell<Registry>> = Rc::downgrade(&self.inner);
        Ok(Listener::new(kind, move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().entries.retain(|entry| entry.id != id);
            }
        }))
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Handler) {
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        (hits, Box::new(move |_| seen.set(seen.get() + 1)))
    }

    #[test]
    fn dispatch_reaches_matching_kind_only() {
        let bus = EventBus::new();
        let (scrolls, on_scroll) = counter();
        let (resizes, on_resize) = counter();
        let _a = bus.listen(EventKind::Scroll, on_scroll).unwrap();
        let _b = bus.listen(EventKind::Resize, on_resize).unwrap();

        assert_eq!(bus.dispatch(&Event::Scroll { top: 10.0 }), 1);
        assert_eq!(bus.dispatch(&Event::Scroll { top: 20.0 }), 1);
        assert_eq!(scrolls.get(), 2);
        assert_eq!(resizes.get(), 0);
    }

    #[test]
    fn dropping_guard_removes_exactly_its_handler() {
        let bus = EventBus::new();
        let (_, first) = counter();
        let (second_hits, second) = counter();
        let a = bus.listen(EventKind::Scroll, first).unwrap();
        let _b = bus.listen(EventKind::Scroll, second).unwrap();
        assert_eq!(bus.listener_count(), 2);

        drop(a);
        assert_eq!(bus.listener_count(), 1);
        assert_eq!(bus.dispatch(&Event::Scroll { top: 0.0 }), 1);
        assert_eq!(second_hits.get(), 1);
    }

    #[test]
    fn explicit_detach_matches_drop() {
        let bus = EventBus::new();
        let (_, handler) = counter();
        let listener = bus.listen(EventKind::Resize, handler).unwrap();
        assert_eq!(listener.kind(), EventKind::Resize);
        assert_eq!(bus.listener_count_for(EventKind::Resize), 1);
        listener.detach();
        assert_eq!(bus.listener_count_for(EventKind::Resize), 0);
    }

    #[test]
    fn guard_outliving_bus_is_harmless() {
        let bus = EventBus::new();
        let (_, handler) = counter();
        let listener = bus.listen(EventKind::Scroll, handler).unwrap();
        drop(bus);
        drop(listener);
    }

    #[test]
    fn handler_removed_mid_dispatch_is_skipped() {
        let bus = EventBus::new();
        let victim_slot: Rc<RefCell<Option<Listener>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&victim_slot);
        let _killer = bus
            .listen(
                EventKind::Scroll,
                Box::new(move |_| {
                    slot.borrow_mut().take();
                }),
            )
            .unwrap();
        let (victim_hits, victim) = counter();
        *victim_slot.borrow_mut() = Some(bus.listen(EventKind::Scroll, victim).unwrap());

        assert_eq!(bus.dispatch(&Event::Scroll { top: 5.0 }), 1);
        assert_eq!(victim_hits.get(), 0);
        assert_eq!(bus.listener_count(), 1);
    }
}
