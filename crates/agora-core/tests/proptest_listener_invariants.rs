//! Property-based invariant tests for listener registration.
//!
//! 1. The bus holds exactly as many handlers as there are live guards
//! 2. Dispatch runs each live handler of the matching kind exactly once
//! 3. Dropping every guard leaves the bus empty

use std::cell::Cell;
use std::rc::Rc;

use agora_core::{Event, EventBus, EventKind, Listener, ScrollEventSource};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Attach(EventKind),
    Detach(usize),
    Dispatch(EventKind),
}

fn kind_strategy() -> impl Strategy<Value = EventKind> {
    prop_oneof![Just(EventKind::Scroll), Just(EventKind::Resize)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        kind_strategy().prop_map(Op::Attach),
        (0usize..32).prop_map(Op::Detach),
        kind_strategy().prop_map(Op::Dispatch),
    ]
}

fn event_for(kind: EventKind) -> Event {
    match kind {
        EventKind::Scroll => Event::Scroll { top: 120.0 },
        EventKind::Resize => Event::Resize {
            width: 1024.0,
            height: 768.0,
        },
    }
}

proptest! {
    #[test]
    fn live_guards_match_registry(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let bus = EventBus::new();
        let mut guards: Vec<(Listener, Rc<Cell<u32>>)> = Vec::new();

        for op in &ops {
            match op {
                Op::Attach(kind) => {
                    let hits = Rc::new(Cell::new(0));
                    let seen = Rc::clone(&hits);
                    let guard = bus
                        .listen(*kind, Box::new(move |_| seen.set(seen.get() + 1)))
                        .unwrap();
                    guards.push((guard, hits));
                }
                Op::Detach(idx) => {
                    if !guards.is_empty() {
                        let idx = idx % guards.len();
                        guards.remove(idx);
                    }
                }
                Op::Dispatch(kind) => {
                    let before: Vec<u32> = guards.iter().map(|(_, hits)| hits.get()).collect();
                    let ran = bus.dispatch(&event_for(*kind));
                    let expected = guards.iter().filter(|(g, _)| g.kind() == *kind).count();
                    prop_assert_eq!(ran, expected);
                    for ((guard, hits), old) in guards.iter().zip(before) {
                        let bump = u32::from(guard.kind() == *kind);
                        prop_assert_eq!(hits.get(), old + bump);
                    }
                }
            }
            prop_assert_eq!(bus.listener_count(), guards.len());
        }

        guards.clear();
        prop_assert_eq!(bus.listener_count(), 0);
    }
}
