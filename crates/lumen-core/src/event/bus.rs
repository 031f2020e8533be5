// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::{EngineEvent, EventKind};
use std::collections::HashMap;

/// A handler invoked for every dispatched event of its subscribed kind.
///
/// Handlers are `Send + Sync` because the `Render` dispatch happens on a
/// worker-pool thread while the bus is shared behind a lock owned by the
/// composition root.
pub type EventHandler = Box<dyn Fn(&EngineEvent) + Send + Sync>;

/// Manages typed publish/subscribe over [`EngineEvent`]s.
///
/// Dispatch is synchronous: all handlers registered for the event's
/// [`EventKind`] run on the calling thread, in registration order, before
/// `dispatch` returns. There is no queuing and no async semantics.
///
/// The bus is not internally synchronized. The intended discipline is a
/// single writer (subscribe/unsubscribe from the composition root) with the
/// root wrapping the bus in an `RwLock` when dispatch must happen from more
/// than one thread. Handlers must not subscribe or unsubscribe for the kind
/// currently being dispatched.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<EventHandler>>,
}

impl EventBus {
    /// Creates a new bus with no subscriptions.
    pub fn new() -> Self {
        log::debug!("EventBus initialized.");
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler for every future dispatch of `kind`.
    ///
    /// Handlers for the same kind are invoked in the order they were
    /// subscribed. There is no per-handler unsubscription; removal is by
    /// kind via [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        self.handlers
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
        log::trace!("Subscribed handler for {kind:?}.");
    }

    /// Removes all handlers registered for `kind`.
    pub fn unsubscribe(&mut self, kind: EventKind) {
        if self.handlers.remove(&kind).is_some() {
            log::trace!("Unsubscribed all handlers for {kind:?}.");
        }
    }

    /// Synchronously delivers `event` to every handler of its kind.
    ///
    /// Dispatching a kind with zero subscribers is a successful no-op. A
    /// panicking handler unwinds through this call; the bus does not catch
    /// or isolate handler failures.
    pub fn dispatch(&self, event: &EngineEvent) {
        match self.handlers.get(&event.kind()) {
            Some(list) => {
                log::trace!("Dispatching {:?} to {} handler(s).", event.kind(), list.len());
                for handler in list {
                    handler(event);
                }
            }
            None => {
                log::trace!("Dispatching {:?}: no subscribers.", event.kind());
            }
        }
    }

    /// Returns the number of handlers currently registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total: usize = self.handlers.values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("kinds", &self.handlers.len())
            .field("handlers", &total)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, RwLock};
    use std::thread;

    #[test]
    fn dispatch_invokes_subscribers_in_registration_order() {
        let mut bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(EventKind::Update, move |_| {
                order.lock().unwrap().push(tag);
            });
        }

        bus.dispatch(&EngineEvent::Update { dt_seconds: 0.01 });

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn dispatch_invokes_each_subscriber_exactly_once() {
        let mut bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let calls = Arc::clone(&calls);
            bus.subscribe(EventKind::Init, move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.dispatch(&EngineEvent::Init);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn dispatch_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        // Must neither panic nor error.
        bus.dispatch(&EngineEvent::Shutdown);
    }

    #[test]
    fn handlers_only_see_their_subscribed_kind() {
        let mut bus = EventBus::new();
        let update_calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&update_calls);
        bus.subscribe(EventKind::Update, move |event| {
            assert!(matches!(event, EngineEvent::Update { .. }));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.dispatch(&EngineEvent::Init);
        bus.dispatch(&EngineEvent::Update { dt_seconds: 0.02 });
        bus.dispatch(&EngineEvent::Shutdown);

        assert_eq!(update_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_removes_all_handlers_for_kind() {
        let mut bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            bus.subscribe(EventKind::Render, move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(bus.handler_count(EventKind::Render), 2);

        bus.unsubscribe(EventKind::Render);
        assert_eq!(bus.handler_count(EventKind::Render), 0);

        bus.dispatch(&EngineEvent::Render { frame: 0 });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn event_payload_reaches_handler() {
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(None));

        let seen_clone = Arc::clone(&seen);
        bus.subscribe(EventKind::TransitionRequested, move |event| {
            if let EngineEvent::TransitionRequested { view } = event {
                *seen_clone.lock().unwrap() = Some(view.clone());
            }
        });

        bus.dispatch(&EngineEvent::TransitionRequested {
            view: "settings".to_string(),
        });

        assert_eq!(seen.lock().unwrap().as_deref(), Some("settings"));
    }

    #[test]
    fn shared_bus_dispatches_from_another_thread() {
        let bus = Arc::new(RwLock::new(EventBus::new()));
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = Arc::clone(&calls);
            bus.write()
                .unwrap()
                .subscribe(EventKind::Render, move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                });
        }

        let bus_clone = Arc::clone(&bus);
        let handle = thread::spawn(move || {
            bus_clone
                .read()
                .unwrap()
                .dispatch(&EngineEvent::Render { frame: 1 });
        });
        handle.join().expect("dispatch thread panicked");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
