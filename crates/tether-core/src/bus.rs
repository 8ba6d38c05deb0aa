#![forbid(unsafe_code)]

//! Synchronous, in-process event fan-out.
//!
//! # Invariants
//!
//! 1. Listeners are invoked in registration order.
//! 2. Dispatch is synchronous: when `dispatch` returns, every live
//!    listener has already seen the event.
//! 3. Listeners are held weakly. There is no unregister call; a listener
//!    detaches by being dropped, and dead entries are pruned lazily
//!    during dispatch.
//! 4. The listener list is snapshotted before delivery, so a listener
//!    may register further listeners reentrantly; they only see
//!    subsequent events.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::event::{BusListener, ChangeEvent};

/// Ordered fan-out of [`ChangeEvent`]s to weakly-held listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<Weak<dyn BusListener>>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. The bus keeps only a weak reference; the
    /// caller keeps the listener alive for as long as it should receive
    /// events.
    pub fn register<L: BusListener + 'static>(&self, listener: &Rc<L>) {
        let weak: Weak<dyn BusListener> = Rc::<L>::downgrade(listener);
        self.listeners.borrow_mut().push(weak);
    }

    /// Deliver `event` to every live listener in registration order.
    pub fn dispatch(&self, event: &ChangeEvent) {
        let live: Vec<Rc<dyn BusListener>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in &live {
            event.deliver(listener.as_ref());
        }
    }

    /// Number of registered listeners, dead entries included until the
    /// next dispatch prunes them.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;
    use crate::value::Value;
    use std::cell::RefCell;

    struct Tagged {
        tag: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl BusListener for Tagged {
        fn redispatch(&self, _event: &crate::event::PropertyChanged) {
            self.log.borrow_mut().push(self.tag);
        }
    }

    fn property_event() -> ChangeEvent {
        ChangeEvent::property_changed(Object::new(), "p", Value::Null, Value::from(1.0))
    }

    #[test]
    fn dispatch_in_registration_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::new(Tagged {
            tag: "first",
            log: Rc::clone(&log),
        });
        let second = Rc::new(Tagged {
            tag: "second",
            log: Rc::clone(&log),
        });
        bus.register(&first);
        bus.register(&second);

        bus.dispatch(&property_event());
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn dropped_listener_is_pruned() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let keeper = Rc::new(Tagged {
            tag: "keeper",
            log: Rc::clone(&log),
        });
        let transient = Rc::new(Tagged {
            tag: "transient",
            log: Rc::clone(&log),
        });
        bus.register(&keeper);
        bus.register(&transient);
        assert_eq!(bus.listener_count(), 2);

        drop(transient);
        bus.dispatch(&property_event());
        assert_eq!(*log.borrow(), vec!["keeper"]);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn reentrant_register_sees_later_events_only() {
        struct Registrar {
            bus: Rc<EventBus>,
            log: Rc<RefCell<Vec<&'static str>>>,
            registered: RefCell<Option<Rc<Tagged>>>,
        }

        impl BusListener for Registrar {
            fn redispatch(&self, _event: &crate::event::PropertyChanged) {
                self.log.borrow_mut().push("registrar");
                let mut slot = self.registered.borrow_mut();
                if slot.is_none() {
                    let late = Rc::new(Tagged {
                        tag: "late",
                        log: Rc::clone(&self.log),
                    });
                    self.bus.register(&late);
                    *slot = Some(late);
                }
            }
        }

        let bus = Rc::new(EventBus::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let registrar = Rc::new(Registrar {
            bus: Rc::clone(&bus),
            log: Rc::clone(&log),
            registered: RefCell::new(None),
        });
        bus.register(&registrar);

        bus.dispatch(&property_event());
        assert_eq!(*log.borrow(), vec!["registrar"]);

        bus.dispatch(&property_event());
        assert_eq!(*log.borrow(), vec!["registrar", "registrar", "late"]);
    }
}
