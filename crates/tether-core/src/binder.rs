#![forbid(unsafe_code)]

//! The engine instance: bus + trigger record + listener registry.
//!
//! A [`Binder`] is created per application (or per test) and passed by
//! reference to every bind call; there is no hidden module singleton,
//! so tests tear down cleanly by dropping the binder or calling
//! [`Binder::reset`].
//!
//! # Invariants
//!
//! 1. `register` is idempotent per (object, property) pair.
//! 2. Once registered, `Object::set` on the pair dispatches exactly one
//!    `PropertyChanged` per write, after the value is stored. The event
//!    carries the old value; model reads during dispatch see the new
//!    one.
//! 3. Bus listeners fire in registration order; registry callbacks for a
//!    pair fire in reverse registration order. Both orders are part of
//!    the contract.
//! 4. `reset` detaches everything: subsequent writes are silent until
//!    pairs are registered again.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Registering an array owned elsewhere | Shared array, two owners | `AlreadyBound` |
//! | `unlisten` with no match | Double unbind, wrong callback | `UnknownListener` |
//! | Callback error during dispatch | Transform/display failure | Logged, fan-out continues |

use std::rc::Rc;

use crate::array::ObsArray;
use crate::bus::EventBus;
use crate::error::BindError;
use crate::event::{BusListener, ChangeEvent};
use crate::object::Object;
use crate::registry::{Callback, ListenerRegistry};
use crate::triggers::TriggerRecord;
use crate::value::{ObjectId, Value};

pub(crate) struct BinderCore {
    bus: EventBus,
    registry: Rc<ListenerRegistry>,
    triggers: TriggerRecord,
}

impl BinderCore {
    pub(crate) fn is_intercepted(&self, object: ObjectId, property: &str) -> bool {
        self.triggers.is_registered(object, property)
    }

    pub(crate) fn dispatch(&self, event: &ChangeEvent) {
        self.bus.dispatch(event);
    }
}

/// One binding engine instance.
///
/// Cloning a `Binder` clones the handle; all clones share the same bus,
/// registry, and trigger record.
#[derive(Clone)]
pub struct Binder {
    core: Rc<BinderCore>,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    /// Create an engine with its registry already subscribed to the bus.
    #[must_use]
    pub fn new() -> Self {
        let core = Rc::new(BinderCore {
            bus: EventBus::new(),
            registry: Rc::new(ListenerRegistry::new()),
            triggers: TriggerRecord::default(),
        });
        core.bus.register(&core.registry);
        Self { core }
    }

    /// Install property interception on the pair. Idempotent: a pair
    /// already in the trigger record is left untouched. When the current
    /// value is a list, array interception owned by this pair is
    /// installed as well.
    pub fn register(&self, object: &Object, property: &str) {
        if !self.core.triggers.record(object.id(), property) {
            return;
        }
        object.attach(&self.core);
        if let Value::List(list) = object.get(property)
            && let Err(err) = list.install_hook(&self.core, Some((object, property)))
        {
            tracing::warn!(
                "{}.{property} holds a list that keeps its previous owner: {err}",
                object.id()
            );
        }
    }

    /// Install array interception without an owning pair: structural
    /// mutations dispatch add/remove events only.
    pub fn register_array(&self, array: &ObsArray) -> Result<(), BindError> {
        array.install_hook(&self.core, None)
    }

    /// Install array interception owned by `(object, property)`: each
    /// structural mutation additionally dispatches a `PropertyChanged`
    /// for that pair.
    pub fn register_array_owned(
        &self,
        array: &ObsArray,
        object: &Object,
        property: &str,
    ) -> Result<(), BindError> {
        array.install_hook(&self.core, Some((object, property)))
    }

    /// Append `callback` to the pair's listener list.
    pub fn listen(&self, object: &Object, property: &str, callback: Callback) {
        self.core.registry.listen(object, property, callback);
    }

    /// Remove the first callback matching `callback`'s identity.
    pub fn unlisten(
        &self,
        object: &Object,
        property: &str,
        callback: &Callback,
    ) -> Result<(), BindError> {
        self.core.registry.unlisten(object, property, callback)
    }

    /// Dispatch an event to every bus listener, synchronously.
    pub fn dispatch(&self, event: &ChangeEvent) {
        self.core.dispatch(event);
    }

    /// Register a bus-level listener (held weakly; see
    /// [`EventBus::register`]).
    pub fn add_listener<L: BusListener + 'static>(&self, listener: &Rc<L>) {
        self.core.bus.register(listener);
    }

    /// Whether the pair has been registered on this binder.
    #[must_use]
    pub fn is_registered(&self, object: &Object, property: &str) -> bool {
        self.core.triggers.is_registered(object.id(), property)
    }

    /// Number of callbacks currently listening on the pair.
    #[must_use]
    pub fn callback_count(&self, object: &Object, property: &str) -> usize {
        self.core.registry.callback_count(object, property)
    }

    /// Explicit teardown: forget every trigger, listener, and bus
    /// registration. Writes through previously registered pairs become
    /// silent plain stores. The registry itself is re-subscribed, so the
    /// binder is immediately reusable.
    pub fn reset(&self) {
        self.core.triggers.clear();
        self.core.registry.clear();
        self.core.bus.clear();
        self.core.bus.register(&self.core.registry);
    }
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("registered_pairs", &self.core.triggers.len())
            .finish()
    }
}
