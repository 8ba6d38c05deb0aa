#![forbid(unsafe_code)]

//! The (object, property) → callbacks registry.
//!
//! One specialized bus listener owns the mapping from an intercepted
//! pair to its ordered callback list. Lookup is two identity maps deep
//! (`ObjectId` → property → callbacks), O(1) amortized.
//!
//! # Invariants
//!
//! 1. `listen` appends; callbacks for a pair are stored in registration
//!    order.
//! 2. `redispatch` invokes them in **reverse** registration order: the
//!    last-bound element updates first. This asymmetry against the bus's
//!    forward order is observable (dependent computed fields) and is
//!    preserved exactly.
//! 3. The callback list is snapshotted before invocation, so a callback
//!    may listen or unlisten reentrantly without corrupting the
//!    iteration. Reentrant additions only see subsequent events.
//! 4. A callback error is logged and never stops delivery to the
//!    remaining callbacks.
//! 5. `unlisten` removes the first identity-matching callback and
//!    reports `UnknownListener` when none matches.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::BindError;
use crate::event::{BusListener, PropertyChanged};
use crate::object::Object;
use crate::value::{ObjectId, Value, next_id};

/// An identity-tracked listener callback.
///
/// Clones share the identity, the way two handles to one function object
/// do: registering a clone and unlistening with the original removes
/// that registration.
#[derive(Clone)]
pub struct Callback {
    id: u64,
    run: Rc<dyn Fn(&Value) -> Result<(), BindError>>,
}

impl Callback {
    /// Wrap a fallible callback. Errors returned from it are isolated
    /// and logged during dispatch.
    pub fn new(run: impl Fn(&Value) -> Result<(), BindError> + 'static) -> Self {
        Self {
            id: next_id(),
            run: Rc::new(run),
        }
    }

    /// Wrap a callback that cannot fail.
    pub fn infallible(run: impl Fn(&Value) + 'static) -> Self {
        Self::new(move |value| {
            run(value);
            Ok(())
        })
    }

    /// Invoke the callback with the new value of the changed pair.
    pub fn invoke(&self, value: &Value) -> Result<(), BindError> {
        (self.run)(value)
    }

    fn same_identity(&self, other: &Callback) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback").field("id", &self.id).finish()
    }
}

/// Maps each intercepted (object, property) pair to its callbacks.
#[derive(Default)]
pub struct ListenerRegistry {
    slots: RefCell<AHashMap<ObjectId, AHashMap<String, Vec<Callback>>>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callback` to the pair's list, creating the slot first if
    /// this is the pair's first listener.
    pub fn listen(&self, object: &Object, property: &str, callback: Callback) {
        self.slots
            .borrow_mut()
            .entry(object.id())
            .or_default()
            .entry(property.to_owned())
            .or_default()
            .push(callback);
    }

    /// Remove the first callback with `callback`'s identity from the
    /// pair's list.
    pub fn unlisten(
        &self,
        object: &Object,
        property: &str,
        callback: &Callback,
    ) -> Result<(), BindError> {
        let mut slots = self.slots.borrow_mut();
        let missing = || BindError::UnknownListener {
            object: object.id(),
            property: property.to_owned(),
        };
        let properties = slots.get_mut(&object.id()).ok_or_else(missing)?;
        let callbacks = properties.get_mut(property).ok_or_else(missing)?;
        let index = callbacks
            .iter()
            .position(|existing| existing.same_identity(callback))
            .ok_or_else(missing)?;
        callbacks.remove(index);
        // Drop empty slots so stale object ids do not accumulate.
        if callbacks.is_empty() {
            properties.remove(property);
            if properties.is_empty() {
                slots.remove(&object.id());
            }
        }
        Ok(())
    }

    /// Number of callbacks currently registered for the pair.
    #[must_use]
    pub fn callback_count(&self, object: &Object, property: &str) -> usize {
        self.slots
            .borrow()
            .get(&object.id())
            .and_then(|properties| properties.get(property))
            .map_or(0, Vec::len)
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }

    fn snapshot(&self, object: ObjectId, property: &str) -> Vec<Callback> {
        self.slots
            .borrow()
            .get(&object)
            .and_then(|properties| properties.get(property))
            .cloned()
            .unwrap_or_default()
    }
}

impl BusListener for ListenerRegistry {
    fn redispatch(&self, event: &PropertyChanged) {
        let callbacks = self.snapshot(event.object.id(), &event.property);
        for callback in callbacks.iter().rev() {
            if let Err(err) = callback.invoke(&event.new_value) {
                tracing::warn!(
                    "listener for {}.{} failed, continuing fan-out: {err}",
                    event.object.id(),
                    event.property
                );
            }
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("object_count", &self.slots.borrow().len())
            .finish()
    }
}
