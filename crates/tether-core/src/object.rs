#![forbid(unsafe_code)]

//! Property interception on shared objects.
//!
//! An [`Object`] is a reference-counted map of field name to [`Value`].
//! The engine never owns domain data: application code builds the graph
//! with [`Object::insert`], and interception is attached afterwards by
//! [`Binder::register`](crate::Binder::register) without the object's
//! cooperation.
//!
//! # Invariants
//!
//! 1. A given (object, property) pair dispatches at most one
//!    `PropertyChanged` per write, and only once registered.
//! 2. The new value is stored **before** the event is dispatched: the
//!    event still carries the old value in its payload, and reads made
//!    by listeners during dispatch observe the value just written. A
//!    computed field whose refresh re-reads the model therefore never
//!    renders stale state.
//! 3. A write hook installed before registration is preserved: it still
//!    runs on every write, after store and dispatch.
//! 4. Assigning a list to a registered property recursively installs
//!    array interception owned by that pair.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Read of absent field | Field never written | Returns `Value::Null` |
//! | Assigned list owned elsewhere | Same array bound to two pairs | Keeps the first owner, logs a warning |
//! | Binder dropped | Engine torn down before the object | Writes become plain stores |

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::AHashMap;

use crate::binder::BinderCore;
use crate::event::ChangeEvent;
use crate::value::{ObjectId, Value, next_id};

/// Side effect invoked after a field write, with the owning object and
/// the value that was stored. The Rust rendition of a pre-existing
/// custom setter on the property.
pub type WriteHook = Rc<dyn Fn(&Object, &Value)>;

pub(crate) struct ObjectInner {
    id: ObjectId,
    fields: RefCell<AHashMap<String, Value>>,
    write_hooks: RefCell<AHashMap<String, WriteHook>>,
    /// Engine attachment. `None` until the first `register` call.
    binder: RefCell<Option<Weak<BinderCore>>>,
}

/// A shared, dynamically shaped model object.
///
/// Cloning an `Object` clones the handle; both handles address the same
/// fields and the same identity.
pub struct Object {
    inner: Rc<ObjectInner>,
}

impl Clone for Object {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self.inner.fields.borrow();
        f.debug_struct("Object")
            .field("id", &self.inner.id)
            .field("fields", &*fields)
            .finish()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Object {}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Object {
    /// Create an empty object with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ObjectInner {
                id: ObjectId(next_id()),
                fields: RefCell::new(AHashMap::new()),
                write_hooks: RefCell::new(AHashMap::new()),
                binder: RefCell::new(None),
            }),
        }
    }

    /// This object's identity.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.inner.id
    }

    /// Read a field. Absent fields read as [`Value::Null`].
    #[must_use]
    pub fn get(&self, property: &str) -> Value {
        self.inner
            .fields
            .borrow()
            .get(property)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Whether the field has ever been written.
    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.inner.fields.borrow().contains_key(property)
    }

    /// Field names currently present, in no particular order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.inner.fields.borrow().keys().cloned().collect()
    }

    /// Seed a field without notification. Used to build the graph before
    /// (or independently of) interception; never dispatches and never
    /// runs write hooks.
    pub fn insert(&self, property: &str, value: impl Into<Value>) {
        self.inner
            .fields
            .borrow_mut()
            .insert(property.to_owned(), value.into());
    }

    /// Write a field through the intercepted path.
    ///
    /// If the pair is registered on a live binder this stores the value,
    /// installs owned array interception when the new value is a list,
    /// dispatches a `PropertyChanged` carrying the old and new values,
    /// then runs any write hook. Otherwise it is a plain store plus
    /// write hook.
    pub fn set(&self, property: &str, value: impl Into<Value>) {
        let value = value.into();
        let core = self
            .inner
            .binder
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .filter(|core| core.is_intercepted(self.inner.id, property));
        match core {
            Some(core) => {
                let old = self.get(property);
                self.inner
                    .fields
                    .borrow_mut()
                    .insert(property.to_owned(), value.clone());
                // An assigned list is intercepted before fan-out.
                if let Value::List(list) = &value
                    && let Err(err) = list.install_hook(&core, Some((self, property)))
                {
                    tracing::warn!(
                        "list assigned to {}.{property} keeps its previous owner: {err}",
                        self.inner.id
                    );
                }
                core.dispatch(&ChangeEvent::property_changed(
                    self.clone(),
                    property,
                    old,
                    value.clone(),
                ));
                let hook = self.inner.write_hooks.borrow().get(property).cloned();
                if let Some(hook) = hook {
                    hook(self, &value);
                }
            }
            None => self.store(property, &value),
        }
    }

    /// Install a write-side effect for one field, preserved across
    /// registration. At most one hook per field; a second call replaces
    /// the first.
    pub fn set_write_hook(&self, property: &str, hook: impl Fn(&Object, &Value) + 'static) {
        self.inner
            .write_hooks
            .borrow_mut()
            .insert(property.to_owned(), Rc::new(hook));
    }

    fn store(&self, property: &str, value: &Value) {
        self.inner
            .fields
            .borrow_mut()
            .insert(property.to_owned(), value.clone());
        let hook = self.inner.write_hooks.borrow().get(property).cloned();
        if let Some(hook) = hook {
            hook(self, value);
        }
    }

    /// Attach this object to a binder. Re-attaching to the same binder is
    /// a no-op; moving to a different live binder is logged, since the
    /// previous binder's registrations stop dispatching for this object.
    pub(crate) fn attach(&self, core: &Rc<BinderCore>) {
        let mut slot = self.inner.binder.borrow_mut();
        if let Some(existing) = slot.as_ref().and_then(Weak::upgrade) {
            if Rc::ptr_eq(&existing, core) {
                return;
            }
            tracing::warn!("{} moves to a different binder", self.inner.id);
        }
        *slot = Some(Rc::downgrade(core));
    }

    pub(crate) fn downgrade(&self) -> Weak<ObjectInner> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn from_inner(inner: Rc<ObjectInner>) -> Self {
        Self { inner }
    }
}
