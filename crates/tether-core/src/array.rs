#![forbid(unsafe_code)]

//! Array interception on shared arrays.
//!
//! Interception is per instance: only arrays that have been hooked (via
//! [`Binder::register_array`](crate::Binder::register_array) or by being
//! assigned to a registered property) dispatch events; every other
//! [`ObsArray`] mutates silently.
//!
//! An intercepted array may be *owned* by an (object, property) pair.
//! Owned arrays dispatch one extra `PropertyChanged` for that pair per
//! structural mutation, so plain property-level listeners (a "recompute
//! this count" callback) refresh alongside the element-level ones.
//!
//! # Invariants
//!
//! 1. `push` dispatches exactly one `ArrayElementAdded` after the store,
//!    so the element is already at `len() - 1` at dispatch time.
//! 2. `remove` and `splice` capture removed elements before the removal
//!    and dispatch one `ArrayElementRemoved` per element with its
//!    **original** index.
//! 3. `splice` emits its removal events in descending index order. A
//!    container that removes its child at `event.index` then stays
//!    consistent across the whole sequence; ascending emission with
//!    original indices would address already-shifted children.
//! 4. The owner is held weakly: an array never keeps its owning object
//!    alive.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::binder::BinderCore;
use crate::error::BindError;
use crate::event::ChangeEvent;
use crate::object::{Object, ObjectInner};
use crate::value::{ArrayId, Value, next_id};

pub(crate) struct ArrayHook {
    core: Weak<BinderCore>,
    owner: Option<(Weak<ObjectInner>, String)>,
}

struct ArrayInner {
    id: ArrayId,
    items: RefCell<Vec<Value>>,
    hook: RefCell<Option<ArrayHook>>,
}

/// A shared array of [`Value`]s with optional interception.
///
/// Cloning clones the handle; both handles address the same items and
/// the same identity.
pub struct ObsArray {
    inner: Rc<ArrayInner>,
}

impl Clone for ObsArray {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for ObsArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObsArray")
            .field("id", &self.inner.id)
            .field("items", &*self.inner.items.borrow())
            .finish()
    }
}

impl PartialEq for ObsArray {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for ObsArray {}

impl Default for ObsArray {
    fn default() -> Self {
        Self::new()
    }
}

impl ObsArray {
    /// Create an empty array with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self::from_values(Vec::new())
    }

    /// Create an array seeded with `values`.
    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            inner: Rc::new(ArrayInner {
                id: ArrayId(next_id()),
                items: RefCell::new(values),
                hook: RefCell::new(None),
            }),
        }
    }

    /// This array's identity.
    #[must_use]
    pub fn id(&self) -> ArrayId {
        self.inner.id
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// Whether the array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// The element at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.inner.items.borrow().get(index).cloned()
    }

    /// Snapshot of the current elements.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.inner.items.borrow().clone()
    }

    /// Position of the first element equal to `value`.
    #[must_use]
    pub fn position(&self, value: &Value) -> Option<usize> {
        self.inner.items.borrow().iter().position(|item| item == value)
    }

    /// Append an element, returning the new length. Dispatches one
    /// `ArrayElementAdded` (plus the owner's `PropertyChanged`) when
    /// intercepted.
    pub fn push(&self, element: impl Into<Value>) -> usize {
        let element = element.into();
        let len = {
            let mut items = self.inner.items.borrow_mut();
            items.push(element.clone());
            items.len()
        };
        if let Some((core, owner)) = self.live_hook() {
            core.dispatch(&ChangeEvent::array_added(self.clone(), element));
            self.notify_owner(&core, owner.as_ref());
        }
        len
    }

    /// Remove the element at `index`, returning it. Out-of-range indexes
    /// are a no-op. Dispatches one `ArrayElementRemoved` carrying the
    /// element that was at `index` before removal.
    pub fn remove(&self, index: usize) -> Option<Value> {
        let element = {
            let mut items = self.inner.items.borrow_mut();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        if let Some((core, owner)) = self.live_hook() {
            core.dispatch(&ChangeEvent::array_removed(
                self.clone(),
                element.clone(),
                index,
            ));
            self.notify_owner(&core, owner.as_ref());
        }
        Some(element)
    }

    /// Remove the first element equal to `value`. Returns whether an
    /// element was removed.
    pub fn remove_element(&self, value: &Value) -> bool {
        match self.position(value) {
            Some(index) => self.remove(index).is_some(),
            None => false,
        }
    }

    /// Remove `len` elements starting at `index` (clamped to the array),
    /// returning them in original order. Dispatches one
    /// `ArrayElementRemoved` per element with its original index, in
    /// descending index order, then the owner's `PropertyChanged` once.
    pub fn splice(&self, index: usize, len: usize) -> Vec<Value> {
        let removed: Vec<Value> = {
            let mut items = self.inner.items.borrow_mut();
            if index >= items.len() {
                Vec::new()
            } else {
                let end = usize::min(index + len, items.len());
                items.drain(index..end).collect()
            }
        };
        if !removed.is_empty()
            && let Some((core, owner)) = self.live_hook()
        {
            for (offset, element) in removed.iter().enumerate().rev() {
                core.dispatch(&ChangeEvent::array_removed(
                    self.clone(),
                    element.clone(),
                    index + offset,
                ));
            }
            self.notify_owner(&core, owner.as_ref());
        }
        removed
    }

    /// Install interception. Idempotent for the same owner or when no
    /// owner is given; installing a *different* owner is refused, since
    /// silently replacing the hook would drop the first owner's property
    /// events.
    pub(crate) fn install_hook(
        &self,
        core: &Rc<BinderCore>,
        owner: Option<(&Object, &str)>,
    ) -> Result<(), BindError> {
        let mut slot = self.inner.hook.borrow_mut();
        if let Some(existing) = slot.as_ref()
            && existing.core.strong_count() > 0
        {
            return match (&existing.owner, owner) {
                // Unowned registration never displaces anything.
                (_, None) => Ok(()),
                (None, Some((object, property))) => {
                    *slot = Some(ArrayHook {
                        core: Rc::downgrade(core),
                        owner: Some((object.downgrade(), property.to_owned())),
                    });
                    Ok(())
                }
                (Some((current, current_property)), Some((object, property))) => {
                    let same_object = current
                        .upgrade()
                        .is_some_and(|inner| Object::from_inner(inner) == *object);
                    if same_object && current_property == property {
                        Ok(())
                    } else {
                        Err(BindError::AlreadyBound {
                            array: self.inner.id,
                            property: current_property.clone(),
                        })
                    }
                }
            };
        }
        *slot = Some(ArrayHook {
            core: Rc::downgrade(core),
            owner: owner.map(|(object, property)| (object.downgrade(), property.to_owned())),
        });
        Ok(())
    }

    /// Whether this array is currently intercepted by a live binder.
    #[must_use]
    pub fn is_intercepted(&self) -> bool {
        self.live_hook().is_some()
    }

    fn live_hook(&self) -> Option<(Rc<BinderCore>, Option<(Object, String)>)> {
        let hook = self.inner.hook.borrow();
        let hook = hook.as_ref()?;
        let core = hook.core.upgrade()?;
        let owner = hook.owner.as_ref().and_then(|(weak, property)| {
            weak.upgrade()
                .map(|inner| (Object::from_inner(inner), property.clone()))
        });
        Some((core, owner))
    }

    fn notify_owner(&self, core: &Rc<BinderCore>, owner: Option<&(Object, String)>) {
        if let Some((object, property)) = owner {
            core.dispatch(&ChangeEvent::property_changed(
                object.clone(),
                property,
                Value::List(self.clone()),
                Value::List(self.clone()),
            ));
        }
    }
}

impl FromIterator<Value> for ObsArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ops_without_hook() {
        let list = ObsArray::new();
        assert!(list.is_empty());
        assert_eq!(list.push("a"), 1);
        assert_eq!(list.push("b"), 2);
        assert_eq!(list.get(0), Some(Value::from("a")));
        assert_eq!(list.remove(0), Some(Value::from("a")));
        assert_eq!(list.to_vec(), vec![Value::from("b")]);
        assert!(!list.is_intercepted());
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let list = ObsArray::new();
        list.push("a");
        assert_eq!(list.remove(5), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn splice_clamps_to_len() {
        let list = ObsArray::from_values(vec!["a".into(), "b".into(), "c".into()]);
        let removed = list.splice(1, 10);
        assert_eq!(removed, vec![Value::from("b"), Value::from("c")]);
        assert_eq!(list.to_vec(), vec![Value::from("a")]);
        assert!(list.splice(5, 1).is_empty());
    }

    #[test]
    fn remove_element_by_equality() {
        let list = ObsArray::from_values(vec!["a".into(), "b".into()]);
        assert!(list.remove_element(&Value::from("a")));
        assert!(!list.remove_element(&Value::from("a")));
        assert_eq!(list.to_vec(), vec![Value::from("b")]);
    }

    #[test]
    fn identity_shared_across_clones() {
        let list = ObsArray::new();
        let handle = list.clone();
        handle.push(1.0);
        assert_eq!(list.len(), 1);
        assert_eq!(list, handle);
    }
}
