#![forbid(unsafe_code)]

//! Typed change events and the bus listener hooks they address.
//!
//! Routing is double dispatch: the event decides which hook of a
//! [`BusListener`] to call. Hooks default to no-ops, so a listener only
//! implements the hooks it cares about; a list container implements the
//! array pair and ignores property traffic.

use crate::array::ObsArray;
use crate::object::Object;
use crate::value::Value;

/// A property of an object changed value.
#[derive(Clone, Debug)]
pub struct PropertyChanged {
    /// The object whose property changed.
    pub object: Object,
    /// The property name.
    pub property: String,
    /// The value before the write.
    pub old_value: Value,
    /// The value being written.
    pub new_value: Value,
}

/// An element was appended to an intercepted array.
#[derive(Clone, Debug)]
pub struct ArrayElementAdded {
    /// The array that grew.
    pub array: ObsArray,
    /// The appended element.
    pub element: Value,
}

/// An element was removed from an intercepted array.
#[derive(Clone, Debug)]
pub struct ArrayElementRemoved {
    /// The array that shrank.
    pub array: ObsArray,
    /// The element that was at `index` before removal.
    pub element: Value,
    /// The element's index before removal.
    pub index: usize,
}

/// A change event flowing over the bus.
#[derive(Clone, Debug)]
pub enum ChangeEvent {
    /// See [`PropertyChanged`].
    PropertyChanged(PropertyChanged),
    /// See [`ArrayElementAdded`].
    ArrayElementAdded(ArrayElementAdded),
    /// See [`ArrayElementRemoved`].
    ArrayElementRemoved(ArrayElementRemoved),
}

impl ChangeEvent {
    /// Build a property-changed event.
    pub fn property_changed(
        object: Object,
        property: impl Into<String>,
        old_value: Value,
        new_value: Value,
    ) -> Self {
        Self::PropertyChanged(PropertyChanged {
            object,
            property: property.into(),
            old_value,
            new_value,
        })
    }

    /// Build an array-element-added event.
    pub fn array_added(array: ObsArray, element: Value) -> Self {
        Self::ArrayElementAdded(ArrayElementAdded { array, element })
    }

    /// Build an array-element-removed event.
    pub fn array_removed(array: ObsArray, element: Value, index: usize) -> Self {
        Self::ArrayElementRemoved(ArrayElementRemoved {
            array,
            element,
            index,
        })
    }

    /// Route this event to the hook it addresses on `listener`.
    pub fn deliver(&self, listener: &dyn BusListener) {
        match self {
            Self::PropertyChanged(event) => listener.redispatch(event),
            Self::ArrayElementAdded(event) => listener.array_element_added(event),
            Self::ArrayElementRemoved(event) => listener.array_element_removed(event),
        }
    }
}

/// A bus subscriber. All hooks default to no-ops.
pub trait BusListener {
    /// A property changed; the listener registry implements this hook to
    /// fan the event out to per-pair callbacks.
    fn redispatch(&self, _event: &PropertyChanged) {}

    /// An intercepted array gained an element.
    fn array_element_added(&self, _event: &ArrayElementAdded) {}

    /// An intercepted array lost an element.
    fn array_element_removed(&self, _event: &ArrayElementRemoved) {}
}
