#![forbid(unsafe_code)]

//! Record of intercepted (object, property) pairs.
//!
//! Guarantees that interception is installed at most once per pair:
//! [`Binder::register`](crate::Binder::register) consults this set to
//! stay idempotent.

use std::cell::RefCell;

use ahash::AHashSet;

use crate::value::ObjectId;

#[derive(Default)]
pub(crate) struct TriggerRecord {
    pairs: RefCell<AHashSet<(ObjectId, String)>>,
}

impl TriggerRecord {
    pub(crate) fn is_registered(&self, object: ObjectId, property: &str) -> bool {
        self.pairs
            .borrow()
            .contains(&(object, property.to_owned()))
    }

    /// Record the pair. Returns `false` when it was already present.
    pub(crate) fn record(&self, object: ObjectId, property: &str) -> bool {
        self.pairs.borrow_mut().insert((object, property.to_owned()))
    }

    pub(crate) fn len(&self) -> usize {
        self.pairs.borrow().len()
    }

    pub(crate) fn clear(&self) {
        self.pairs.borrow_mut().clear();
    }
}
