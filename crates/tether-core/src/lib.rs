#![forbid(unsafe_code)]

//! Tether core: observable object graph and change-event plumbing.
//!
//! This crate provides the engine half of Tether's reactive bindings:
//!
//! - [`Object`] / [`ObsArray`] / [`Value`]: a shared, dynamically shaped
//!   model graph the engine can intercept without the data's
//!   cooperation.
//! - [`Binder`]: a per-application engine instance owning the event bus,
//!   the trigger record, and the listener registry. No global state;
//!   tests create one and drop it.
//! - [`ChangeEvent`] / [`BusListener`]: typed change events with
//!   double-dispatch routing to listener hooks.
//!
//! Element adapters (text inputs, checkboxes, list containers) live in
//! `tether-elements` and are plain consumers of this crate.
//!
//! # Ordering guarantees
//!
//! Bus listeners fire in registration order. Callbacks registered on a
//! single (object, property) pair fire in **reverse** registration
//! order: the last-bound element updates first. Both orders are
//! observable and covered by tests.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tether_core::{Binder, Callback, Object, Value};
//!
//! let binder = Binder::new();
//! let user = Object::new();
//! user.insert("name", "Ada");
//! binder.register(&user, "name");
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&seen);
//! binder.listen(
//!     &user,
//!     "name",
//!     Callback::infallible(move |value| log.borrow_mut().push(value.clone())),
//! );
//!
//! user.set("name", "Grace");
//! assert_eq!(*seen.borrow(), vec![Value::from("Grace")]);
//! ```

pub mod array;
pub mod binder;
pub mod bus;
pub mod error;
pub mod event;
pub mod object;
pub mod path;
pub mod registry;
mod triggers;
pub mod value;

pub use array::ObsArray;
pub use binder::Binder;
pub use bus::EventBus;
pub use error::BindError;
pub use event::{
    ArrayElementAdded, ArrayElementRemoved, BusListener, ChangeEvent, PropertyChanged,
};
pub use object::{Object, WriteHook};
pub use path::resolve_path;
pub use registry::{Callback, ListenerRegistry};
pub use value::{ArrayId, ObjectId, Value};
