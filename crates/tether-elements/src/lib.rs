#![forbid(unsafe_code)]

//! Element adapters for the `tether-core` binding engine.
//!
//! An [`Element`] is a minimal widget: a kind tag, display state, and an
//! optional binding record. Adapters connect elements to model objects
//! and arrays:
//!
//! - text inputs, checkboxes, and selects bind two-way to a property
//!   ([`Element::bind`], [`Element::bind_mapped`]);
//! - generic elements bind display-only ([`Element::bind_text`],
//!   [`Element::bind_view`]);
//! - array containers mirror an observable array's elements as rendered
//!   children ([`Element::bind_array`]);
//! - computed fields derive their UI value from declared dependencies
//!   ([`Element::bind_callback`]);
//! - [`Form`] binds every named control under a root in one call, and
//!   [`Element::autobind`] binds every path-marked element in a subtree.
//!
//! Binding an already-bound element always releases the previous binding
//! first, so a given element holds at most one binding at a time.
//!
//! ```
//! use tether_core::{Binder, Object, Value};
//! use tether_elements::Element;
//!
//! let binder = Binder::new();
//! let user = Object::new();
//! user.insert("name", "Ada");
//!
//! let input = Element::text_input();
//! input.bind(&binder, &user, "name")?;
//! assert_eq!(input.text(), "Ada");
//!
//! input.enter_text("Grace")?;
//! assert_eq!(user.get("name"), Value::from("Grace"));
//!
//! user.set("name", "Hopper");
//! assert_eq!(input.text(), "Hopper");
//! # Ok::<(), tether_core::BindError>(())
//! ```

mod binding;
mod element;
mod form;

pub use binding::{Dependency, Transform, ViewFactory, ViewFn};
pub use element::{EditEvent, Element, ElementKind};
pub use form::{Computation, FieldModifier, Form};
