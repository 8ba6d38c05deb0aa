#![forbid(unsafe_code)]

//! Bulk binding of a form's named controls to one object.
//!
//! [`Form::bind`] walks the element tree under the form root, takes every
//! named editable control, and binds it to the object property of the
//! same name. Per-field behavior is adjusted with a [`FieldModifier`]
//! (transforms around an ordinary property binding) or replaced entirely
//! with a [`Computation`] (a virtual field with explicit dependencies).
//!
//! Binding is all-or-nothing: if any field fails, the fields bound so
//! far are unbound again and the error is returned.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tether_core::{BindError, Binder, Object, Value};

use crate::binding::{Dependency, Transform};
use crate::element::{Element, ElementKind};

/// Optional transforms applied to one named field's binding.
#[derive(Clone, Default)]
pub struct FieldModifier {
    /// Maps the element's raw value before the property write.
    pub to_model: Option<Transform>,
    /// Maps the property value before display.
    pub to_ui: Option<Transform>,
}

/// A virtual field: no backing property of its own, a UI value computed
/// from the declared dependencies, and edits handed to `to_model`.
#[derive(Clone)]
pub struct Computation {
    /// Receives the element's raw value on each edit.
    pub to_model: Rc<dyn Fn(&Value)>,
    /// Produces the value to display.
    pub to_ui: Rc<dyn Fn() -> Value>,
    /// The (object, properties) pairs whose changes refresh the field.
    pub dependencies: Vec<Dependency>,
}

/// A form root plus the object its controls are currently bound to.
pub struct Form {
    root: Element,
    bound: RefCell<Option<Object>>,
}

impl Form {
    /// Wrap an element tree as a form. The root's own kind is irrelevant;
    /// only named editable descendants take part in binding.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self {
            root,
            bound: RefCell::new(None),
        }
    }

    /// The wrapped root element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The object the form is currently bound to, if any.
    #[must_use]
    pub fn bound_object(&self) -> Option<Object> {
        self.bound.borrow().clone()
    }

    /// Every named editable control under the root, in document order.
    #[must_use]
    pub fn controls(&self) -> Vec<Element> {
        let mut found = Vec::new();
        collect_controls(&self.root, &mut found);
        found
    }

    /// Bind every named control to `object`'s property of the same name.
    /// A control whose name appears in `computations` becomes a virtual
    /// field instead; one in `modifiers` binds with those transforms.
    pub fn bind(
        &self,
        binder: &Binder,
        object: &Object,
        modifiers: &HashMap<String, FieldModifier>,
        computations: &HashMap<String, Computation>,
    ) -> Result<(), BindError> {
        let mut bound = Vec::new();
        for control in self.controls() {
            let Some(name) = control.name() else {
                continue;
            };
            let result = if let Some(computation) = computations.get(&name) {
                control.bind_callback(
                    binder,
                    Rc::clone(&computation.to_model),
                    Rc::clone(&computation.to_ui),
                    &computation.dependencies,
                )
            } else {
                let modifier = modifiers.get(&name).cloned().unwrap_or_default();
                control.bind_mapped(binder, object, &name, modifier.to_model, modifier.to_ui)
            };
            match result {
                Ok(()) => bound.push(control),
                Err(err) => {
                    for control in bound {
                        control.unbind();
                    }
                    return Err(err);
                }
            }
        }
        *self.bound.borrow_mut() = Some(object.clone());
        Ok(())
    }

    /// Unbind every control under the root. Safe on an unbound form.
    pub fn unbind(&self) {
        for control in self.controls() {
            control.unbind();
        }
        *self.bound.borrow_mut() = None;
    }
}

fn collect_controls(element: &Element, found: &mut Vec<Element>) {
    for child in element.children() {
        if matches!(
            child.kind(),
            ElementKind::TextInput | ElementKind::Checkbox | ElementKind::Select
        ) && child.name().is_some()
        {
            found.push(child.clone());
        }
        collect_controls(&child, found);
    }
}
