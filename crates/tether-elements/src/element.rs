#![forbid(unsafe_code)]

//! Headless UI elements.
//!
//! An [`Element`] is a kind-tagged node standing in for a concrete UI
//! control at the engine boundary: it holds the state an adapter needs
//! (a text value, a checked flag, ordered children, a name) and nothing
//! else. Real toolkits supply their own render layer; the binding
//! contract only needs this surface.
//!
//! The kind tag selects the adapter behavior statically: which edit
//! event user input raises, what the model-side read produces, and how
//! display writes land. Edits are simulated through [`Element::enter_text`],
//! [`Element::toggle`], and [`Element::choose`], which update the element
//! and then fire the bound model binder for the matching edit event, the
//! way a DOM `input`/`change` handler would run.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tether_core::{BindError, Value};

use crate::binding::BindingRecord;

/// The bindable element kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Free-text entry; edits raise [`EditEvent::Input`].
    TextInput,
    /// Boolean toggle; edits raise [`EditEvent::Change`].
    Checkbox,
    /// Single-choice list; edits raise [`EditEvent::Change`].
    Select,
    /// Display-only node (text content, arbitrary views).
    Generic,
    /// Container rendering one child per element of a bound array.
    ArrayContainer,
}

/// The user-edit event an element kind raises.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditEvent {
    /// Raised on every text edit.
    Input,
    /// Raised when a committed value changes.
    Change,
}

impl ElementKind {
    /// The edit event this kind raises, if it accepts user edits.
    #[must_use]
    pub fn edit_event(self) -> Option<EditEvent> {
        match self {
            Self::TextInput => Some(EditEvent::Input),
            Self::Checkbox | Self::Select => Some(EditEvent::Change),
            Self::Generic | Self::ArrayContainer => None,
        }
    }
}

pub(crate) struct ElementInner {
    kind: ElementKind,
    name: RefCell<Option<String>>,
    bind_path: RefCell<Option<String>>,
    text: RefCell<String>,
    checked: Cell<bool>,
    children: RefCell<Vec<Element>>,
    pub(crate) binding: RefCell<Option<BindingRecord>>,
}

/// A headless, kind-tagged UI node. Cloning clones the handle.
pub struct Element {
    pub(crate) inner: Rc<ElementInner>,
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.inner.kind)
            .field("name", &*self.inner.name.borrow())
            .field("bound", &self.inner.binding.borrow().is_some())
            .finish()
    }
}

impl Element {
    /// Create an element of the given kind.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                kind,
                name: RefCell::new(None),
                bind_path: RefCell::new(None),
                text: RefCell::new(String::new()),
                checked: Cell::new(false),
                children: RefCell::new(Vec::new()),
                binding: RefCell::new(None),
            }),
        }
    }

    /// A free-text input.
    #[must_use]
    pub fn text_input() -> Self {
        Self::new(ElementKind::TextInput)
    }

    /// A boolean checkbox.
    #[must_use]
    pub fn checkbox() -> Self {
        Self::new(ElementKind::Checkbox)
    }

    /// A single-choice select.
    #[must_use]
    pub fn select() -> Self {
        Self::new(ElementKind::Select)
    }

    /// A display-only node.
    #[must_use]
    pub fn generic() -> Self {
        Self::new(ElementKind::Generic)
    }

    /// A container for array bindings.
    #[must_use]
    pub fn array_container() -> Self {
        Self::new(ElementKind::ArrayContainer)
    }

    /// Builder-style name assignment, used by form-level binding to map
    /// controls onto same-named properties.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        *self.inner.name.borrow_mut() = Some(name.into());
        self
    }

    /// This element's kind.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.inner.kind
    }

    /// Builder-style binding-path marker, consumed by
    /// [`Element::autobind`]: the property path this element wants to be
    /// bound to when its subtree is auto-bound.
    #[must_use]
    pub fn with_bind_path(self, path: impl Into<String>) -> Self {
        *self.inner.bind_path.borrow_mut() = Some(path.into());
        self
    }

    /// This element's name, if any.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.inner.name.borrow().clone()
    }

    /// This element's binding-path marker, if any.
    #[must_use]
    pub fn bind_path(&self) -> Option<String> {
        self.inner.bind_path.borrow().clone()
    }

    /// Current text value (value for inputs and selects, text content
    /// for display nodes).
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.text.borrow().clone()
    }

    /// Write the text value without raising an edit event (a display
    /// write, not a user edit).
    pub fn set_text(&self, text: impl Into<String>) {
        *self.inner.text.borrow_mut() = text.into();
    }

    /// Current checked flag.
    #[must_use]
    pub fn checked(&self) -> bool {
        self.inner.checked.get()
    }

    /// Write the checked flag without raising an edit event.
    pub fn set_checked(&self, checked: bool) {
        self.inner.checked.set(checked);
    }

    /// Whether this element currently holds an active binding.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inner.binding.borrow().is_some()
    }

    // ---- children --------------------------------------------------------

    /// Append a child node.
    pub fn append_child(&self, child: Element) {
        self.inner.children.borrow_mut().push(child);
    }

    /// Remove and return the child at `index`, if any.
    pub fn remove_child(&self, index: usize) -> Option<Element> {
        let mut children = self.inner.children.borrow_mut();
        (index < children.len()).then(|| children.remove(index))
    }

    /// Drop all children.
    pub fn clear_children(&self) {
        self.inner.children.borrow_mut().clear();
    }

    /// The child at `index`, if any.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Element> {
        self.inner.children.borrow().get(index).cloned()
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.children.borrow().len()
    }

    /// Snapshot of the current children.
    #[must_use]
    pub fn children(&self) -> Vec<Element> {
        self.inner.children.borrow().clone()
    }

    // ---- simulated user edits --------------------------------------------

    /// Type text into the element, then fire the [`EditEvent::Input`]
    /// handler of the active binding, if any.
    pub fn enter_text(&self, text: impl Into<String>) -> Result<(), BindError> {
        self.set_text(text);
        self.fire(EditEvent::Input)
    }

    /// Toggle the checked flag, then fire the [`EditEvent::Change`]
    /// handler of the active binding, if any.
    pub fn toggle(&self, checked: bool) -> Result<(), BindError> {
        self.set_checked(checked);
        self.fire(EditEvent::Change)
    }

    /// Choose an option, then fire the [`EditEvent::Change`] handler of
    /// the active binding, if any.
    pub fn choose(&self, option: impl Into<String>) -> Result<(), BindError> {
        self.set_text(option);
        self.fire(EditEvent::Change)
    }

    /// Fire the model binder registered for `event`. No-op when the
    /// element is unbound or bound for a different edit event.
    pub fn fire(&self, event: EditEvent) -> Result<(), BindError> {
        let handler = {
            let binding = self.inner.binding.borrow();
            binding.as_ref().and_then(|record| {
                (record.edit_event == Some(event))
                    .then(|| record.model_binder.clone())
                    .flatten()
            })
        };
        match handler {
            Some(run) => run(),
            None => Ok(()),
        }
    }

    /// The model-side reading of this element's current state.
    pub(crate) fn read_value(&self) -> Value {
        match self.inner.kind {
            ElementKind::Checkbox => Value::Bool(self.checked()),
            ElementKind::TextInput | ElementKind::Select => {
                let text = self.text();
                if text.is_empty() {
                    Value::Null
                } else {
                    Value::Text(text)
                }
            }
            ElementKind::Generic | ElementKind::ArrayContainer => Value::Null,
        }
    }

    pub(crate) fn from_inner(inner: Rc<ElementInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> std::rc::Weak<ElementInner> {
        Rc::downgrade(&self.inner)
    }
}
