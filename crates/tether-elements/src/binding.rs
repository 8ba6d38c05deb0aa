#![forbid(unsafe_code)]

//! The per-element bind/unbind adapter contract.
//!
//! Every adapter follows the same shape: `bind` first forces the element
//! through the unbound state (so re-binding can never double-register),
//! resolves its target, installs the model binder for the kind's edit
//! event, registers interception, listens with a UI binder, and finally
//! invokes the UI binder once so the element displays the current value
//! immediately. `unbind` releases exactly what `bind` acquired and is a
//! no-op on an unbound element.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unresolvable path | Absent/non-record segment | `MissingPath` at bind time |
//! | Untransformable initial value | Record shown without transform | Bind fails, element stays unbound |
//! | Untransformable later value | Same, after a model write | Logged by the registry, other listeners still run |
//! | Element dropped while bound | Binding record gone with it | Registered callbacks become no-ops |

use std::rc::{Rc, Weak};

use tether_core::{
    ArrayElementAdded, ArrayElementRemoved, BindError, Binder, BusListener, Callback, ObsArray,
    Object, Value, resolve_path,
};

use crate::element::{EditEvent, Element, ElementInner, ElementKind};

/// A value transform applied between the element and the model.
pub type Transform = Rc<dyn Fn(&Value) -> Value>;

/// A display routine for [`Element::bind_view`].
pub type ViewFn = Rc<dyn Fn(&Element, &Value)>;

/// Produces the rendered child for one array element at one index.
pub type ViewFactory = Rc<dyn Fn(&Value, usize) -> Element>;

/// One object and the properties of it a computed binding depends on.
#[derive(Clone)]
pub struct Dependency {
    /// The observed object.
    pub object: Object,
    /// The observed property names.
    pub properties: Vec<String>,
}

impl Dependency {
    /// Convenience constructor.
    pub fn new(object: &Object, properties: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            object: object.clone(),
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }
}

pub(crate) type ModelBinder = Rc<dyn Fn() -> Result<(), BindError>>;

/// Everything one `bind` call acquired, released as a unit by `unbind`.
pub(crate) struct BindingRecord {
    binder: Binder,
    pub(crate) edit_event: Option<EditEvent>,
    pub(crate) model_binder: Option<ModelBinder>,
    ui_binder: Option<Callback>,
    dependencies: Vec<(Object, String)>,
    /// Keeps an array container's bus listener alive; the bus itself
    /// only holds it weakly.
    _bus_listener: Option<Rc<ContainerListener>>,
}

fn write_display(element: &Element, value: &Value) -> Result<(), BindError> {
    match element.kind() {
        ElementKind::Checkbox => {
            element.set_checked(value.is_truthy());
            Ok(())
        }
        _ => {
            element.set_text(value.display_text()?);
            Ok(())
        }
    }
}

/// Default element-to-model conversion, keyed off the property's current
/// value: text feeding a list splits on `|`, a record-valued property
/// needs an explicit transform, everything else passes through (empty
/// text already reads as `Null`).
fn default_to_model(current: &Value, raw: Value) -> Result<Value, BindError> {
    match current {
        Value::List(_) => Ok(match raw {
            Value::Null => Value::List(ObsArray::new()),
            Value::Text(text) => Value::List(text.split('|').map(Value::from).collect()),
            other => other,
        }),
        Value::Record(_) => Err(BindError::InvalidTransform {
            expected: "record",
            found: raw.type_name(),
        }),
        _ => Ok(raw),
    }
}

impl Element {
    /// Bind this element to `object`'s property at `path`, with the
    /// default conversions in both directions.
    pub fn bind(&self, binder: &Binder, object: &Object, path: &str) -> Result<(), BindError> {
        self.bind_mapped(binder, object, path, None, None)
    }

    /// Bind with optional transforms: `to_model` maps the element's raw
    /// value before the property write, `to_ui` maps the property value
    /// before display.
    pub fn bind_mapped(
        &self,
        binder: &Binder,
        object: &Object,
        path: &str,
        to_model: Option<Transform>,
        to_ui: Option<Transform>,
    ) -> Result<(), BindError> {
        self.unbind();
        let (target, property) = resolve_path(object, path)?;

        let weak = self.downgrade();
        let ui_binder = Callback::new(move |value: &Value| {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            let shown = match &to_ui {
                Some(transform) => transform(value),
                None => value.clone(),
            };
            write_display(&Element::from_inner(inner), &shown)
        });

        let weak = self.downgrade();
        let model_target = target.clone();
        let model_property = property.clone();
        let model_binder: ModelBinder = Rc::new(move || {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            let raw = Element::from_inner(inner).read_value();
            let value = match &to_model {
                Some(transform) => transform(&raw),
                None => default_to_model(&model_target.get(&model_property), raw)?,
            };
            model_target.set(&model_property, value);
            Ok(())
        });

        binder.register(&target, &property);
        binder.listen(&target, &property, ui_binder.clone());
        *self.inner.binding.borrow_mut() = Some(BindingRecord {
            binder: binder.clone(),
            edit_event: self.kind().edit_event(),
            model_binder: Some(model_binder),
            ui_binder: Some(ui_binder.clone()),
            dependencies: vec![(target.clone(), property.clone())],
            _bus_listener: None,
        });

        self.initial_sync(&ui_binder, &target.get(&property))
    }

    /// Bind a computed (virtual) field: the UI binder re-runs whenever
    /// any declared dependency changes, and user edits hand the
    /// element's raw value to `to_model` instead of writing a property.
    pub fn bind_callback(
        &self,
        binder: &Binder,
        to_model: Rc<dyn Fn(&Value)>,
        to_ui: Rc<dyn Fn() -> Value>,
        dependencies: &[Dependency],
    ) -> Result<(), BindError> {
        self.unbind();

        let weak = self.downgrade();
        let ui_binder = Callback::new(move |_: &Value| {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            write_display(&Element::from_inner(inner), &to_ui())
        });

        let weak = self.downgrade();
        let model_binder: ModelBinder = Rc::new(move || {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            to_model(&Element::from_inner(inner).read_value());
            Ok(())
        });

        let mut recorded = Vec::new();
        for dependency in dependencies {
            for property in &dependency.properties {
                binder.register(&dependency.object, property);
                binder.listen(&dependency.object, property, ui_binder.clone());
                recorded.push((dependency.object.clone(), property.clone()));
            }
        }
        *self.inner.binding.borrow_mut() = Some(BindingRecord {
            binder: binder.clone(),
            edit_event: self.kind().edit_event(),
            model_binder: Some(model_binder),
            ui_binder: Some(ui_binder.clone()),
            dependencies: recorded,
            _bus_listener: None,
        });

        self.initial_sync(&ui_binder, &Value::Null)
    }

    /// Bind a display-only element through a caller-supplied view.
    pub fn bind_view(
        &self,
        binder: &Binder,
        object: &Object,
        path: &str,
        view: ViewFn,
    ) -> Result<(), BindError> {
        self.unbind();
        let (target, property) = resolve_path(object, path)?;

        let weak = self.downgrade();
        let ui_binder = Callback::new(move |value: &Value| {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            view(&Element::from_inner(inner), value);
            Ok(())
        });

        binder.register(&target, &property);
        binder.listen(&target, &property, ui_binder.clone());
        *self.inner.binding.borrow_mut() = Some(BindingRecord {
            binder: binder.clone(),
            edit_event: None,
            model_binder: None,
            ui_binder: Some(ui_binder.clone()),
            dependencies: vec![(target.clone(), property.clone())],
            _bus_listener: None,
        });

        self.initial_sync(&ui_binder, &target.get(&property))
    }

    /// Bind a display-only element's text content, optionally through a
    /// modifier transform.
    pub fn bind_text(
        &self,
        binder: &Binder,
        object: &Object,
        path: &str,
        modifier: Option<Transform>,
    ) -> Result<(), BindError> {
        self.unbind();
        let (target, property) = resolve_path(object, path)?;

        let weak = self.downgrade();
        let ui_binder = Callback::new(move |value: &Value| {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            let shown = match &modifier {
                Some(transform) => transform(value),
                None => value.clone(),
            };
            Element::from_inner(inner).set_text(shown.display_text()?);
            Ok(())
        });

        binder.register(&target, &property);
        binder.listen(&target, &property, ui_binder.clone());
        *self.inner.binding.borrow_mut() = Some(BindingRecord {
            binder: binder.clone(),
            edit_event: None,
            model_binder: None,
            ui_binder: Some(ui_binder.clone()),
            dependencies: vec![(target.clone(), property.clone())],
            _bus_listener: None,
        });

        self.initial_sync(&ui_binder, &target.get(&property))
    }

    /// Bind this container to `array`: one rendered child per element,
    /// in array order, maintained across pushes, removals, and splices.
    pub fn bind_array(
        &self,
        binder: &Binder,
        array: &ObsArray,
        view: ViewFactory,
    ) -> Result<(), BindError> {
        self.unbind();
        binder.register_array(array)?;

        let listener = Rc::new(ContainerListener {
            element: self.downgrade(),
            array: array.clone(),
            view: Rc::clone(&view),
        });
        binder.add_listener(&listener);
        *self.inner.binding.borrow_mut() = Some(BindingRecord {
            binder: binder.clone(),
            edit_event: None,
            model_binder: None,
            ui_binder: None,
            dependencies: Vec::new(),
            _bus_listener: Some(listener),
        });

        self.clear_children();
        for (index, element) in array.to_vec().into_iter().enumerate() {
            self.append_child(view(&element, index));
        }
        Ok(())
    }

    /// Walk this element and its subtree, binding every element carrying
    /// a binding-path marker (see [`Element::with_bind_path`]) to
    /// `object`'s property at that path. Editable kinds bind two-way
    /// with the default conversions; display kinds bind their text
    /// content. All-or-nothing: a failing path unwinds the elements
    /// bound by this walk.
    pub fn autobind(&self, binder: &Binder, object: &Object) -> Result<(), BindError> {
        let mut bound = Vec::new();
        if let Err(err) = self.autobind_walk(binder, object, &mut bound) {
            for element in bound {
                element.unbind();
            }
            return Err(err);
        }
        Ok(())
    }

    fn autobind_walk(
        &self,
        binder: &Binder,
        object: &Object,
        bound: &mut Vec<Element>,
    ) -> Result<(), BindError> {
        if let Some(path) = self.bind_path() {
            match self.kind() {
                ElementKind::TextInput | ElementKind::Checkbox | ElementKind::Select => {
                    self.bind(binder, object, &path)?;
                }
                ElementKind::Generic | ElementKind::ArrayContainer => {
                    self.bind_text(binder, object, &path, None)?;
                }
            }
            bound.push(self.clone());
        }
        for child in self.children() {
            child.autobind_walk(binder, object, bound)?;
        }
        Ok(())
    }

    /// Release everything the active binding acquired. Safe to call on
    /// an unbound element.
    pub fn unbind(&self) {
        let Some(record) = self.inner.binding.borrow_mut().take() else {
            return;
        };
        if let Some(ui_binder) = &record.ui_binder {
            for (object, property) in &record.dependencies {
                if let Err(err) = record.binder.unlisten(object, property, ui_binder) {
                    tracing::warn!(
                        "unbind found no registration for {}.{property}: {err}",
                        object.id()
                    );
                }
            }
        }
        // Dropping the record releases any container bus listener.
    }

    fn initial_sync(&self, ui_binder: &Callback, value: &Value) -> Result<(), BindError> {
        if let Err(err) = ui_binder.invoke(value) {
            self.unbind();
            return Err(err);
        }
        Ok(())
    }
}

/// Bus listener keeping one container's children aligned with its bound
/// array.
pub(crate) struct ContainerListener {
    element: Weak<ElementInner>,
    array: ObsArray,
    view: ViewFactory,
}

impl BusListener for ContainerListener {
    fn array_element_added(&self, event: &ArrayElementAdded) {
        if event.array != self.array {
            return;
        }
        let Some(inner) = self.element.upgrade() else {
            return;
        };
        let container = Element::from_inner(inner);
        let index = self.array.len().saturating_sub(1);
        container.append_child((self.view)(&event.element, index));
    }

    fn array_element_removed(&self, event: &ArrayElementRemoved) {
        if event.array != self.array {
            return;
        }
        let Some(inner) = self.element.upgrade() else {
            return;
        };
        Element::from_inner(inner).remove_child(event.index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn user(name: &str) -> Object {
        let object = Object::new();
        object.insert("name", name);
        object
    }

    #[test]
    fn bind_syncs_initial_value() {
        let binder = Binder::new();
        let object = user("Ada");
        let input = Element::text_input();
        input.bind(&binder, &object, "name").unwrap();
        assert_eq!(input.text(), "Ada");
        assert!(input.is_bound());
    }

    #[test]
    fn edit_writes_model_and_updates_peers() {
        let binder = Binder::new();
        let object = user("a");
        let first = Element::text_input();
        let second = Element::text_input();
        first.bind(&binder, &object, "name").unwrap();
        second.bind(&binder, &object, "name").unwrap();

        first.enter_text("b").unwrap();
        assert_eq!(object.get("name"), Value::from("b"));
        assert_eq!(second.text(), "b");
        // The editing element is itself refreshed by the fan-out.
        assert_eq!(first.text(), "b");
    }

    #[test]
    fn model_write_updates_element() {
        let binder = Binder::new();
        let object = user("a");
        let input = Element::text_input();
        input.bind(&binder, &object, "name").unwrap();

        object.set("name", "z");
        assert_eq!(input.text(), "z");
    }

    #[test]
    fn empty_text_clears_the_property() {
        let binder = Binder::new();
        let object = user("a");
        let input = Element::text_input();
        input.bind(&binder, &object, "name").unwrap();

        input.enter_text("").unwrap();
        assert_eq!(object.get("name"), Value::Null);
    }

    #[test]
    fn checkbox_binds_booleans() {
        let binder = Binder::new();
        let object = Object::new();
        object.insert("offline", false);
        let checkbox = Element::checkbox();
        checkbox.bind(&binder, &object, "offline").unwrap();
        assert!(!checkbox.checked());

        checkbox.toggle(true).unwrap();
        assert_eq!(object.get("offline"), Value::Bool(true));

        object.set("offline", false);
        assert!(!checkbox.checked());
    }

    #[test]
    fn select_commits_on_change() {
        let binder = Binder::new();
        let object = Object::new();
        object.insert("greetings", "mr");
        let select = Element::select();
        select.bind(&binder, &object, "greetings").unwrap();
        assert_eq!(select.text(), "mr");

        select.choose("ms").unwrap();
        assert_eq!(object.get("greetings"), Value::from("ms"));
    }

    #[test]
    fn unbound_element_stops_updating() {
        let binder = Binder::new();
        let object = user("a");
        let input = Element::text_input();
        input.bind(&binder, &object, "name").unwrap();

        input.unbind();
        assert!(!input.is_bound());
        assert_eq!(binder.callback_count(&object, "name"), 0);

        object.set("name", "b");
        assert_eq!(input.text(), "a");

        // Unbind is idempotent.
        input.unbind();
    }

    #[test]
    fn rebind_never_double_registers() {
        let binder = Binder::new();
        let object = user("a");
        let input = Element::text_input();
        input.bind(&binder, &object, "name").unwrap();
        input.bind(&binder, &object, "name").unwrap();
        assert_eq!(binder.callback_count(&object, "name"), 1);

        let other = user("other");
        input.bind(&binder, &other, "name").unwrap();
        assert_eq!(binder.callback_count(&object, "name"), 0);
        assert_eq!(input.text(), "other");

        object.set("name", "ignored");
        assert_eq!(input.text(), "other");
    }

    #[test]
    fn reverse_registration_order_updates_last_bound_first() {
        let binder = Binder::new();
        let object = user("a");
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Element::text_input();
        let first_log = Rc::clone(&log);
        first
            .bind_mapped(
                &binder,
                &object,
                "name",
                None,
                Some(Rc::new(move |value: &Value| {
                    first_log.borrow_mut().push("e1");
                    value.clone()
                })),
            )
            .unwrap();

        let second = Element::text_input();
        let second_log = Rc::clone(&log);
        second
            .bind_mapped(
                &binder,
                &object,
                "name",
                None,
                Some(Rc::new(move |value: &Value| {
                    second_log.borrow_mut().push("e2");
                    value.clone()
                })),
            )
            .unwrap();

        log.borrow_mut().clear();
        object.set("name", "b");
        assert_eq!(*log.borrow(), vec!["e2", "e1"]);
    }

    #[test]
    fn transforms_map_both_directions() {
        let binder = Binder::new();
        let object = Object::new();
        object.insert("count", 2.0);
        let input = Element::text_input();
        input
            .bind_mapped(
                &binder,
                &object,
                "count",
                Some(Rc::new(|raw: &Value| {
                    let parsed = raw
                        .as_text()
                        .and_then(|text| text.parse::<f64>().ok())
                        .unwrap_or(0.0);
                    Value::Number(parsed)
                })),
                Some(Rc::new(|value: &Value| {
                    Value::Text(format!("n={}", value.display_text().unwrap_or_default()))
                })),
            )
            .unwrap();
        assert_eq!(input.text(), "n=2");

        input.enter_text("5").unwrap();
        assert_eq!(object.get("count"), Value::from(5.0));
        assert_eq!(input.text(), "n=5");
    }

    #[test]
    fn nested_path_binds_terminal_pair() {
        let binder = Binder::new();
        let root = Object::new();
        let address = Object::new();
        address.insert("city", "Paris");
        root.insert("address", address.clone());

        let input = Element::text_input();
        input.bind(&binder, &root, "address.city").unwrap();
        assert_eq!(input.text(), "Paris");

        input.enter_text("Lyon").unwrap();
        assert_eq!(address.get("city"), Value::from("Lyon"));

        address.set("city", "Nice");
        assert_eq!(input.text(), "Nice");
    }

    #[test]
    fn missing_path_fails_fast() {
        let binder = Binder::new();
        let input = Element::text_input();
        let err = input.bind(&binder, &Object::new(), "address.city").unwrap_err();
        assert!(matches!(err, BindError::MissingPath { .. }));
        assert!(!input.is_bound());
    }

    #[test]
    fn record_display_without_transform_fails_bind() {
        let binder = Binder::new();
        let object = Object::new();
        object.insert("owner", Object::new());

        let input = Element::text_input();
        let err = input.bind(&binder, &object, "owner").unwrap_err();
        assert_eq!(
            err,
            BindError::InvalidTransform {
                expected: "text",
                found: "record",
            }
        );
        // The partial binding was unwound.
        assert!(!input.is_bound());
        assert_eq!(binder.callback_count(&object, "owner"), 0);
    }

    #[test]
    fn text_into_list_property_splits_on_pipe() {
        let binder = Binder::new();
        let object = Object::new();
        object.insert("profiles", ObsArray::new());
        let input = Element::text_input();
        input.bind(&binder, &object, "profiles").unwrap();

        input.enter_text("user|admin").unwrap();
        let list = object.get("profiles");
        let list = list.as_list().expect("list value");
        assert_eq!(list.to_vec(), vec![Value::from("user"), Value::from("admin")]);
        // Fan-out rendered the list back as joined text.
        assert_eq!(input.text(), "user,admin");
    }

    #[test]
    fn bind_callback_tracks_every_dependency() {
        let binder = Binder::new();
        let a = Object::new();
        a.insert("x", 1.0);
        let b = Object::new();
        b.insert("y", 2.0);

        let output = Element::text_input();
        let (sum_a, sum_b) = (a.clone(), b.clone());
        let to_ui = Rc::new(move || {
            let x = match sum_a.get("x") {
                Value::Number(n) => n,
                _ => 0.0,
            };
            let y = match sum_b.get("y") {
                Value::Number(n) => n,
                _ => 0.0,
            };
            Value::Number(x + y)
        });
        output
            .bind_callback(
                &binder,
                Rc::new(|_| {}),
                to_ui,
                &[
                    Dependency::new(&a, ["x"]),
                    Dependency::new(&b, ["y"]),
                ],
            )
            .unwrap();
        assert_eq!(output.text(), "3");

        a.set("x", 10.0);
        assert_eq!(output.text(), "12");
        b.set("y", 30.0);
        assert_eq!(output.text(), "40");
    }

    #[test]
    fn bind_callback_routes_edits_to_model_closure() {
        let binder = Binder::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let input = Element::text_input();
        input
            .bind_callback(
                &binder,
                Rc::new(move |value: &Value| log.borrow_mut().push(value.clone())),
                Rc::new(|| Value::Null),
                &[],
            )
            .unwrap();

        input.enter_text("typed").unwrap();
        assert_eq!(*seen.borrow(), vec![Value::from("typed")]);
    }

    #[test]
    fn bind_text_applies_modifier() {
        let binder = Binder::new();
        let object = Object::new();
        object.insert("greetings", "mr");
        let cell = Element::generic();
        cell.bind_text(
            &binder,
            &object,
            "greetings",
            Some(Rc::new(|value: &Value| {
                Value::Text(match value.as_text() {
                    Some("mr") => "Mr".to_owned(),
                    Some("ms") => "Ms".to_owned(),
                    _ => String::new(),
                })
            })),
        )
        .unwrap();
        assert_eq!(cell.text(), "Mr");

        object.set("greetings", "ms");
        assert_eq!(cell.text(), "Ms");
    }

    #[test]
    fn bind_view_runs_arbitrary_display() {
        let binder = Binder::new();
        let object = Object::new();
        object.insert("offline", true);
        let cell = Element::generic();
        cell.bind_view(
            &binder,
            &object,
            "offline",
            Rc::new(|element: &Element, value: &Value| {
                element.clear_children();
                if value.is_truthy() {
                    element.append_child(Element::generic());
                }
            }),
        )
        .unwrap();
        assert_eq!(cell.child_count(), 1);

        object.set("offline", false);
        assert_eq!(cell.child_count(), 0);
    }

    fn text_child() -> ViewFactory {
        Rc::new(|value: &Value, _index: usize| {
            let child = Element::generic();
            child.set_text(value.display_text().unwrap_or_default());
            child
        })
    }

    fn rendered(container: &Element) -> Vec<String> {
        container.children().iter().map(Element::text).collect()
    }

    #[test]
    fn bind_array_renders_and_tracks_mutations() {
        let binder = Binder::new();
        let array = ObsArray::new();
        let container = Element::array_container();
        container.bind_array(&binder, &array, text_child()).unwrap();
        assert_eq!(container.child_count(), 0);

        array.push("x");
        array.push("y");
        assert_eq!(rendered(&container), vec!["x", "y"]);

        array.remove(0);
        assert_eq!(rendered(&container), vec!["y"]);
    }

    #[test]
    fn bind_array_renders_existing_elements() {
        let binder = Binder::new();
        let array = ObsArray::from_values(vec!["a".into(), "b".into()]);
        let container = Element::array_container();
        container.bind_array(&binder, &array, text_child()).unwrap();
        assert_eq!(rendered(&container), vec!["a", "b"]);
    }

    #[test]
    fn bind_array_survives_splices() {
        let binder = Binder::new();
        let array = ObsArray::from_values(vec![
            "a".into(),
            "b".into(),
            "c".into(),
            "d".into(),
            "e".into(),
        ]);
        let container = Element::array_container();
        container.bind_array(&binder, &array, text_child()).unwrap();

        array.splice(1, 3);
        assert_eq!(rendered(&container), vec!["a", "e"]);

        array.push("f");
        assert_eq!(rendered(&container), vec!["a", "e", "f"]);
    }

    #[test]
    fn unbound_container_stops_tracking() {
        let binder = Binder::new();
        let array = ObsArray::new();
        let container = Element::array_container();
        container.bind_array(&binder, &array, text_child()).unwrap();

        array.push("x");
        assert_eq!(container.child_count(), 1);

        container.unbind();
        array.push("y");
        assert_eq!(container.child_count(), 1);
    }

    #[test]
    fn autobind_walks_marked_subtree() {
        let binder = Binder::new();
        let root = Object::new();
        root.insert("name", "Ada");
        let address = Object::new();
        address.insert("city", "Paris");
        root.insert("address", address.clone());

        let tree = Element::generic();
        let input = Element::text_input().with_bind_path("name");
        let label = Element::generic().with_bind_path("address.city");
        let unmarked = Element::text_input();
        let row = Element::generic();
        row.append_child(label.clone());
        tree.append_child(input.clone());
        tree.append_child(row);
        tree.append_child(unmarked.clone());

        tree.autobind(&binder, &root).unwrap();
        assert_eq!(input.text(), "Ada");
        assert_eq!(label.text(), "Paris");
        assert!(!unmarked.is_bound());

        // Editable markers bind two-way, display markers one-way.
        input.enter_text("Grace").unwrap();
        assert_eq!(root.get("name"), Value::from("Grace"));
        address.set("city", "Lyon");
        assert_eq!(label.text(), "Lyon");
    }

    #[test]
    fn autobind_failure_unwinds_the_walk() {
        let binder = Binder::new();
        let root = Object::new();
        root.insert("name", "Ada");

        let tree = Element::generic();
        let input = Element::text_input().with_bind_path("name");
        let broken = Element::text_input().with_bind_path("missing.deep");
        tree.append_child(input.clone());
        tree.append_child(broken.clone());

        let err = tree.autobind(&binder, &root).unwrap_err();
        assert!(matches!(err, BindError::MissingPath { .. }));
        assert!(!input.is_bound());
        assert!(!broken.is_bound());
        assert_eq!(binder.callback_count(&root, "name"), 0);
    }

    #[test]
    fn two_containers_same_array_update_in_bus_order() {
        let binder = Binder::new();
        let array = ObsArray::new();
        let first = Element::array_container();
        let second = Element::array_container();
        first.bind_array(&binder, &array, text_child()).unwrap();
        second.bind_array(&binder, &array, text_child()).unwrap();

        array.push("x");
        assert_eq!(rendered(&first), vec!["x"]);
        assert_eq!(rendered(&second), vec!["x"]);
    }
}
