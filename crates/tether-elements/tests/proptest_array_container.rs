//! Property test: a bound array container's rendered children mirror
//! the array across arbitrary mutation sequences.

use std::rc::Rc;

use proptest::prelude::*;
use tether_core::{Binder, ObsArray, Value};
use tether_elements::{Element, ViewFactory};

#[derive(Clone, Debug)]
enum Op {
    Push(String),
    Remove(usize),
    Splice(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{1,4}".prop_map(Op::Push),
        (0usize..8).prop_map(Op::Remove),
        ((0usize..8), (0usize..4)).prop_map(|(index, len)| Op::Splice(index, len)),
    ]
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

proptest! {
    #[test]
    fn container_children_mirror_the_array(
        seed in proptest::collection::vec("[a-z]{1,4}", 0..6),
        ops in proptest::collection::vec(op_strategy(), 0..40),
    ) {
        let binder = Binder::new();
        let array = ObsArray::from_values(seed.iter().map(|s| Value::from(s.as_str())).collect());
        let container = Element::array_container();
        container.bind_array(&binder, &array, text_child()).unwrap();

        // Reference model mutated in lockstep.
        let mut model: Vec<String> = seed;
        prop_assert_eq!(&rendered(&container), &model);

        for op in ops {
            match op {
                Op::Push(text) => {
                    array.push(text.as_str());
                    model.push(text);
                }
                Op::Remove(index) => {
                    let removed = array.remove(index);
                    if index < model.len() {
                        let expected = model.remove(index);
                        prop_assert_eq!(removed, Some(Value::from(expected.as_str())));
                    } else {
                        prop_assert_eq!(removed, None);
                    }
                }
                Op::Splice(index, len) => {
                    let start = index.min(model.len());
                    let end = (start + len).min(model.len());
                    let expected: Vec<String> = model.drain(start..end).collect();
                    let removed = array.splice(index, len);
                    let removed: Vec<String> = removed
                        .iter()
                        .map(|value| value.display_text().unwrap_or_default())
                        .collect();
                    prop_assert_eq!(removed, expected);
                }
            }
            prop_assert_eq!(&rendered(&container), &model);
            prop_assert_eq!(array.len(), model.len());
        }
    }
}
