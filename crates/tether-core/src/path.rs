#![forbid(unsafe_code)]

//! Dotted property-path resolution.
//!
//! `"address.city"` walks record segments from the root and yields the
//! terminal (object, property) pair. Resolution is fail-fast: a segment
//! that is absent or not a record is a [`BindError::MissingPath`];
//! paths are never auto-vivified.

use crate::error::BindError;
use crate::object::Object;
use crate::value::Value;

/// Resolve `path` against `root` to the object holding the terminal
/// property and that property's name.
pub fn resolve_path(root: &Object, path: &str) -> Result<(Object, String), BindError> {
    let missing = |segment: &str| BindError::MissingPath {
        path: path.to_owned(),
        segment: segment.to_owned(),
    };
    let mut segments = path.split('.').collect::<Vec<_>>();
    let last = segments.pop().filter(|segment| !segment.is_empty());
    let Some(property) = last else {
        return Err(missing(path));
    };
    let mut current = root.clone();
    for segment in segments {
        match current.get(segment) {
            Value::Record(object) => current = object,
            _ => return Err(missing(segment)),
        }
    }
    Ok((current, property.to_owned()))
}
