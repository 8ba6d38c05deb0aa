#![forbid(unsafe_code)]

//! Dynamic value model shared by the whole engine.
//!
//! [`Value`] is the tagged union flowing through every binding: leaf
//! scalars plus handles to shared [`Object`](crate::Object) and
//! [`ObsArray`](crate::ObsArray) nodes. Cloning a `Value` is cheap for
//! the handle variants (reference-counted) and a content copy for text.
//!
//! Identity is explicit: every object and array carries a process-unique
//! id assigned at construction. Ids are the map keys everywhere the
//! engine needs reference identity (trigger record, listener registry),
//! so lookups are O(1) instead of linear reference-equality scans.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::array::ObsArray;
use crate::error::BindError;
use crate::object::Object;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Process-unique identity of an [`Object`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Process-unique identity of an [`ObsArray`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(pub(crate) u64);

impl std::fmt::Display for ArrayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "array#{}", self.0)
    }
}

/// A dynamically typed model value.
///
/// `Null` doubles as "absent": reading a field an object does not have
/// yields `Null`, and writing `Null` models clearing the field.
#[derive(Clone, Debug)]
pub enum Value {
    /// Absent or cleared.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(f64),
    /// Text scalar.
    Text(String),
    /// Handle to a shared array.
    List(ObsArray),
    /// Handle to a shared object.
    Record(Object),
}

impl Value {
    /// Static name of the variant, used in error payloads.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }

    /// Truthiness with the coercion rules the adapters rely on:
    /// `Null` and empty text are false, handles are always true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::List(_) | Self::Record(_) => true,
        }
    }

    /// Render the value for a text-like element.
    ///
    /// `Null` renders empty, lists join their elements with `,`. A
    /// record has no defensible text form, so rendering one without an
    /// explicit transform is an [`BindError::InvalidTransform`].
    pub fn display_text(&self) -> Result<String, BindError> {
        match self {
            Self::Null => Ok(String::new()),
            Self::Bool(b) => Ok(b.to_string()),
            Self::Number(n) => Ok(format_number(*n)),
            Self::Text(s) => Ok(s.clone()),
            Self::List(list) => {
                let mut parts = Vec::with_capacity(list.len());
                for item in list.to_vec() {
                    parts.push(item.display_text()?);
                }
                Ok(parts.join(","))
            }
            Self::Record(_) => Err(BindError::InvalidTransform {
                expected: "text",
                found: "record",
            }),
        }
    }

    /// The list handle, if this value is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&ObsArray> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// The record handle, if this value is one.
    #[must_use]
    pub fn as_record(&self) -> Option<&Object> {
        match self {
            Self::Record(object) => Some(object),
            _ => None,
        }
    }

    /// The text content, if this value is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Scalars compare by content, handles by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a.id() == b.id(),
            (Self::Record(a), Self::Record(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<ObsArray> for Value {
    fn from(list: ObsArray) -> Self {
        Self::List(list)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Record(object)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
