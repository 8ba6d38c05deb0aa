#![forbid(unsafe_code)]

//! Error taxonomy for binding setup and dispatch.
//!
//! Setup errors (`MissingPath`, `InvalidTransform`, `AlreadyBound`) fail
//! fast and synchronously at bind time. Dispatch-time failures inside a
//! listener never abort fan-out to the remaining listeners: the registry
//! logs them and continues.

use crate::value::{ArrayId, ObjectId};

/// Errors raised by the binding engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A property path segment did not resolve to a record.
    MissingPath {
        /// The full path that was being resolved.
        path: String,
        /// The segment that failed to resolve.
        segment: String,
    },
    /// A value could not be converted for its target without a transform.
    InvalidTransform {
        /// What the target side required.
        expected: &'static str,
        /// The value type actually produced.
        found: &'static str,
    },
    /// The array is already owned by a different (object, property) pair.
    AlreadyBound {
        /// The array whose interception was being installed.
        array: ArrayId,
        /// The property name of the existing owner.
        property: String,
    },
    /// `unlisten` found no matching callback for the pair.
    UnknownListener {
        /// The object the callback was expected on.
        object: ObjectId,
        /// The property the callback was expected on.
        property: String,
    },
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPath { path, segment } => {
                write!(f, "path '{path}' does not resolve: segment '{segment}' is missing or not a record")
            }
            Self::InvalidTransform { expected, found } => {
                write!(f, "cannot convert {found} into {expected} without a transform")
            }
            Self::AlreadyBound { array, property } => {
                write!(f, "array {array} is already bound to property '{property}'")
            }
            Self::UnknownListener { object, property } => {
                write!(f, "no listener registered for {object}.{property}")
            }
        }
    }
}

impl std::error::Error for BindError {}
