#![forbid(unsafe_code)]

//! The validation contract.
//!
//! The engine never interprets a schema language of its own. A host
//! supplies something implementing [`Schema`]: given the current values
//! snapshot it returns either parsed data or a list of issues, each
//! carrying a structured path and a message. Everything downstream
//! (error map, focus, per-item extraction) depends only on this shape.

use std::fmt;

use serde_json::Value;

use crate::path::{PathSegment, dot_join};
use crate::store::FormValues;

/// A single validation issue reported by a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Structured path to the offending field (empty = form-level).
    pub path: Vec<PathSegment>,
    /// Human-readable message.
    pub message: String,
}

impl Issue {
    /// Create an issue at the given path.
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Convenience for a top-level field issue.
    pub fn at(field: &str, message: impl Into<String>) -> Self {
        Self::new(vec![PathSegment::key(field)], message)
    }

    /// The dot-joined form of the path, as used by the error map.
    pub fn dot_path(&self) -> String {
        dot_join(&self.path)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dot_path(), self.message)
    }
}

/// A pluggable validator.
///
/// `parse` receives the live values snapshot and returns either the
/// parsed (possibly coerced) data or every issue found. Issues are
/// reported in schema order; the engine preserves that order when it
/// builds the error map and picks the first error to focus.
pub trait Schema {
    /// Validate and parse a values snapshot.
    fn parse(&self, values: &FormValues) -> Result<Value, Vec<Issue>>;
}

impl<F> Schema for F
where
    F: Fn(&FormValues) -> Result<Value, Vec<Issue>>,
{
    fn parse(&self, values: &FormValues) -> Result<Value, Vec<Issue>> {
        self(values)
    }
}
