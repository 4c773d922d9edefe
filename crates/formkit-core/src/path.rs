#![forbid(unsafe_code)]

//! Dot-path field addressing.
//!
//! Every field in a form is identified by a dot-joined path such as
//! `"title"` or `"creators.1.role"` (the `role` subfield of the second
//! item of the array field `creators`). Validation issues, the error map,
//! the touched set, and focus requests all share this one convention, so
//! the join/split rules live here and nowhere else.

use std::fmt;

/// One segment of a field path: a named key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key, e.g. `creators`.
    Key(String),
    /// Array index, e.g. `1`.
    Index(usize),
}

impl PathSegment {
    /// Create a key segment.
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        Self::Key(s.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

/// Join path segments into a dot-path string.
///
/// This is the canonical mapping from a validation issue's structured
/// path to the flat key used by the error map and focus driver.
///
/// ```
/// use formkit_core::path::{dot_join, PathSegment};
///
/// let path = dot_join(&[
///     PathSegment::key("creators"),
///     PathSegment::Index(1),
///     PathSegment::key("role"),
/// ]);
/// assert_eq!(path, "creators.1.role");
/// ```
pub fn dot_join(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        match seg {
            PathSegment::Key(k) => out.push_str(k),
            PathSegment::Index(n) => out.push_str(&n.to_string()),
        }
    }
    out
}

/// The item prefix for array-scoped error extraction: `"<name>.<index>."`.
pub fn item_prefix(name: &str, index: usize) -> String {
    format!("{name}.{index}.")
}

/// Whether `path` is scoped to the array field `name`: either the bare
/// array name (an array-level error) or any indexed subpath.
pub fn is_array_scoped(path: &str, name: &str) -> bool {
    path == name
        || path
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('.'))
}
