#![forbid(unsafe_code)]

//! Acceptance rules for file-valued fields.
//!
//! A host describes what a file field accepts with a comma-separated
//! MIME list (`"image/png, image/*"`) and an optional byte-size ceiling.
//! Violations produce a local, field-scoped message that pre-empts any
//! store-level error for the field until the file is replaced or cleared
//! (see [`crate::binding::display_errors`]).

use std::fmt;

/// One pattern from an accept list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MimePattern {
    /// Exact match, e.g. `image/png`.
    Exact(String),
    /// Type wildcard, e.g. `image/*` (matches any subtype of `image`).
    Wildcard(String),
}

impl MimePattern {
    fn matches(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        match self {
            Self::Exact(pat) => mime == *pat,
            Self::Wildcard(ty) => mime
                .split_once('/')
                .is_some_and(|(t, _)| t == ty.as_str()),
        }
    }
}

/// Acceptance rules for one file field.
#[derive(Debug, Clone, Default)]
pub struct FileRules {
    accept: Vec<MimePattern>,
    max_bytes: Option<u64>,
}

impl FileRules {
    /// Rules that accept anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated MIME list. Entries are trimmed and
    /// lowercased; empty entries are skipped. `type/*` entries match any
    /// subtype of `type`.
    pub fn with_accept(mut self, accept: &str) -> Self {
        self.accept = accept
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_suffix("/*") {
                Some(ty) => MimePattern::Wildcard(ty.to_string()),
                None => MimePattern::Exact(s),
            })
            .collect();
        self
    }

    /// Set the byte-size ceiling.
    pub fn with_max_bytes(mut self, max: u64) -> Self {
        self.max_bytes = Some(max);
        self
    }

    /// Check a candidate file. Type is checked before size, so a file
    /// that violates both reports the type violation.
    pub fn check(&self, mime: &str, size_bytes: u64) -> Result<(), FileRuleViolation> {
        if !self.accept.is_empty() && !self.accept.iter().any(|p| p.matches(mime)) {
            return Err(FileRuleViolation::UnsupportedType {
                mime: mime.to_string(),
            });
        }
        if let Some(max) = self.max_bytes
            && size_bytes > max
        {
            return Err(FileRuleViolation::TooLarge {
                size_bytes,
                max_bytes: max,
            });
        }
        Ok(())
    }
}

/// Why a file was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRuleViolation {
    /// The MIME type matched no accept pattern.
    UnsupportedType {
        /// The rejected type as supplied by the host.
        mime: String,
    },
    /// The file exceeds the byte ceiling.
    TooLarge {
        /// Actual size.
        size_bytes: u64,
        /// The configured ceiling.
        max_bytes: u64,
    },
}

impl fmt::Display for FileRuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType { mime } => {
                write!(f, "File type {mime} is not supported")
            }
            Self::TooLarge {
                size_bytes,
                max_bytes,
            } => {
                write!(
                    f,
                    "File is too large ({size_bytes} bytes, limit {max_bytes})"
                )
            }
        }
    }
}

impl std::error::Error for FileRuleViolation {}
