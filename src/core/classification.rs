//! The `(label, mime_type)` pair every classifier produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label and MIME used when a classifier ran but could not decide.
pub const UNKNOWN: &str = "unknown";
/// Label used when the signature backend produced nothing at all.
pub const NOT_FOUND: &str = "Not Found";
/// MIME sentinel paired with [`NOT_FOUND`].
pub const MISSING: &str = "missing";
/// Generic signature answers that carry too little information on their own.
pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A fully-populated classification: a human-oriented label and a MIME type.
///
/// `label` may equal `mime` (signature results), be a `/`-joined tag list
/// (interpreter results) or one of the fixed literals above.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub mime: String,
}

impl Classification {
    pub fn new(label: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            mime: mime.into(),
        }
    }

    /// `("unknown", "unknown")`
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    /// `("Not Found", "missing")`
    pub fn not_found() -> Self {
        Self::new(NOT_FOUND, MISSING)
    }

    /// A raw signature string doubles as its own MIME identifier.
    pub fn from_signature(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            mime: text,
        }
    }

    /// True when the classifier could not decide. Only the label is checked:
    /// an interpreter directive with no known tags yields
    /// `("unknown", "text/x-unknown")`, which is still undecided.
    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN
    }

    /// True when the signature backend produced no output.
    pub fn is_missing(&self) -> bool {
        self.mime == MISSING
    }

    /// Plain text, a generic octet stream, or an outright failure.
    pub fn is_boring(&self) -> bool {
        self.label == TEXT_PLAIN || self.label == OCTET_STREAM || self.is_missing()
    }

    /// Borrowing tuple view, handy for comparisons in callers and tests.
    pub fn as_pair(&self) -> (&str, &str) {
        (&self.label, &self.mime)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.label, self.mime)
    }
}

impl From<(&str, &str)> for Classification {
    fn from((label, mime): (&str, &str)) -> Self {
        Self::new(label, mime)
    }
}
