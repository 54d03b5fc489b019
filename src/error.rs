//! Error types for magic-identify.
//!
//! Classifiers never hand these to their callers: each public classifier
//! operation matches on the error and substitutes its sentinel result. They
//! exist so the failure kind is explicit internally and in diagnostic events.

use std::fmt;
use thiserror::Error;

/// Which configuration a content-signature backend was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMode {
    /// Emit MIME types (`application/x-pie-executable`).
    Mime,
    /// Emit a human-oriented description (`ELF executable`).
    Description,
}

impl fmt::Display for SignatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureMode::Mime => write!(f, "mime"),
            SignatureMode::Description => write!(f, "description"),
        }
    }
}

/// Main error type for identification internals.
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// File I/O errors (missing file, permission denied, directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file had no first line to inspect
    #[error("File is empty")]
    EmptyFile,

    /// First line does not start with `#`
    #[error("No interpreter directive")]
    NoDirective,

    /// First line starts with `#` but names no usable interpreter
    #[error("Malformed interpreter directive: {0}")]
    MalformedDirective(String),

    /// Signature backend could not be constructed
    #[error("Signature backend unavailable in {mode} mode: {reason}")]
    BackendUnavailable { mode: SignatureMode, reason: String },

    /// A user-supplied magic rule could not be compiled
    #[error("Invalid magic rule #{index}: {reason}")]
    InvalidMagicRule { index: usize, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for identification internals
pub type Result<T> = std::result::Result<T, IdentifyError>;
