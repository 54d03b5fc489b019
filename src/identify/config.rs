//! Configuration for the identification cascade.
//!
//! Provides centralized configuration for all classifiers with sensible
//! defaults. Every section carries `#[serde(default)]` so a partial JSON file
//! only overrides what it names.

use crate::error::{IdentifyError, Result, SignatureMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Master configuration, fixed once handed to [`crate::MagicIdentify`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifyConfig {
    /// Short-circuit to the interpreter classifier.
    pub prefer_identify: bool,
    /// Short-circuit to the signature classifier (ignored if `prefer_identify`).
    pub prefer_magic: bool,
    /// I/O bounds for file reading.
    pub io: IOConfig,
    /// Content-signature backend configuration.
    pub signature: SignatureConfig,
    /// Extra interpreter-name to tag mappings.
    pub interpreters: InterpreterConfig,
    /// Keyword heuristic tuning.
    pub heuristics: HeuristicsConfig,
}

impl IdentifyConfig {
    pub fn new(prefer_identify: bool, prefer_magic: bool) -> Self {
        Self {
            prefer_identify,
            prefer_magic,
            ..Self::default()
        }
    }

    /// Parse configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject settings that would make a classifier meaningless.
    ///
    /// Magic rules are deliberately not checked here: a bad rule degrades the
    /// signature backend instead of refusing the whole configuration.
    pub fn validate(&self) -> Result<()> {
        self.io.validate()?;
        self.interpreters.validate()?;
        self.heuristics.validate()
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

/// I/O configuration for file reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IOConfig {
    /// Prefix handed to the signature backend (default: 65536).
    pub max_sniff_size: usize,
    /// Longest first line the interpreter classifier reads (default: 4096).
    pub max_line_length: usize,
    /// Maximum bytes scanned by the keyword heuristic (default: 10485760 = 10MB).
    pub max_scan_bytes: u64,
}

impl IOConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_sniff_size == 0 {
            return Err(IdentifyError::Config(
                "io.max_sniff_size must be non-zero".to_string(),
            ));
        }
        if self.max_line_length == 0 {
            return Err(IdentifyError::Config(
                "io.max_line_length must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for IOConfig {
    fn default() -> Self {
        Self {
            max_sniff_size: 65536,
            max_line_length: 4096,
            max_scan_bytes: 10 * 1024 * 1024,
        }
    }
}

/// A user-supplied byte signature consulted before the built-in ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicRule {
    /// Byte offset at which `pattern` must appear.
    #[serde(default)]
    pub offset: usize,
    /// Hex-encoded bytes, e.g. `"cafebabe"`.
    pub pattern: String,
    /// MIME type reported on a match.
    pub mime: String,
    /// Description reported in description mode (defaults to `mime`).
    #[serde(default)]
    pub description: Option<String>,
}

/// Content-signature backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Preferred construction mode (default: mime).
    pub mode: SignatureMode,
    /// Extra rules, checked in order before built-in signatures.
    pub extra_rules: Vec<MagicRule>,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            mode: SignatureMode::Mime,
            extra_rules: Vec::new(),
        }
    }
}

/// Interpreter tag table extensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Interpreter name to tags, primary tag first. Overrides built-ins.
    pub extra: BTreeMap<String, Vec<String>>,
}

impl InterpreterConfig {
    /// Names and tags end up in labels and MIME subtypes, so each must be a
    /// single non-empty token and every name needs at least one tag.
    pub fn validate(&self) -> Result<()> {
        for (name, tags) in &self.extra {
            if !is_token(name) {
                return Err(IdentifyError::Config(format!(
                    "interpreters.extra: invalid interpreter name {name:?}"
                )));
            }
            if tags.is_empty() || !tags.iter().all(|t| is_token(t)) {
                return Err(IdentifyError::Config(format!(
                    "interpreters.extra[{name:?}]: tags must be single non-empty tokens"
                )));
            }
        }
        Ok(())
    }
}

/// Default shell/administration vocabulary for headerless scripts.
pub const DEFAULT_SH_KEYWORDS: &[&str] = &[
    "wget", "curl", "chmod", "rm", "cd", "mips", "arm", "sh", "apt", "dpkg", "sudo", "mkdir",
    "alias", "fi", "else",
];

/// Keyword heuristic configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Exact tokens counted as shell markers.
    pub keywords: Vec<String>,
    /// A file is an unmarked shell script once markers exceed this (default: 3).
    pub threshold: usize,
}

impl HeuristicsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.keywords.iter().all(|k| is_token(k)) {
            return Err(IdentifyError::Config(
                "heuristics.keywords must be single non-empty tokens".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_SH_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            threshold: 3,
        }
    }
}
