//! Interpreter name to classification tag lookup.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Maps a bare interpreter name (`python3`, `bash`) to zero or more tags.
pub trait TagLookup: Send + Sync {
    fn tags_from_interpreter(&self, interpreter: &str) -> Vec<String>;
}

/// Built-in interpreter table, primary tag first.
const INTERPRETERS: &[(&str, &[&str])] = &[
    ("ash", &["shell", "ash"]),
    ("awk", &["awk"]),
    ("bash", &["shell", "bash"]),
    ("bats", &["shell", "bash", "bats"]),
    ("cbsd", &["shell", "cbsd"]),
    ("csh", &["shell", "csh"]),
    ("dash", &["shell", "dash"]),
    ("expect", &["expect"]),
    ("ksh", &["shell", "ksh"]),
    ("node", &["javascript"]),
    ("nodejs", &["javascript"]),
    ("perl", &["perl"]),
    ("php", &["php"]),
    ("php7", &["php", "php7"]),
    ("php8", &["php", "php8"]),
    ("python", &["python"]),
    ("python2", &["python", "python2"]),
    ("python3", &["python", "python3"]),
    ("ruby", &["ruby"]),
    ("sh", &["shell", "sh"]),
    ("tcsh", &["shell", "tcsh"]),
    ("zsh", &["shell", "zsh"]),
];

static BUILTIN: OnceLock<HashMap<&'static str, &'static [&'static str]>> = OnceLock::new();

fn builtin_table() -> &'static HashMap<&'static str, &'static [&'static str]> {
    BUILTIN.get_or_init(|| INTERPRETERS.iter().copied().collect())
}

/// The built-in table layered under configured extras.
#[derive(Debug, Clone, Default)]
pub struct BuiltinTags {
    extra: BTreeMap<String, Vec<String>>,
}

impl BuiltinTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extras win over built-in entries of the same name.
    pub fn with_extra(extra: BTreeMap<String, Vec<String>>) -> Self {
        Self { extra }
    }

    fn exact(&self, name: &str) -> Option<Vec<String>> {
        // Blank or multi-word extras are dropped; an entry left with no tags still
        // claims the name and resolves to nothing.
        if let Some(tags) = self.extra.get(name) {
            return Some(
                tags.iter()
                    .filter(|t| !t.is_empty() && !t.contains(char::is_whitespace))
                    .cloned()
                    .collect(),
            );
        }
        builtin_table()
            .get(name)
            .map(|tags| tags.iter().map(|t| t.to_string()).collect())
    }
}

impl TagLookup for BuiltinTags {
    /// Directory components are ignored; versioned names fall back to their
    /// shorter forms (`python3.11.2` -> `python3.11` -> `python3`).
    fn tags_from_interpreter(&self, interpreter: &str) -> Vec<String> {
        let mut name = interpreter.rsplit('/').next().unwrap_or_default();
        while !name.is_empty() {
            if let Some(tags) = self.exact(name) {
                return tags;
            }
            name = match name.rfind('.') {
                Some(dot) => &name[..dot],
                None => "",
            };
        }
        Vec::new()
    }
}
