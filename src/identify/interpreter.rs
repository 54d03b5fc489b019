//! Interpreter directive (`#!`) classification.

use crate::core::classification::{Classification, UNKNOWN};
use crate::error::{IdentifyError, Result};
use crate::identify::config::IOConfig;
use crate::identify::events::{EventSink, IdentifyEvent};
use crate::identify::io::SafeFileReader;
use crate::identify::tags::TagLookup;
use std::path::Path;
use std::sync::Arc;

/// First tokens that defer to the next token for the real interpreter.
const ENV_FORMS: &[&str] = &["#!/usr/bin/env", "#!/bin/env"];

/// Extract the bare interpreter name from a first line.
///
/// The line must start with `#`. `env` indirection is resolved, the two
/// directive characters are dropped and any directory part is stripped, so
/// `#!/usr/bin/env python3` and `#!/usr/bin/python3` both give `python3`.
/// A `#` line naming nothing (`# comment`) yields an empty name.
pub fn parse_directive(line: &str) -> Result<String> {
    if !line.starts_with('#') {
        return Err(IdentifyError::NoDirective);
    }
    let mut parts = line.split_whitespace();
    let first = parts.next().unwrap_or_default();

    let directive = if ENV_FORMS.contains(&first) {
        let real = parts
            .next()
            .ok_or_else(|| IdentifyError::MalformedDirective(line.to_string()))?;
        format!("#!{real}")
    } else {
        first.to_string()
    };

    let interpreter = directive.get(2..).unwrap_or_default();
    let bare = interpreter.rsplit('/').next().unwrap_or_default();
    Ok(bare.to_string())
}

/// Classifies scripts by the interpreter named on their first line.
pub struct InterpreterClassifier {
    tags: Arc<dyn TagLookup>,
    max_line_length: usize,
    sink: Arc<dyn EventSink>,
}

impl InterpreterClassifier {
    pub fn new(tags: Arc<dyn TagLookup>, io: &IOConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            tags,
            max_line_length: io.max_line_length,
            sink,
        }
    }

    /// Never fails: unreadable files and lines without a directive give
    /// `("unknown", "unknown")`.
    pub fn classify(&self, path: &Path) -> Classification {
        match self.try_classify(path) {
            Ok(result) => result,
            Err(e) => {
                self.sink.emit(IdentifyEvent::InterpreterFailed {
                    path: path.display().to_string(),
                    error: e.to_string(),
                });
                Classification::unknown()
            }
        }
    }

    fn try_classify(&self, path: &Path) -> Result<Classification> {
        let line = SafeFileReader::open(path)?.first_line(self.max_line_length)?;
        let interpreter = parse_directive(&line)?;

        let mut tags = self.tags.tags_from_interpreter(&interpreter);
        if tags.is_empty() {
            tags.push(UNKNOWN.to_string());
        }
        self.sink.emit(IdentifyEvent::InterpreterResolved {
            path: path.display().to_string(),
            interpreter,
            tags: tags.clone(),
        });

        Ok(Classification::new(
            tags.join("/"),
            format!("text/x-{}", tags[0]),
        ))
    }
}
