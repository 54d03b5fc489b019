//! Keyword-frequency heuristic for shell scripts without a `#!` line.
//!
//! Catches dropper/downloader scripts that skip the interpreter directive.
//! This is a crude score, not a parser: a file is called an unmarked shell
//! script once enough exact keyword tokens appear anywhere in it.

use crate::core::classification::Classification;
use crate::error::Result;
use crate::identify::config::{HeuristicsConfig, IOConfig};
use crate::identify::events::{EventSink, IdentifyEvent};
use crate::identify::io::SafeFileReader;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

pub const UNMARKED_SHELL_LABEL: &str = "unmarked shell";
pub const SHELLSCRIPT_MIME: &str = "text/x-shellscript";

/// Token separators: Unicode whitespace plus the ASCII information
/// separators `\x1c`..`\x1f`.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Count whitespace-delimited tokens that exactly equal a keyword.
///
/// Invalid UTF-8 is replaced rather than rejected, so binary-ish content is
/// still tokenized. `disarmed` never counts as `arm`.
pub fn count_markers<R: BufRead>(reader: R, keywords: &HashSet<Vec<u8>>) -> std::io::Result<usize> {
    let mut markers = 0usize;
    for line in reader.split(b'\n') {
        let line = line?;
        markers += String::from_utf8_lossy(&line)
            .split(is_separator)
            .filter(|token| !token.is_empty() && keywords.contains(token.as_bytes()))
            .count();
    }
    Ok(markers)
}

/// Scores files against a fixed shell/administration vocabulary.
pub struct HeuristicScriptClassifier {
    keywords: HashSet<Vec<u8>>,
    threshold: usize,
    max_scan_bytes: u64,
    sink: Arc<dyn EventSink>,
}

impl HeuristicScriptClassifier {
    pub fn new(config: &HeuristicsConfig, io: &IOConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            keywords: config
                .keywords
                .iter()
                .map(|k| k.as_bytes().to_vec())
                .collect(),
            threshold: config.threshold,
            max_scan_bytes: io.max_scan_bytes,
            sink,
        }
    }

    /// Never fails: unreadable files give `("unknown", "unknown")`.
    pub fn classify(&self, path: &Path) -> Classification {
        match self.try_count(path) {
            Ok(markers) => {
                self.sink.emit(IdentifyEvent::HeuristicScored {
                    path: path.display().to_string(),
                    markers,
                    threshold: self.threshold,
                });
                if markers > self.threshold {
                    Classification::new(UNMARKED_SHELL_LABEL, SHELLSCRIPT_MIME)
                } else {
                    Classification::unknown()
                }
            }
            Err(e) => {
                self.sink.emit(IdentifyEvent::HeuristicFailed {
                    path: path.display().to_string(),
                    error: e.to_string(),
                });
                Classification::unknown()
            }
        }
    }

    fn try_count(&self, path: &Path) -> Result<usize> {
        let reader = SafeFileReader::open(path)?.into_bounded_lines(self.max_scan_bytes);
        Ok(count_markers(reader, &self.keywords)?)
    }
}
