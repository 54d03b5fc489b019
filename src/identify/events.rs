//! Diagnostic events emitted by the classifiers and the arbiter.
//!
//! Decision logic reports what happened through an [`EventSink`] instead of
//! calling a logger directly. [`TracingSink`] is the default and forwards to
//! `tracing`; [`RecordingSink`] keeps events in memory.

use crate::error::SignatureMode;
use crate::identify::arbiter::Strategy;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace, warn};

/// Something a classifier or the arbiter wants to report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum IdentifyEvent {
    /// Preferred backend construction failed; a fallback mode is being tried.
    BackendDegraded { mode: SignatureMode, reason: String },
    /// No backend could be constructed; signature lookups are inert.
    BackendUnavailable { mode: SignatureMode, reason: String },
    /// A configuration section failed validation and its defaults were used.
    ConfigRejected { section: String, reason: String },
    /// The signature backend could not read or describe the file.
    SignatureFailed { path: String, error: String },
    /// The signature backend ran but produced no text.
    SignatureEmpty { path: String },
    /// The interpreter classifier could not decide.
    InterpreterFailed { path: String, error: String },
    /// A directive was parsed and looked up.
    InterpreterResolved {
        path: String,
        interpreter: String,
        tags: Vec<String>,
    },
    /// The heuristic classifier could not read the file.
    HeuristicFailed { path: String, error: String },
    /// The heuristic classifier finished scanning.
    HeuristicScored {
        path: String,
        markers: usize,
        threshold: usize,
    },
    /// A strategy's answer was too generic; the cascade moves on.
    Fallthrough { path: String, strategy: Strategy },
    /// The arbiter settled on an answer.
    Decided {
        path: String,
        strategy: Strategy,
        fallback: bool,
    },
}

/// Receiver for diagnostic events. Implementations must tolerate concurrent
/// callers since one arbiter may be shared across threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: IdentifyEvent);
}

/// Forwards events to the global `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: IdentifyEvent) {
        match event {
            IdentifyEvent::BackendDegraded { mode, reason } => {
                warn!(%mode, %reason, "signature backend construction failed, degrading");
            }
            IdentifyEvent::BackendUnavailable { mode, reason } => {
                warn!(%mode, %reason, "no signature backend available");
            }
            IdentifyEvent::ConfigRejected { section, reason } => {
                warn!(%section, %reason, "invalid configuration section, using defaults");
            }
            IdentifyEvent::SignatureFailed { path, error } => {
                debug!(%path, %error, "signature exception");
            }
            IdentifyEvent::SignatureEmpty { path } => {
                debug!(%path, "signature backend found nothing");
            }
            IdentifyEvent::InterpreterFailed { path, error } => {
                debug!(%path, %error, "failed to read/identify interpreter");
            }
            IdentifyEvent::InterpreterResolved {
                path,
                interpreter,
                tags,
            } => {
                trace!(%path, %interpreter, ?tags, "interpreter resolved");
            }
            IdentifyEvent::HeuristicFailed { path, error } => {
                debug!(%path, %error, "failed to scan for shell markers");
            }
            IdentifyEvent::HeuristicScored {
                path,
                markers,
                threshold,
            } => {
                debug!(%path, markers, threshold, "shell markers counted");
            }
            IdentifyEvent::Fallthrough { path, strategy } => {
                debug!(%path, ?strategy, "result was boring, trying next strategy");
            }
            IdentifyEvent::Decided {
                path,
                strategy,
                fallback,
            } => {
                debug!(%path, ?strategy, fallback, "identification decided");
            }
        }
    }
}

/// Collects events in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<IdentifyEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<IdentifyEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: IdentifyEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// The sink used when none is injected.
pub fn default_sink() -> Arc<dyn EventSink> {
    Arc::new(TracingSink)
}
