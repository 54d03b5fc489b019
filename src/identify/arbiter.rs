//! The cooperative decision procedure over the three classifiers.
//!
//! Preference order in the default cascade: content signature, then
//! interpreter directive, then the keyword heuristic. A signature answer is
//! only trusted on its own when it is not boring (`text/plain`,
//! `application/octet-stream`, or missing). If every strategy comes up
//! empty the original signature answer is returned, so there is always a
//! result.

use crate::core::classification::Classification;
use crate::error::Result;
use crate::identify::config::{HeuristicsConfig, IOConfig, IdentifyConfig, InterpreterConfig};
use crate::identify::events::{default_sink, EventSink, IdentifyEvent};
use crate::identify::heuristic::HeuristicScriptClassifier;
use crate::identify::interpreter::InterpreterClassifier;
use crate::identify::signature::{InferFactory, SignatureClassifier, SignatureFactory};
use crate::identify::tags::{BuiltinTags, TagLookup};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Which classifier produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Signature,
    Interpreter,
    Heuristic,
}

/// The outcome of one identification together with the evidence consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifyReport {
    pub path: String,
    pub result: Classification,
    /// Strategy whose answer was returned.
    pub strategy: Strategy,
    /// True when nothing beat a boring signature answer.
    pub fallback: bool,
    /// Individual results, present only for strategies that actually ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<Classification>,
}

impl IdentifyReport {
    fn new(path: &Path, strategy: Strategy, result: Classification) -> Self {
        Self {
            path: path.display().to_string(),
            result,
            strategy,
            fallback: false,
            signature: None,
            interpreter: None,
            heuristic: None,
        }
    }
}

/// Combines signature, interpreter and heuristic classification.
///
/// Configuration is fixed at construction and no state is kept between
/// calls, so one instance can serve concurrent callers.
pub struct MagicIdentify {
    prefer_identify: bool,
    prefer_magic: bool,
    signature: SignatureClassifier,
    interpreter: InterpreterClassifier,
    heuristic: HeuristicScriptClassifier,
    sink: Arc<dyn EventSink>,
}

impl Default for MagicIdentify {
    fn default() -> Self {
        Self::new(IdentifyConfig::default())
    }
}

impl MagicIdentify {
    /// Invalid configuration sections are replaced by their defaults.
    pub fn new(config: IdentifyConfig) -> Self {
        Self::builder(config).build()
    }

    /// Like [`MagicIdentify::new`] but refuses an invalid configuration.
    pub fn try_new(config: IdentifyConfig) -> Result<Self> {
        Self::builder(config).try_build()
    }

    /// Builder for injecting capabilities and the event sink.
    pub fn builder(config: IdentifyConfig) -> MagicIdentifyBuilder {
        MagicIdentifyBuilder {
            config,
            factory: None,
            tags: None,
            sink: None,
        }
    }

    pub fn prefers_identify(&self) -> bool {
        self.prefer_identify
    }

    pub fn prefers_magic(&self) -> bool {
        self.prefer_magic
    }

    pub fn signature_classifier(&self) -> &SignatureClassifier {
        &self.signature
    }

    /// Identify a file to the best of our cooperative ability.
    pub fn identify<P: AsRef<Path>>(&self, path: P) -> Classification {
        self.identify_report(path).result
    }

    pub fn classify_by_signature<P: AsRef<Path>>(&self, path: P) -> Classification {
        self.signature.classify(path.as_ref())
    }

    pub fn classify_by_interpreter<P: AsRef<Path>>(&self, path: P) -> Classification {
        self.interpreter.classify(path.as_ref())
    }

    pub fn classify_by_heuristic<P: AsRef<Path>>(&self, path: P) -> Classification {
        self.heuristic.classify(path.as_ref())
    }

    /// Run the decision procedure and keep every intermediate result.
    pub fn identify_report<P: AsRef<Path>>(&self, path: P) -> IdentifyReport {
        let path = path.as_ref();
        let report = self.decide(path);
        self.sink.emit(IdentifyEvent::Decided {
            path: report.path.clone(),
            strategy: report.strategy,
            fallback: report.fallback,
        });
        report
    }

    fn decide(&self, path: &Path) -> IdentifyReport {
        if self.prefer_identify {
            let result = self.interpreter.classify(path);
            let mut report = IdentifyReport::new(path, Strategy::Interpreter, result.clone());
            report.interpreter = Some(result);
            return report;
        }

        let magic = self.signature.classify(path);
        if self.prefer_magic || !magic.is_boring() {
            let mut report = IdentifyReport::new(path, Strategy::Signature, magic.clone());
            report.signature = Some(magic);
            return report;
        }
        self.fallthrough(path, Strategy::Signature);

        let interpreted = self.interpreter.classify(path);
        if !interpreted.is_unknown() {
            let mut report =
                IdentifyReport::new(path, Strategy::Interpreter, interpreted.clone());
            report.signature = Some(magic);
            report.interpreter = Some(interpreted);
            return report;
        }
        self.fallthrough(path, Strategy::Interpreter);

        let guessed = self.heuristic.classify(path);
        if !guessed.is_unknown() {
            let mut report = IdentifyReport::new(path, Strategy::Heuristic, guessed.clone());
            report.signature = Some(magic);
            report.interpreter = Some(interpreted);
            report.heuristic = Some(guessed);
            return report;
        }
        self.fallthrough(path, Strategy::Heuristic);

        let mut report = IdentifyReport::new(path, Strategy::Signature, magic.clone());
        report.fallback = true;
        report.signature = Some(magic);
        report.interpreter = Some(interpreted);
        report.heuristic = Some(guessed);
        report
    }

    fn fallthrough(&self, path: &Path, strategy: Strategy) {
        self.sink.emit(IdentifyEvent::Fallthrough {
            path: path.display().to_string(),
            strategy,
        });
    }
}

/// Assembles a [`MagicIdentify`], defaulting every capability that is not
/// supplied explicitly.
pub struct MagicIdentifyBuilder {
    config: IdentifyConfig,
    factory: Option<Box<dyn SignatureFactory>>,
    tags: Option<Arc<dyn TagLookup>>,
    sink: Option<Arc<dyn EventSink>>,
}

impl MagicIdentifyBuilder {
    pub fn signature_factory(mut self, factory: Box<dyn SignatureFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn tag_lookup(mut self, tags: Arc<dyn TagLookup>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate the configuration first and fail instead of repairing it.
    pub fn try_build(self) -> Result<MagicIdentify> {
        self.config.validate()?;
        Ok(self.build())
    }

    /// Sections that fail validation fall back to their defaults, reported
    /// as [`IdentifyEvent::ConfigRejected`].
    pub fn build(self) -> MagicIdentify {
        let sink = self.sink.unwrap_or_else(default_sink);
        let config = sanitize(self.config, sink.as_ref());
        let factory = self
            .factory
            .unwrap_or_else(|| Box::new(InferFactory::new(&config.signature)) as Box<dyn SignatureFactory>);
        let tags = self
            .tags
            .unwrap_or_else(|| {
                Arc::new(BuiltinTags::with_extra(config.interpreters.extra.clone())) as Arc<dyn TagLookup>
            });

        MagicIdentify {
            prefer_identify: config.prefer_identify,
            prefer_magic: config.prefer_magic,
            signature: SignatureClassifier::with_factory(
                factory.as_ref(),
                config.signature.mode,
                &config.io,
                sink.clone(),
            ),
            interpreter: InterpreterClassifier::new(tags, &config.io, sink.clone()),
            heuristic: HeuristicScriptClassifier::new(&config.heuristics, &config.io, sink.clone()),
            sink,
        }
    }
}

fn sanitize(mut config: IdentifyConfig, sink: &dyn EventSink) -> IdentifyConfig {
    let reject = |section: &str, reason: String| {
        sink.emit(IdentifyEvent::ConfigRejected {
            section: section.to_string(),
            reason,
        })
    };
    if let Err(e) = config.io.validate() {
        reject("io", e.to_string());
        config.io = IOConfig::default();
    }
    if let Err(e) = config.interpreters.validate() {
        reject("interpreters", e.to_string());
        config.interpreters = InterpreterConfig::default();
    }
    if let Err(e) = config.heuristics.validate() {
        reject("heuristics", e.to_string());
        config.heuristics = HeuristicsConfig::default();
    }
    config
}
