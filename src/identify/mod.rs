//! File identification by cooperating classifiers.
//!
//! Three independent strategies (content signature, interpreter directive,
//! keyword heuristic) and the arbiter that decides between them.

pub mod arbiter;
pub mod config;
pub mod events;
pub mod heuristic;
pub mod interpreter;
pub mod io;
pub mod signature;
pub mod tags;

pub use arbiter::{IdentifyReport, MagicIdentify, MagicIdentifyBuilder, Strategy};
pub use config::{HeuristicsConfig, IOConfig, IdentifyConfig, InterpreterConfig, MagicRule, SignatureConfig};
pub use events::{EventSink, IdentifyEvent, RecordingSink, TracingSink};
pub use heuristic::HeuristicScriptClassifier;
pub use interpreter::{parse_directive, InterpreterClassifier};
pub use signature::{InferFactory, SignatureBackend, SignatureClassifier, SignatureFactory, SignatureSource};
pub use tags::{BuiltinTags, TagLookup};
