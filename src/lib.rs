//! magic-identify: try really hard to get a MIME type for a file.
//!
//! A content-signature sniffer, an interpreter-directive classifier and a
//! keyword heuristic for headerless shell scripts, combined by an arbiter
//! that always returns some answer.
//!
//! ```no_run
//! use magic_identify::MagicIdentify;
//!
//! let mi = MagicIdentify::default();
//! let result = mi.identify("/bin/ls");
//! println!("{}", result); // application/x-pie-executable, application/x-pie-executable
//! ```

/// Core data types module
pub mod core;
pub mod error;
pub mod identify;
pub mod logging;

pub use crate::core::Classification;
pub use crate::error::{IdentifyError, Result, SignatureMode};
pub use crate::identify::{IdentifyConfig, IdentifyReport, MagicIdentify, Strategy};
