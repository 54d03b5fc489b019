//! Content-signature classification.
//!
//! Uses `infer` for built-in byte signatures, `object` to refine ELF files
//! into the executable/PIE/shared-library split, and `encoding_rs` to tell
//! text from opaque data. The backend sits behind [`SignatureSource`] so the
//! classifier can degrade when its preferred configuration cannot be built.

use crate::core::classification::{Classification, OCTET_STREAM, TEXT_PLAIN};
use crate::error::{IdentifyError, Result, SignatureMode};
use crate::identify::config::{IOConfig, MagicRule, SignatureConfig};
use crate::identify::events::{EventSink, IdentifyEvent};
use crate::identify::io::SafeFileReader;
use object::elf;
use object::read::elf::{FileHeader, ProgramHeader};
use object::FileKind;
use std::path::Path;
use std::sync::Arc;

/// MIME reported for zero-length files.
pub const EMPTY_MIME: &str = "application/x-empty";

/// A constructed content-signature capability.
pub trait SignatureSource: Send + Sync {
    /// The configuration this source was built for.
    fn mode(&self) -> SignatureMode;

    /// Describe a bounded prefix of a file. `None` means "nothing to say".
    fn describe(&self, data: &[u8]) -> Option<String>;
}

/// Builds [`SignatureSource`]s; construction may fail per mode.
pub trait SignatureFactory: Send + Sync {
    fn build(&self, mode: SignatureMode) -> Result<Box<dyn SignatureSource>>;
}

/// A user rule with its pattern decoded.
#[derive(Debug, Clone)]
struct CompiledRule {
    offset: usize,
    bytes: Vec<u8>,
    mime: String,
    description: String,
}

impl CompiledRule {
    fn compile(index: usize, rule: &MagicRule) -> Result<Self> {
        let bytes =
            hex::decode(rule.pattern.trim()).map_err(|e| IdentifyError::InvalidMagicRule {
                index,
                reason: e.to_string(),
            })?;
        if bytes.is_empty() {
            return Err(IdentifyError::InvalidMagicRule {
                index,
                reason: "empty pattern".to_string(),
            });
        }
        if rule.mime.trim().is_empty() {
            return Err(IdentifyError::InvalidMagicRule {
                index,
                reason: "empty mime".to_string(),
            });
        }
        Ok(Self {
            offset: rule.offset,
            bytes,
            mime: rule.mime.clone(),
            description: rule.description.clone().unwrap_or_else(|| rule.mime.clone()),
        })
    }

    fn matches(&self, data: &[u8]) -> bool {
        self.offset
            .checked_add(self.bytes.len())
            .and_then(|end| data.get(self.offset..end))
            == Some(self.bytes.as_slice())
    }
}

/// Factory for the `infer`-backed source.
#[derive(Debug, Clone, Default)]
pub struct InferFactory {
    rules: Vec<MagicRule>,
}

impl InferFactory {
    pub fn new(config: &SignatureConfig) -> Self {
        Self {
            rules: config.extra_rules.clone(),
        }
    }
}

impl SignatureFactory for InferFactory {
    fn build(&self, mode: SignatureMode) -> Result<Box<dyn SignatureSource>> {
        // Only the MIME configuration loads user rules; description mode is
        // the plain built-in fallback.
        let rules = match mode {
            SignatureMode::Mime => self
                .rules
                .iter()
                .enumerate()
                .map(|(i, r)| CompiledRule::compile(i, r))
                .collect::<Result<Vec<_>>>()
                .map_err(|e| IdentifyError::BackendUnavailable {
                    mode,
                    reason: e.to_string(),
                })?,
            SignatureMode::Description => Vec::new(),
        };
        Ok(Box::new(InferSignature {
            mode,
            rules,
            infer: infer::Infer::new(),
        }))
    }
}

/// Signature source built on `infer` plus ELF and text refinements.
pub struct InferSignature {
    mode: SignatureMode,
    rules: Vec<CompiledRule>,
    infer: infer::Infer,
}

impl SignatureSource for InferSignature {
    fn mode(&self) -> SignatureMode {
        self.mode
    }

    fn describe(&self, data: &[u8]) -> Option<String> {
        let mime = self.mode == SignatureMode::Mime;

        if data.is_empty() {
            return Some(if mime { EMPTY_MIME } else { "empty" }.to_string());
        }

        if let Some(rule) = self.rules.iter().find(|r| r.matches(data)) {
            return Some(if mime {
                rule.mime.clone()
            } else {
                rule.description.clone()
            });
        }

        if let Some(kind) = elf_kind(data) {
            return Some(if mime { kind.mime() } else { kind.description() }.to_string());
        }

        // Interpreter directives are left to the interpreter classifier.
        if !data.starts_with(b"#!") {
            if let Some(kind) = self.infer.get(data) {
                return Some(if mime {
                    kind.mime_type().to_string()
                } else {
                    describe_infer(&kind)
                });
            }
        }

        Some(match (text_kind(data), mime) {
            (Some(_), true) => TEXT_PLAIN.to_string(),
            (Some(text), false) => text.description().to_string(),
            (None, true) => OCTET_STREAM.to_string(),
            (None, false) => "data".to_string(),
        })
    }
}

fn describe_infer(kind: &infer::Type) -> String {
    let ext = kind.extension().to_ascii_uppercase();
    match kind.matcher_type() {
        infer::MatcherType::App => format!("{ext} executable"),
        infer::MatcherType::Archive => format!("{ext} archive data"),
        infer::MatcherType::Image => format!("{ext} image data"),
        infer::MatcherType::Audio => format!("{ext} audio data"),
        infer::MatcherType::Video => format!("{ext} video data"),
        infer::MatcherType::Doc | infer::MatcherType::Book => format!("{ext} document"),
        infer::MatcherType::Text => format!("{ext} text"),
        _ => format!("{ext} data"),
    }
}

/// ELF object kinds distinguished by `e_type` and the presence of `PT_INTERP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfKind {
    Executable,
    PieExecutable,
    SharedLib,
    Relocatable,
    Core,
}

impl ElfKind {
    pub fn mime(self) -> &'static str {
        match self {
            ElfKind::Executable => "application/x-executable",
            ElfKind::PieExecutable => "application/x-pie-executable",
            ElfKind::SharedLib => "application/x-sharedlib",
            ElfKind::Relocatable => "application/x-object",
            ElfKind::Core => "application/x-coredump",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ElfKind::Executable => "ELF executable",
            ElfKind::PieExecutable => "ELF pie executable",
            ElfKind::SharedLib => "ELF shared object",
            ElfKind::Relocatable => "ELF relocatable",
            ElfKind::Core => "ELF core file",
        }
    }
}

/// Classify an ELF prefix. Returns `None` for non-ELF data or unknown `e_type`.
pub fn elf_kind(data: &[u8]) -> Option<ElfKind> {
    match FileKind::parse(data).ok()? {
        FileKind::Elf32 => elf_kind_for::<elf::FileHeader32<object::Endianness>>(data),
        FileKind::Elf64 => elf_kind_for::<elf::FileHeader64<object::Endianness>>(data),
        _ => None,
    }
}

fn elf_kind_for<Elf: FileHeader<Endian = object::Endianness>>(data: &[u8]) -> Option<ElfKind> {
    let header = Elf::parse(data).ok()?;
    let endian = header.endian().ok()?;
    match header.e_type(endian) {
        elf::ET_EXEC => Some(ElfKind::Executable),
        elf::ET_REL => Some(ElfKind::Relocatable),
        elf::ET_CORE => Some(ElfKind::Core),
        elf::ET_DYN => {
            let has_interp = header
                .program_headers(endian, data)
                .map(|phdrs| phdrs.iter().any(|ph| ph.p_type(endian) == elf::PT_INTERP))
                .unwrap_or(false);
            Some(if has_interp {
                ElfKind::PieExecutable
            } else {
                ElfKind::SharedLib
            })
        }
        _ => None,
    }
}

/// Text encodings recognised when no binary signature matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Ascii,
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TextKind {
    pub fn description(self) -> &'static str {
        match self {
            TextKind::Ascii => "ASCII text",
            TextKind::Utf8 => "UTF-8 Unicode text",
            TextKind::Utf16Le => "Little-endian UTF-16 Unicode text",
            TextKind::Utf16Be => "Big-endian UTF-16 Unicode text",
        }
    }
}

fn is_text_control(b: u8) -> bool {
    b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b | 0x08 | 0x07)
}

/// Decide whether a (possibly truncated) prefix is text.
pub fn text_kind(data: &[u8]) -> Option<TextKind> {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(data) {
        let body = &data[bom_len..];
        let kind = if encoding == encoding_rs::UTF_16LE {
            TextKind::Utf16Le
        } else if encoding == encoding_rs::UTF_16BE {
            TextKind::Utf16Be
        } else {
            TextKind::Utf8
        };
        // Drop a dangling half code unit left by the prefix cut.
        let body = match kind {
            TextKind::Utf16Le | TextKind::Utf16Be => &body[..body.len() & !1],
            _ => body,
        };
        let (decoded, had_errors) = encoding.decode_without_bom_handling(body);
        if had_errors || decoded.chars().any(|c| c.is_ascii() && is_text_control(c as u8)) {
            return None;
        }
        return Some(kind);
    }

    if memchr::memchr(0, data).is_some() || data.iter().any(|&b| is_text_control(b)) {
        return None;
    }
    if data.is_ascii() {
        return Some(TextKind::Ascii);
    }
    match std::str::from_utf8(data) {
        Ok(_) => Some(TextKind::Utf8),
        // A multi-byte sequence cut off by the prefix bound is still text.
        Err(e) if e.error_len().is_none() && data.len() - e.valid_up_to() < 4 => {
            Some(TextKind::Utf8)
        }
        Err(_) => None,
    }
}

/// The classifier's backing capability, or an explicit marker that none
/// could be constructed.
pub enum SignatureBackend {
    Ready(Box<dyn SignatureSource>),
    /// `mode` is the configuration that was asked for; `reason` carries every
    /// construction failure.
    Unavailable { mode: SignatureMode, reason: String },
}

impl SignatureBackend {
    pub fn is_available(&self) -> bool {
        matches!(self, SignatureBackend::Ready(_))
    }

    pub fn mode(&self) -> Option<SignatureMode> {
        match self {
            SignatureBackend::Ready(source) => Some(source.mode()),
            SignatureBackend::Unavailable { .. } => None,
        }
    }
}

/// Classifies a file by its byte content.
pub struct SignatureClassifier {
    backend: SignatureBackend,
    max_sniff_size: usize,
    sink: Arc<dyn EventSink>,
}

impl SignatureClassifier {
    /// Build with the `infer` backend from configuration.
    pub fn new(config: &SignatureConfig, io: &IOConfig, sink: Arc<dyn EventSink>) -> Self {
        Self::with_factory(&InferFactory::new(config), config.mode, io, sink)
    }

    /// Two-stage construction: the preferred mode first, then description
    /// mode, then an explicit unavailable marker.
    pub fn with_factory(
        factory: &dyn SignatureFactory,
        preferred: SignatureMode,
        io: &IOConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let backend = match factory.build(preferred) {
            Ok(source) => SignatureBackend::Ready(source),
            Err(first) if preferred != SignatureMode::Description => {
                sink.emit(IdentifyEvent::BackendDegraded {
                    mode: preferred,
                    reason: first.to_string(),
                });
                match factory.build(SignatureMode::Description) {
                    Ok(source) => SignatureBackend::Ready(source),
                    Err(second) => SignatureBackend::Unavailable {
                        mode: preferred,
                        reason: format!("{first}; then {second}"),
                    },
                }
            }
            Err(first) => SignatureBackend::Unavailable {
                mode: preferred,
                reason: first.to_string(),
            },
        };
        if let SignatureBackend::Unavailable { mode, reason } = &backend {
            sink.emit(IdentifyEvent::BackendUnavailable {
                mode: *mode,
                reason: reason.clone(),
            });
        }
        Self {
            backend,
            max_sniff_size: io.max_sniff_size,
            sink,
        }
    }

    pub fn backend(&self) -> &SignatureBackend {
        &self.backend
    }

    /// Never fails: any error becomes `("Not Found", "missing")`.
    pub fn classify(&self, path: &Path) -> Classification {
        match self.try_describe(path) {
            Ok(Some(text)) if !text.is_empty() => Classification::from_signature(text),
            Ok(_) => {
                self.sink.emit(IdentifyEvent::SignatureEmpty {
                    path: path.display().to_string(),
                });
                Classification::not_found()
            }
            Err(e) => {
                self.sink.emit(IdentifyEvent::SignatureFailed {
                    path: path.display().to_string(),
                    error: e.to_string(),
                });
                Classification::not_found()
            }
        }
    }

    fn try_describe(&self, path: &Path) -> Result<Option<String>> {
        let source = match &self.backend {
            SignatureBackend::Ready(source) => source,
            SignatureBackend::Unavailable { mode, reason } => {
                return Err(IdentifyError::BackendUnavailable {
                    mode: *mode,
                    reason: reason.clone(),
                })
            }
        };
        let data = SafeFileReader::open(path)?.read_prefix(self.max_sniff_size)?;
        Ok(source.describe(&data))
    }
}
