//! Document deserializer
//!
//! # Load Protocol
//!
//! 1. Read and validate the fixed-size header
//! 2. Reject unknown versions and oversized bodies before reading the body
//! 3. Read the body and its checksum; verify; reject trailing bytes
//! 4. Decompress (bounded) if flagged
//! 5. Decode with the declared version's grammar
//! 6. Reject features the declared version cannot carry
//! 7. Trust gate: each script is enabled only if the trust store knows it
//! 8. Resolve motor and preset references into warnings
//!
//! Any failure in 1-6 aborts the load. No partial document is returned.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use flate2::read::GzDecoder;

use crate::config::{LoaderConfig, StorageOptions};
use crate::document::{Component, Document, SimulationExtension};
use crate::observability::{log_event_at, log_event_with_fields, Event, FormatMetrics, Severity};
use crate::services::{MotorLookup, PassthroughTranslator, PresetLookup, Translator};
use crate::trust::{ScriptIdentity, TrustStore};
use crate::version::{scan_features, FileVersion};

use super::checksum::body_seal_matches;
use super::codec::decode_document;
use super::errors::{FormatError, FormatResult};
use super::grammar::grammar_for;
use super::header::{FileHeader, TRAILER_LEN};
use super::warnings::{LoadWarning, WarningKind};
use super::wire::DocumentWire;

/// Reads only the header of a file, leaving the body unread.
pub fn read_header<R: Read>(source: &mut R) -> FormatResult<FileHeader> {
    FileHeader::read_from(source)
}

/// A loaded document with everything learned while loading it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub document: Document,
    /// Version declared by the file.
    pub version: FileVersion,
    pub warnings: Vec<LoadWarning>,
}

impl LoadedDocument {
    /// Warning texts rendered through `translator`.
    pub fn describe_warnings(&self, translator: &dyn Translator) -> Vec<String> {
        self.warnings.iter().map(|w| w.describe(translator)).collect()
    }
}

/// Reads documents in the versioned container format.
///
/// The trust store is injected; loaders never consult a hidden global.
/// Holds no per-load state; one loader may be shared across threads.
#[derive(Clone)]
pub struct Loader {
    trust: Arc<TrustStore>,
    motors: Option<Arc<dyn MotorLookup>>,
    presets: Option<Arc<dyn PresetLookup>>,
    translator: Arc<dyn Translator>,
    config: LoaderConfig,
    metrics: Option<Arc<FormatMetrics>>,
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("trusted_scripts", &self.trust.len())
            .field("motors", &self.motors.is_some())
            .field("presets", &self.presets.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl Loader {
    pub fn new(trust: Arc<TrustStore>) -> Self {
        Self {
            trust,
            motors: None,
            presets: None,
            translator: Arc::new(PassthroughTranslator),
            config: LoaderConfig::default(),
            metrics: None,
        }
    }

    pub fn with_motor_lookup(mut self, motors: Arc<dyn MotorLookup>) -> Self {
        self.motors = Some(motors);
        self
    }

    pub fn with_preset_lookup(mut self, presets: Arc<dyn PresetLookup>) -> Self {
        self.presets = Some(presets);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<FormatMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Warning texts of `loaded`, rendered through this loader's translator.
    pub fn describe_warnings(&self, loaded: &LoadedDocument) -> Vec<String> {
        loaded.describe_warnings(self.translator.as_ref())
    }

    /// User-facing text for a failed load, rendered through this loader's translator.
    pub fn describe_error(&self, err: &FormatError) -> String {
        err.describe(self.translator.as_ref())
    }

    /// Loads a document, discarding warnings.
    pub fn load<R: Read>(&self, source: &mut R) -> FormatResult<Document> {
        self.load_with_warnings(source).map(|loaded| loaded.document)
    }

    /// Loads a document along with its declared version and warnings.
    ///
    /// # Errors
    ///
    /// - `ROCKET_MALFORMED_HEADER` on a short, corrupt or unknown-flag header
    /// - `ROCKET_UNSUPPORTED_VERSION` on an unknown version; body not read
    /// - `ROCKET_INPUT_TOO_LARGE` when the body exceeds the configured limit
    /// - `ROCKET_CORRUPT_BODY` on checksum, gzip, JSON or feature-gate failure
    /// - `ROCKET_MISSING_REQUIRED_FIELD` when the declared version demands a
    ///   field the body lacks
    /// - `ROCKET_IO_READ_ERROR` when the source fails
    pub fn load_with_warnings<R: Read>(&self, source: &mut R) -> FormatResult<LoadedDocument> {
        log_event_with_fields(Event::LoadBegin, &[]);
        let result = self.decode(source);
        match &result {
            Ok(loaded) => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_loads();
                }
                let version_text = loaded.version.to_string();
                let warnings_text = loaded.warnings.len().to_string();
                log_event_with_fields(
                    Event::LoadComplete,
                    &[
                        ("version", version_text.as_str()),
                        ("warnings", warnings_text.as_str()),
                    ],
                );
            }
            Err(err) => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_load_rejections();
                }
                let severity = if err.is_io() { Severity::Error } else { Severity::Warn };
                log_event_at(
                    severity,
                    Event::LoadRejected,
                    &[("code", err.code().code()), ("message", err.message())],
                );
            }
        }
        result
    }

    /// Opens and loads the file at `path`.
    pub fn load_from_path(&self, path: &Path) -> FormatResult<LoadedDocument> {
        let file = File::open(path).map_err(|e| {
            FormatError::io_read(format!("failed to open {}", path.display()), e)
        })?;
        self.load_with_warnings(&mut BufReader::new(file))
    }

    fn decode<R: Read>(&self, source: &mut R) -> FormatResult<LoadedDocument> {
        let header = FileHeader::read_from(source)?;
        let limit = self.config.max_input_bytes;
        if header.body_len > limit {
            return Err(FormatError::input_too_large(header.body_len, limit));
        }

        let stored = read_body(source, header.body_len)?;
        let json = if header.compressed {
            gunzip(&stored, limit)?
        } else {
            stored
        };

        let wire: DocumentWire = serde_json::from_slice(&json)
            .map_err(|e| FormatError::corrupt_body(format!("invalid document body: {}", e)))?;

        let grammar = grammar_for(header.version);
        let mut document = decode_document(wire, grammar)?;

        // Gate against everything present in the file, including any data.
        for feature in scan_features(&document, &StorageOptions::default()) {
            if !grammar.admits(feature) {
                return Err(FormatError::feature_above_version(feature, header.version));
            }
        }

        let mut warnings = Vec::new();
        self.apply_trust(&mut document, &mut warnings);
        self.resolve_references(&document, &mut warnings);

        Ok(LoadedDocument {
            document,
            version: header.version,
            warnings,
        })
    }

    fn apply_trust(&self, document: &mut Document, warnings: &mut Vec<LoadWarning>) {
        for simulation in &mut document.simulations {
            for extension in &mut simulation.extensions {
                let SimulationExtension::Scripting(script) = extension else {
                    continue;
                };
                let identity = ScriptIdentity::new(&script.engine_id, &script.script_body);
                script.enabled = self.trust.is_identity_trusted(&identity);

                let identity_text = identity.to_string();
                let fields = [
                    ("simulation", simulation.name.as_str()),
                    ("script", identity_text.as_str()),
                ];
                if script.enabled {
                    if let Some(metrics) = &self.metrics {
                        metrics.increment_scripts_enabled();
                    }
                    log_event_with_fields(Event::ScriptEnabled, &fields);
                } else {
                    if let Some(metrics) = &self.metrics {
                        metrics.increment_scripts_disabled();
                    }
                    log_event_with_fields(Event::ScriptDisabled, &fields);
                    warnings.push(LoadWarning::new(
                        WarningKind::ScriptDisabled,
                        format!("{} ({})", simulation.name, script.engine_id),
                    ));
                }
            }
        }
    }

    fn resolve_references(&self, document: &Document, warnings: &mut Vec<LoadWarning>) {
        if self.motors.is_none() && self.presets.is_none() {
            return;
        }
        for component in &document.rocket.children {
            self.resolve_component(component, warnings);
        }
    }

    fn resolve_component(&self, component: &Component, warnings: &mut Vec<LoadWarning>) {
        if let (Some(motors), Some(mount)) = (&self.motors, component.kind.motor_mount()) {
            for placement in mount.motors.values() {
                let motor = &placement.motor;
                let subject = format!("{} {}", motor.manufacturer, motor.designation);
                match motors.find_motor(&motor.manufacturer, &motor.designation) {
                    Ok(found) => {
                        if let Some(digest) = &motor.digest {
                            if *digest != found.digest {
                                warnings.push(LoadWarning::new(
                                    WarningKind::MotorDigestMismatch,
                                    subject,
                                ));
                            }
                        }
                    }
                    Err(err) => {
                        let reason = err.to_string();
                        log_event_with_fields(
                            Event::MotorUnresolved,
                            &[("component", component.name.as_str()), ("reason", reason.as_str())],
                        );
                        warnings.push(LoadWarning::new(WarningKind::MotorNotFound, subject));
                    }
                }
            }
        }

        if let (Some(presets), Some(preset)) = (&self.presets, &component.preset) {
            if let Err(err) = presets.find_preset(&preset.id) {
                let reason = err.to_string();
                log_event_with_fields(
                    Event::PresetUnresolved,
                    &[("component", component.name.as_str()), ("reason", reason.as_str())],
                );
                warnings.push(LoadWarning::new(
                    WarningKind::PresetNotFound,
                    format!("{} {}", preset.manufacturer, preset.part_number),
                ));
            }
        }

        for child in &component.children {
            self.resolve_component(child, warnings);
        }
    }
}

/// Reads exactly `body_len` body bytes plus the trailer and verifies them.
fn read_body<R: Read>(source: &mut R, body_len: u64) -> FormatResult<Vec<u8>> {
    let mut body = Vec::new();
    source
        .by_ref()
        .take(body_len)
        .read_to_end(&mut body)
        .map_err(|e| FormatError::io_read("failed to read document body", e))?;
    if (body.len() as u64) < body_len {
        return Err(FormatError::corrupt_body(format!(
            "body truncated: expected {} bytes, found {}",
            body_len,
            body.len()
        )));
    }

    let mut trailer = [0u8; TRAILER_LEN];
    source.read_exact(&mut trailer).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            FormatError::corrupt_body("body checksum missing")
        } else {
            FormatError::io_read("failed to read body checksum", e)
        }
    })?;
    if !body_seal_matches(&body, trailer) {
        return Err(FormatError::corrupt_body("body checksum mismatch"));
    }

    let mut extra = [0u8; 1];
    let trailing = loop {
        match source.read(&mut extra) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FormatError::io_read("failed to read past body", e)),
        }
    };
    if trailing != 0 {
        return Err(FormatError::corrupt_body("unexpected data after body checksum"));
    }

    Ok(body)
}

/// Inflates a gzip body, refusing to produce more than `limit` bytes.
fn gunzip(stored: &[u8], limit: u64) -> FormatResult<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(stored)
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|e| FormatError::corrupt_body(format!("gzip body could not be inflated: {}", e)))?;
    if out.len() as u64 > limit {
        return Err(FormatError::input_too_large(out.len() as u64, limit));
    }
    Ok(out)
}
