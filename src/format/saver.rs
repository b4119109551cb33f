//! Document serializer
//!
//! # Save Protocol
//!
//! 1. Compute the minimal file version (or validate the explicit one)
//! 2. Encode the body with that version's grammar, thinning flight data
//! 3. Optionally gzip the body (fixed mtime, no file name)
//! 4. Frame it: header, body, body checksum
//! 5. Write everything to the sink in one pass
//!
//! Steps 1-4 happen in memory. A version downgrade or encoding failure
//! therefore leaves the sink untouched.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::{Compression, GzBuilder};

use crate::config::StorageOptions;
use crate::document::Document;
use crate::observability::{log_event_at, log_event_with_fields, Event, FormatMetrics, Severity};
use crate::version::{self, FileVersion};

use super::checksum::body_seal;
use super::codec::encode_document;
use super::errors::{FormatError, FormatResult};
use super::estimate;
use super::grammar::grammar_for;
use super::header::{FileHeader, HEADER_LEN, TRAILER_LEN};

/// Writes documents in the versioned container format.
///
/// Holds no per-save state; one saver may be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Saver {
    metrics: Option<Arc<FormatMetrics>>,
}

impl Saver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(mut self, metrics: Arc<FormatMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Serializes `document` to `sink`.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// - `ROCKET_VERSION_DOWNGRADE` if the explicit version is too low;
    ///   nothing is written
    /// - `ROCKET_IO_WRITE_ERROR` if the sink fails; the sink may hold a
    ///   prefix of the file
    pub fn save<W: Write>(
        &self,
        document: &Document,
        sink: &mut W,
        options: &StorageOptions,
    ) -> FormatResult<u64> {
        let result = self.encode(document, options).and_then(|(version, bytes)| {
            sink.write_all(&bytes)
                .and_then(|_| sink.flush())
                .map_err(|e| FormatError::io_write("failed to write document", e))?;
            Ok((version, bytes.len() as u64))
        });
        self.finish(result)
    }

    /// Serializes `document` into a new buffer.
    pub fn to_bytes(&self, document: &Document, options: &StorageOptions) -> FormatResult<Vec<u8>> {
        let mut out = Vec::new();
        self.save(document, &mut out, options)?;
        Ok(out)
    }

    /// Saves to `path`, replacing any existing file only on success.
    ///
    /// The file is written next to the target under a temporary name,
    /// fsynced, then renamed over the target. On failure the temporary file
    /// is removed and the target is left as it was.
    pub fn save_to_path(
        &self,
        document: &Document,
        path: &Path,
        options: &StorageOptions,
    ) -> FormatResult<u64> {
        let result = self.encode(document, options).and_then(|(version, bytes)| {
            write_atomically(path, &bytes)?;
            Ok((version, bytes.len() as u64))
        });
        self.finish(result)
    }

    /// Rough encoded size of `document`; see [`estimate::estimate_file_size`].
    pub fn estimate_file_size(&self, document: &Document, options: &StorageOptions) -> u64 {
        estimate::estimate_file_size(document, options)
    }

    fn encode(
        &self,
        document: &Document,
        options: &StorageOptions,
    ) -> FormatResult<(FileVersion, Vec<u8>)> {
        let version = version::calculate(document, options)?;
        let version_text = version.to_string();
        log_event_with_fields(
            Event::SaveBegin,
            &[
                ("version", version_text.as_str()),
                ("compressed", bool_str(options.compression_enabled)),
            ],
        );
        let bytes = encode_file(document, version, options)?;
        Ok((version, bytes))
    }

    fn finish(&self, result: FormatResult<(FileVersion, u64)>) -> FormatResult<u64> {
        match result {
            Ok((version, written)) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_save(written);
                }
                let version_text = version.to_string();
                let bytes_text = written.to_string();
                log_event_with_fields(
                    Event::SaveComplete,
                    &[("version", version_text.as_str()), ("bytes", bytes_text.as_str())],
                );
                Ok(written)
            }
            Err(err) => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_save_rejections();
                }
                let severity = if err.is_io() { Severity::Error } else { Severity::Warn };
                log_event_at(
                    severity,
                    Event::SaveRejected,
                    &[("code", err.code().code()), ("message", err.message())],
                );
                Err(err)
            }
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Frames an encoded body at `version`.
fn encode_file(
    document: &Document,
    version: FileVersion,
    options: &StorageOptions,
) -> FormatResult<Vec<u8>> {
    let wire = encode_document(document, grammar_for(version), options);
    let json = serde_json::to_vec(&wire)
        .map_err(|e| FormatError::io_write("failed to encode document body", e.into()))?;

    let body = if options.compression_enabled {
        gzip(&json)?
    } else {
        json
    };

    let header = FileHeader {
        version,
        compressed: options.compression_enabled,
        body_len: body.len() as u64,
    };

    let mut out = Vec::with_capacity(HEADER_LEN + body.len() + TRAILER_LEN);
    out.extend_from_slice(&header.encode());
    out.extend_from_slice(&body);
    out.extend_from_slice(&body_seal(&body).to_le_bytes());
    Ok(out)
}

/// Deterministic gzip: fixed mtime, no file name.
fn gzip(data: &[u8]) -> FormatResult<Vec<u8>> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .write(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| FormatError::io_write("gzip write failed", e))?;
    encoder
        .finish()
        .map_err(|e| FormatError::io_write("gzip finish failed", e))
}

fn temp_path_for(path: &Path) -> FormatResult<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        FormatError::io_write(
            format!("not a file path: {}", path.display()),
            std::io::Error::from(std::io::ErrorKind::InvalidInput),
        )
    })?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(name);
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> FormatResult<()> {
    let temp = temp_path_for(path)?;
    let result = write_synced(&temp, bytes).and_then(|_| {
        fs::rename(&temp, path).map_err(|e| {
            FormatError::io_write(format!("failed to replace {}", path.display()), e)
        })
    });
    if result.is_err() {
        cleanup_temp(&temp);
        return result;
    }
    fsync_parent(path)
}

fn write_synced(path: &Path, bytes: &[u8]) -> FormatResult<()> {
    let mut file = File::create(path).map_err(|e| {
        FormatError::io_write(format!("failed to create {}", path.display()), e)
    })?;
    file.write_all(bytes)
        .map_err(|e| FormatError::io_write(format!("failed to write {}", path.display()), e))?;
    file.sync_all()
        .map_err(|e| FormatError::io_write(format!("fsync failed for {}", path.display()), e))
}

/// Remove a temporary file (cleanup on failure).
fn cleanup_temp(path: &Path) {
    if path.exists() {
        // Best effort; already on an error path.
        let _ = fs::remove_file(path);
    }
}

/// fsync the directory holding `path` so the rename is durable.
#[cfg(unix)]
fn fsync_parent(path: &Path) -> FormatResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::OpenOptions::new()
        .read(true)
        .open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| FormatError::io_write(format!("fsync directory failed: {}", dir.display()), e))
}

#[cfg(not(unix))]
fn fsync_parent(_path: &Path) -> FormatResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Component, ComponentKind, FinTabData, Rocket};
    use crate::format::header::FLAG_GZIP;
    use crate::format::FormatErrorCode;
    use std::io;
    use tempfile::TempDir;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn tabbed_rocket() -> Document {
        let tab = Component::new("Tab", ComponentKind::FinTab(FinTabData::default()));
        Document::new(Rocket::new("Tabbed").with_child(tab))
    }

    #[test]
    fn test_frame_layout() {
        let bytes = Saver::new()
            .to_bytes(&Document::default(), &StorageOptions::default())
            .unwrap();
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&bytes[..HEADER_LEN]);
        let decoded = FileHeader::decode(&header).unwrap();
        assert_eq!(decoded.version, FileVersion::V100);
        assert_eq!(
            bytes.len(),
            HEADER_LEN + decoded.body_len as usize + TRAILER_LEN
        );
    }

    #[test]
    fn test_compressed_flag_set() {
        let opts = StorageOptions::default().with_compression(true);
        let bytes = Saver::new().to_bytes(&Document::default(), &opts).unwrap();
        assert_eq!(bytes[8], FLAG_GZIP);
        // gzip magic at the start of the body
        assert_eq!(&bytes[HEADER_LEN..HEADER_LEN + 2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_compressed_output_is_deterministic() {
        let opts = StorageOptions::default().with_compression(true);
        let saver = Saver::new();
        let doc = tabbed_rocket();
        assert_eq!(saver.to_bytes(&doc, &opts).unwrap(), saver.to_bytes(&doc, &opts).unwrap());
    }

    #[test]
    fn test_downgrade_writes_nothing() {
        let metrics = Arc::new(FormatMetrics::new());
        let saver = Saver::new().with_metrics(Arc::clone(&metrics));
        let opts = StorageOptions::default().with_explicit_file_version(FileVersion::V100);
        let mut sink = Vec::new();

        let err = saver.save(&tabbed_rocket(), &mut sink, &opts).unwrap_err();

        assert_eq!(err.code(), FormatErrorCode::RocketVersionDowngrade);
        assert!(err.details().unwrap().contains("fin_tabs"));
        assert!(sink.is_empty());
        assert_eq!(metrics.snapshot().save_rejections, 1);
        assert_eq!(metrics.snapshot().saves, 0);
    }

    #[test]
    fn test_sink_failure_is_io_write_error() {
        let err = Saver::new()
            .save(&Document::default(), &mut FailingSink, &StorageOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), FormatErrorCode::RocketIoWriteError);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_metrics_count_bytes() {
        let metrics = Arc::new(FormatMetrics::new());
        let saver = Saver::new().with_metrics(Arc::clone(&metrics));
        let written = saver
            .save(&Document::default(), &mut Vec::new(), &StorageOptions::default())
            .unwrap();
        assert_eq!(metrics.bytes_written(), written);
    }

    #[test]
    fn test_save_to_path_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alpha.rkt");
        let written = Saver::new()
            .save_to_path(&tabbed_rocket(), &path, &StorageOptions::default())
            .unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), written);
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_to_path_keeps_target_on_downgrade() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alpha.rkt");
        fs::write(&path, b"previous").unwrap();

        let opts = StorageOptions::default().with_explicit_file_version(FileVersion::V100);
        assert!(Saver::new().save_to_path(&tabbed_rocket(), &path, &opts).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"previous");
    }

    #[test]
    fn test_save_to_missing_directory_cleans_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("alpha.rkt");
        let err = Saver::new()
            .save_to_path(&Document::default(), &path, &StorageOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), FormatErrorCode::RocketIoWriteError);
        assert!(!path.exists());
    }
}
