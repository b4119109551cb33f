//! Format error types
//!
//! Error codes:
//! - ROCKET_UNSUPPORTED_VERSION (REJECT)
//! - ROCKET_MALFORMED_HEADER (REJECT)
//! - ROCKET_CORRUPT_BODY (REJECT)
//! - ROCKET_MISSING_REQUIRED_FIELD (REJECT)
//! - ROCKET_INPUT_TOO_LARGE (REJECT)
//! - ROCKET_VERSION_DOWNGRADE (REJECT)
//! - ROCKET_IO_WRITE_ERROR (ERROR)
//! - ROCKET_IO_READ_ERROR (ERROR)
//!
//! Every error is reported to the immediate caller. Nothing is retried and
//! no load ever yields a partial document.

use std::fmt;
use std::io;

use crate::services::Translator;
use crate::version::{Feature, FileVersion};

/// Severity levels for format errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The input or request is unacceptable; nothing was produced
    Reject,
    /// The underlying sink or source failed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Format-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorCode {
    /// Declared version is not one this implementation reads
    RocketUnsupportedVersion,
    /// Header is short, has a bad magic/checksum, or unknown flags
    RocketMalformedHeader,
    /// Body failed checksum, decompression, decoding or feature gating
    RocketCorruptBody,
    /// A field mandatory for the declared version is absent
    RocketMissingRequiredField,
    /// Declared body exceeds the configured input limit
    RocketInputTooLarge,
    /// Explicit version is below what the document's features require
    RocketVersionDowngrade,
    /// Writing to the sink failed
    RocketIoWriteError,
    /// Reading from the source failed
    RocketIoReadError,
}

impl FormatErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            FormatErrorCode::RocketUnsupportedVersion => "ROCKET_UNSUPPORTED_VERSION",
            FormatErrorCode::RocketMalformedHeader => "ROCKET_MALFORMED_HEADER",
            FormatErrorCode::RocketCorruptBody => "ROCKET_CORRUPT_BODY",
            FormatErrorCode::RocketMissingRequiredField => "ROCKET_MISSING_REQUIRED_FIELD",
            FormatErrorCode::RocketInputTooLarge => "ROCKET_INPUT_TOO_LARGE",
            FormatErrorCode::RocketVersionDowngrade => "ROCKET_VERSION_DOWNGRADE",
            FormatErrorCode::RocketIoWriteError => "ROCKET_IO_WRITE_ERROR",
            FormatErrorCode::RocketIoReadError => "ROCKET_IO_READ_ERROR",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            FormatErrorCode::RocketIoWriteError | FormatErrorCode::RocketIoReadError => {
                Severity::Error
            }
            _ => Severity::Reject,
        }
    }

    /// Translation key for the human-readable summary of this code
    pub fn message_key(&self) -> &'static str {
        match self {
            FormatErrorCode::RocketUnsupportedVersion => "error.unsupported_version",
            FormatErrorCode::RocketMalformedHeader => "error.malformed_header",
            FormatErrorCode::RocketCorruptBody => "error.corrupt_body",
            FormatErrorCode::RocketMissingRequiredField => "error.missing_required_field",
            FormatErrorCode::RocketInputTooLarge => "error.input_too_large",
            FormatErrorCode::RocketVersionDowngrade => "error.version_downgrade",
            FormatErrorCode::RocketIoWriteError => "error.io_write",
            FormatErrorCode::RocketIoReadError => "error.io_read",
        }
    }
}

impl fmt::Display for FormatErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Format error with full context
#[derive(Debug)]
pub struct FormatError {
    code: FormatErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl FormatError {
    fn new(code: FormatErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Declared version is not one this implementation understands
    pub fn unsupported_version(raw: u32) -> Self {
        let known: Vec<String> = FileVersion::ALL.iter().map(|v| v.to_string()).collect();
        Self::new(
            FormatErrorCode::RocketUnsupportedVersion,
            format!("file declares unsupported version {}", raw),
        )
        .with_details(format!("supported: {}", known.join(", ")))
    }

    pub fn malformed_header(reason: impl Into<String>) -> Self {
        Self::new(FormatErrorCode::RocketMalformedHeader, reason)
    }

    pub fn corrupt_body(reason: impl Into<String>) -> Self {
        Self::new(FormatErrorCode::RocketCorruptBody, reason)
    }

    /// A feature turned up in a file whose declared version predates it
    pub fn feature_above_version(feature: Feature, declared: FileVersion) -> Self {
        Self::new(
            FormatErrorCode::RocketCorruptBody,
            format!(
                "feature {} requires version {} but file declares {}",
                feature,
                feature.introduced_in(),
                declared
            ),
        )
    }

    pub fn missing_required_field(field: &str, version: FileVersion) -> Self {
        Self::new(
            FormatErrorCode::RocketMissingRequiredField,
            format!("missing field required by version {}", version),
        )
        .with_details(format!("field: {}", field))
    }

    pub fn input_too_large(declared: u64, limit: u64) -> Self {
        Self::new(
            FormatErrorCode::RocketInputTooLarge,
            format!("body of {} bytes exceeds the {} byte limit", declared, limit),
        )
    }

    /// Requested version cannot represent everything in the document
    pub fn version_downgrade(
        requested: FileVersion,
        required: FileVersion,
        blocking: &[Feature],
    ) -> Self {
        let names: Vec<&str> = blocking.iter().map(Feature::as_str).collect();
        Self::new(
            FormatErrorCode::RocketVersionDowngrade,
            format!(
                "requested version {} is below required version {}",
                requested, required
            ),
        )
        .with_details(format!("features: {}", names.join(", ")))
    }

    pub fn io_write(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(FormatErrorCode::RocketIoWriteError, message)
        }
    }

    pub fn io_read(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(FormatErrorCode::RocketIoReadError, message)
        }
    }

    /// Returns the error code
    pub fn code(&self) -> FormatErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Whether the failure came from the sink or source rather than the data
    pub fn is_io(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Human-readable text for display to a user.
    pub fn describe(&self, translator: &dyn Translator) -> String {
        format!("{}: {}", translator.translate(self.code.message_key()), self.message)
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for format operations
pub type FormatResult<T> = Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::PassthroughTranslator;
    use std::error::Error;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            FormatErrorCode::RocketUnsupportedVersion.code(),
            "ROCKET_UNSUPPORTED_VERSION"
        );
        assert_eq!(FormatErrorCode::RocketCorruptBody.code(), "ROCKET_CORRUPT_BODY");
        assert_eq!(
            FormatErrorCode::RocketVersionDowngrade.code(),
            "ROCKET_VERSION_DOWNGRADE"
        );
    }

    #[test]
    fn test_io_errors_keep_source() {
        let err = FormatError::io_read(
            "read failed",
            io::Error::new(io::ErrorKind::BrokenPipe, "closed"),
        );
        assert!(err.is_io());
        assert_eq!(err.severity(), Severity::Error);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unsupported_version_lists_known() {
        let err = FormatError::unsupported_version(103);
        let text = err.to_string();
        assert!(text.contains("REJECT"));
        assert!(text.contains("103"));
        assert!(text.contains("100, 101, 104, 105, 106, 107, 108"));
        assert!(!err.is_io());
    }

    #[test]
    fn test_missing_field_names_field() {
        let err = FormatError::missing_required_field("component.id", FileVersion::V104);
        assert_eq!(err.details(), Some("field: component.id"));
        assert!(err.message().contains("104"));
    }

    #[test]
    fn test_describe_uses_translator_key() {
        let err = FormatError::corrupt_body("checksum mismatch");
        assert_eq!(
            err.describe(&PassthroughTranslator),
            "error.corrupt_body: checksum mismatch"
        );
    }
}
