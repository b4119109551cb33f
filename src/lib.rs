//! rocketstore - Versioned persistence for rocket design documents
//!
//! Saves a rocket design, its flight configurations and simulations in the
//! lowest file format version able to represent it, and loads any known
//! version back. Scripts embedded in a file are only enabled when the host's
//! trust store says so.

pub mod config;
pub mod document;
pub mod format;
pub mod observability;
pub mod services;
pub mod trust;
pub mod version;

pub use config::{LoaderConfig, StorageOptions};
pub use document::Document;
pub use format::{FormatError, FormatErrorCode, FormatResult, LoadedDocument, Loader, Saver};
pub use trust::TrustStore;
pub use version::FileVersion;
