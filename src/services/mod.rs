//! Collaborator interfaces consumed by the loader
//!
//! Motor and preset catalogs and message translation belong to the host
//! application. The format core only sees them through these traits. Simple
//! in-memory implementations are provided for hosts and tests.

mod motor;
mod preset;
mod translator;

pub use motor::{Motor, MotorDatabase, MotorLookup};
pub use preset::{Preset, PresetCatalog, PresetLookup};
pub use translator::{PassthroughTranslator, Translator};

use thiserror::Error;

/// Result type for collaborator lookups
pub type LookupResult<T> = Result<T, LookupError>;

/// Lookup failures reported by collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No motor with this manufacturer and designation
    #[error("Motor not found: {manufacturer} {designation}")]
    MotorNotFound {
        manufacturer: String,
        designation: String,
    },

    /// No preset with this id
    #[error("Component preset not found: {0}")]
    PresetNotFound(String),
}
