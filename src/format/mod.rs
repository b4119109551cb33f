//! Versioned rocket document container format
//!
//! A file is a fixed-size header, a JSON body (optionally gzipped) and a
//! checksum over the stored body. The header names the format version; the
//! body is read with that version's grammar.
//!
//! # Design Principles
//!
//! - Write the lowest version that can represent the document
//! - Read every known version; refuse anything else before touching the body
//! - Checksums on both header and body; corruption is never repaired
//! - Scripts are never enabled by what a file says about itself
//!
//! # Invariants
//!
//! - A failed save writes nothing when the failure is detected before I/O
//! - A failed load returns no document
//! - Saving, loading and saving again yields identical bytes for documents
//!   whose data is already thinned

mod checksum;
mod codec;
mod errors;
mod estimate;
mod grammar;
mod header;
mod loader;
mod saver;
mod warnings;
mod wire;

pub use errors::{FormatError, FormatErrorCode, FormatResult, Severity};
pub use estimate::estimate_file_size;
pub use grammar::{grammar_for, Field, Grammar};
pub use header::{FileHeader, FLAG_GZIP, HEADER_LEN, MAGIC, TRAILER_LEN};
pub use loader::{read_header, LoadedDocument, Loader};
pub use saver::Saver;
pub use warnings::{LoadWarning, WarningKind};
