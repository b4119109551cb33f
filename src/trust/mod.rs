//! Script trust gate
//!
//! Decides whether an embedded simulation script may come out of a load
//! enabled. Trust is granted only by explicit host calls and is never read
//! from or written to a document file.
//!
//! # Invariants
//!
//! - Absence of an entry means untrusted
//! - Trust is bound to the exact script content (SHA-256) and engine
//! - Reads are shared, writes are exclusive

mod store;

pub use store::{ScriptIdentity, TrustStore};
