//! File version negotiation
//!
//! Decides which on-disk format version a document needs. The feature table
//! lives in [`Feature::introduced_in`]; the walk that finds features lives
//! in [`calculator`].
//!
//! # Invariants
//!
//! - The calculated version is never below any present feature's version
//! - It is never above the highest such version unless explicitly requested
//! - Adding a feature never lowers the calculated version

mod calculator;
mod feature;
mod file_version;

pub use calculator::{calculate, required_version, scan_features};
pub use feature::{component_features, document_features, simulation_features, Feature, WalkContext};
pub use file_version::FileVersion;
