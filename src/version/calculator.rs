//! Minimal file version calculation
//!
//! The required version is the maximum `introduced_in` over every feature
//! found in the document, or the baseline when none is found. An explicit
//! override may raise the result but never lower it.

use std::collections::BTreeSet;

use crate::config::StorageOptions;
use crate::document::{Component, Document};
use crate::format::{FormatError, FormatResult};

use super::feature::{component_features, document_features, simulation_features, WalkContext};
use super::{Feature, FileVersion};

/// Collects every version-gated feature present in the document.
///
/// Walks the whole component hierarchy, the simulation list and the
/// document-level collections.
pub fn scan_features(document: &Document, options: &StorageOptions) -> BTreeSet<Feature> {
    let mut features: BTreeSet<Feature> = document_features(document).into_iter().collect();

    for component in &document.rocket.children {
        walk_component(component, WalkContext::root(), &mut features);
    }
    for simulation in &document.simulations {
        features.extend(simulation_features(simulation, options));
    }

    features
}

fn walk_component(component: &Component, ctx: WalkContext, features: &mut BTreeSet<Feature>) {
    features.extend(component_features(component, ctx));
    let child_ctx = WalkContext::child_of(component);
    for child in &component.children {
        walk_component(child, child_ctx, features);
    }
}

/// Lowest version able to carry all of `features`.
pub fn required_version<'a>(features: impl IntoIterator<Item = &'a Feature>) -> FileVersion {
    features
        .into_iter()
        .map(|f| f.introduced_in())
        .max()
        .unwrap_or(FileVersion::BASELINE)
}

/// Computes the version a save of `document` under `options` must declare.
///
/// # Errors
///
/// Returns `ROCKET_VERSION_DOWNGRADE` if `options.explicit_file_version` is
/// below the version the document's features require.
pub fn calculate(document: &Document, options: &StorageOptions) -> FormatResult<FileVersion> {
    let features = scan_features(document, options);
    let required = required_version(&features);

    match options.explicit_file_version {
        None => Ok(required),
        Some(requested) if requested >= required => Ok(requested),
        Some(requested) => {
            let blocking: Vec<Feature> = features
                .into_iter()
                .filter(|f| f.introduced_in() > requested)
                .collect();
            Err(FormatError::version_downgrade(requested, required, &blocking))
        }
    }
}
