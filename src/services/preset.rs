//! Component preset lookup

use std::collections::HashMap;

use super::{LookupError, LookupResult};

/// Catalog entry for a purchasable component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub id: String,
    pub manufacturer: String,
    pub part_number: String,
}

/// Resolves preset references found in a document.
pub trait PresetLookup: Send + Sync {
    fn find_preset(&self, id: &str) -> LookupResult<Preset>;
}

/// In-memory preset catalog keyed by id.
#[derive(Debug, Default)]
pub struct PresetCatalog {
    presets: HashMap<String, Preset>,
}

impl PresetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_preset(&mut self, preset: Preset) {
        self.presets.insert(preset.id.clone(), preset);
    }
}

impl PresetLookup for PresetCatalog {
    fn find_preset(&self, id: &str) -> LookupResult<Preset> {
        self.presets
            .get(id)
            .cloned()
            .ok_or_else(|| LookupError::PresetNotFound(id.to_string()))
    }
}
