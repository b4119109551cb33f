//! Save and load configuration
//!
//! `StorageOptions` is the per-save value object; `LoaderConfig` bounds
//! what a load is willing to read. Both are plain values with defaults and
//! builder-style setters. `StorageOptions` is serde-enabled so a host can
//! keep it in its JSON preferences.

use serde::{Deserialize, Serialize};

use crate::version::FileVersion;

/// Options for a single save operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    /// Minimum spacing in seconds between stored flight data rows.
    pub simulation_time_skip: f64,
    /// Forces a specific version; must be at or above the required one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_file_version: Option<FileVersion>,
    /// Gzip the body.
    pub compression_enabled: bool,
}

impl StorageOptions {
    /// Store every simulation data row.
    pub const SIMULATION_DATA_ALL: f64 = 0.0;
    /// Store no simulation data at all.
    pub const SIMULATION_DATA_NONE: f64 = f64::INFINITY;

    pub fn with_simulation_time_skip(mut self, time_skip: f64) -> Self {
        self.simulation_time_skip = time_skip;
        self
    }

    pub fn with_explicit_file_version(mut self, version: FileVersion) -> Self {
        self.explicit_file_version = Some(version);
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compression_enabled = enabled;
        self
    }

    /// Whether flight data is written at all.
    pub fn stores_simulation_data(&self) -> bool {
        self.simulation_time_skip.is_finite()
    }

    /// Parses options from a JSON object; missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            simulation_time_skip: Self::SIMULATION_DATA_ALL,
            explicit_file_version: None,
            compression_enabled: false,
        }
    }
}

/// Limits applied while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Upper bound on both the stored and the decompressed body size.
    pub max_input_bytes: u64,
}

impl LoaderConfig {
    pub const DEFAULT_MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

    pub fn with_max_input_bytes(mut self, max_input_bytes: u64) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: Self::DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = StorageOptions::default();
        assert_eq!(opts.simulation_time_skip, 0.0);
        assert!(opts.explicit_file_version.is_none());
        assert!(!opts.compression_enabled);
        assert!(opts.stores_simulation_data());
        assert_eq!(LoaderConfig::default().max_input_bytes, 64 * 1024 * 1024);
    }

    #[test]
    fn test_none_time_skip_drops_data() {
        let opts =
            StorageOptions::default().with_simulation_time_skip(StorageOptions::SIMULATION_DATA_NONE);
        assert!(!opts.stores_simulation_data());
    }

    #[test]
    fn test_from_json_partial() {
        let opts =
            StorageOptions::from_json(r#"{"simulation_time_skip": 0.05, "explicit_file_version": 106}"#)
                .unwrap();
        assert_eq!(opts.simulation_time_skip, 0.05);
        assert_eq!(opts.explicit_file_version, Some(FileVersion::V106));
        assert!(!opts.compression_enabled);
    }

    #[test]
    fn test_from_json_rejects_reserved_version() {
        assert!(StorageOptions::from_json(r#"{"explicit_file_version": 102}"#).is_err());
    }
}
