//! Motor lookup

use std::collections::HashMap;

use super::{LookupError, LookupResult};

/// Motor as known to a thrust-curve database.
#[derive(Debug, Clone, PartialEq)]
pub struct Motor {
    pub manufacturer: String,
    pub designation: String,
    pub diameter: f64,
    pub length: f64,
    /// Content digest of the thrust curve.
    pub digest: String,
}

/// Resolves motor references found in a document.
pub trait MotorLookup: Send + Sync {
    fn find_motor(&self, manufacturer: &str, designation: &str) -> LookupResult<Motor>;
}

/// In-memory motor table keyed case-insensitively by manufacturer and designation.
#[derive(Debug, Default)]
pub struct MotorDatabase {
    motors: HashMap<(String, String), Motor>,
}

impl MotorDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(manufacturer: &str, designation: &str) -> (String, String) {
        (
            manufacturer.trim().to_lowercase(),
            designation.trim().to_lowercase(),
        )
    }

    /// Adds or replaces a motor.
    pub fn add_motor(&mut self, motor: Motor) {
        let key = Self::key(&motor.manufacturer, &motor.designation);
        self.motors.insert(key, motor);
    }

    pub fn len(&self) -> usize {
        self.motors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motors.is_empty()
    }
}

impl MotorLookup for MotorDatabase {
    fn find_motor(&self, manufacturer: &str, designation: &str) -> LookupResult<Motor> {
        self.motors
            .get(&Self::key(manufacturer, designation))
            .cloned()
            .ok_or_else(|| LookupError::MotorNotFound {
                manufacturer: manufacturer.to_string(),
                designation: designation.to_string(),
            })
    }
}
