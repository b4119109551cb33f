//! Flight-configuration event settings
//!
//! Ignition, recovery deployment and stage separation each have a default
//! on the component and may be overridden per flight configuration.

use serde::{Deserialize, Serialize};

use super::FlightConfigId;

/// A named flight configuration of the rocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightConfiguration {
    pub id: FlightConfigId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FlightConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FlightConfigId::generate(),
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnitionEvent {
    #[default]
    Automatic,
    Launch,
    EjectionCharge,
    Burnout,
    Never,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IgnitionConfig {
    pub event: IgnitionEvent,
    #[serde(default, with = "super::nullable_f64")]
    pub delay: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployEvent {
    Launch,
    #[default]
    Ejection,
    Apogee,
    Altitude,
    /// Deploy when the stage below separates.
    LowerStageSeparation,
    Never,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub event: DeployEvent,
    #[serde(default, with = "super::nullable_f64")]
    pub altitude: f64,
    #[serde(default, with = "super::nullable_f64")]
    pub delay: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparationEvent {
    #[default]
    UpperIgnition,
    Ignition,
    Burnout,
    Ejection,
    Launch,
    Never,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeparationConfig {
    pub event: SeparationEvent,
    #[serde(default, with = "super::nullable_f64")]
    pub delay: f64,
}
