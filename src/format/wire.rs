//! JSON body model
//!
//! The body mirrors the document tree, but every field a grammar may treat
//! as optional is an `Option` here. Requiredness and defaults are decided by
//! the grammar in `codec`, not by serde, so a missing field surfaces as
//! `ROCKET_MISSING_REQUIRED_FIELD` rather than a generic decode error.
//!
//! Non-finite floats in flight data are written as `null` and read back as
//! NaN.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{
    Appearance, ComponentId, ComponentType, CustomExpression, DeploymentConfig,
    FlightConfigId, FlightConfiguration, FlightEvent, IgnitionConfig, MotorRef, NoseShape,
    ParamValue, PresetRef, SeparationConfig, SimulationConfig, SimulationStatus,
};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DocumentWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rocket: Option<RocketWire>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub simulations: Vec<SimulationWire>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_expressions: Vec<CustomExpression>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RocketWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_configurations: Option<Vec<FlightConfiguration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_configuration: Option<FlightConfigId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ComponentWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ComponentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ComponentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axial_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<PresetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<Appearance>,
    #[serde(flatten)]
    pub props: PropsWire,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentWire>,
}

/// Kind-specific properties; each kind writes only the ones it has.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PropsWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<NoseShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fore_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aft_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fin_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_chord: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_chord: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radial_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separation: Option<SeparationConfig>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub separation_overrides: BTreeMap<FlightConfigId, SeparationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentConfig>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub deployment_overrides: BTreeMap<FlightConfigId, DeploymentConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motor_mount: Option<MotorMountWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MotorMountWire {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub motors: BTreeMap<FlightConfigId, MotorPlacementWire>,
    #[serde(default)]
    pub ignition: IgnitionConfig,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ignition_overrides: BTreeMap<FlightConfigId, IgnitionConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MotorPlacementWire {
    pub motor: MotorRef,
    #[serde(default, with = "crate::document::nullable_f64")]
    pub ejection_delay: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SimulationWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SimulationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SimulationConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<ExtensionWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<FlightDataWire>,
}

pub const EXTENSION_GENERIC: &str = "generic";
pub const EXTENSION_SCRIPTING: &str = "scripting";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExtensionWire {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Accepted from other writers; never written and never honored.
    #[serde(default, skip_serializing)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FlightDataWire {
    #[serde(default)]
    pub summary: SummaryWire,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<BranchWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SummaryWire {
    pub max_altitude: Option<f64>,
    pub max_velocity: Option<f64>,
    pub max_acceleration: Option<f64>,
    pub time_to_apogee: Option<f64>,
    pub flight_time: Option<f64>,
    pub ground_hit_velocity: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BranchWire {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<FlightEvent>,
}

/// `None` for values JSON cannot carry.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

pub fn or_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}
