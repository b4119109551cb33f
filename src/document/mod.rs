//! Rocket design document model
//!
//! The document is the unit of save and load: a rocket component tree,
//! its flight configurations, the simulations run against it, and
//! document-level custom expressions.
//!
//! # Design Principles
//!
//! - Plain owned data, no shared identity between a saved and a loaded copy
//! - Component kinds are a closed tagged enum so feature detection is
//!   checked for exhaustiveness at compile time
//! - Ordered collections (`Vec`, `BTreeMap`) everywhere so serialization is
//!   deterministic

mod component;
mod flight;
pub(crate) mod nullable_f64;
mod simulation;

pub use component::{
    Appearance, Color, Component, ComponentKind, ComponentType, Decal, FinTabData,
    LaunchLugData, MassComponentData, MotorMount, MotorPlacement, MotorRef, NoseConeData,
    NoseShape, ParachuteData, ParallelStageData, PodSetData, PresetRef, RecoveryData,
    StageData, StageSeparation, StreamerData, TransitionData, TrapezoidFinSetData,
    TubeData, TubeFinSetData,
};
pub use flight::{
    DeployEvent, DeploymentConfig, FlightConfiguration, IgnitionConfig, IgnitionEvent,
    SeparationConfig, SeparationEvent,
};
pub use simulation::{
    CustomExpression, FlightData, FlightDataBranch, FlightEvent, FlightSummary,
    GenericExtension, ParamValue, ScriptingExtension, Simulation, SimulationConfig,
    SimulationExtension, SimulationStatus,
};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a component within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(Uuid);

impl ComponentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a flight configuration; keys all per-configuration overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightConfigId(Uuid);

impl FlightConfigId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for FlightConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The rocket: metadata, flight configurations and the component tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Rocket {
    pub name: String,
    pub designer: Option<String>,
    pub revision: Option<String>,
    pub comment: Option<String>,
    pub flight_configurations: Vec<FlightConfiguration>,
    pub selected_configuration: Option<FlightConfigId>,
    pub children: Vec<Component>,
}

impl Rocket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            designer: None,
            revision: None,
            comment: None,
            flight_configurations: Vec::new(),
            selected_configuration: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn component_count(&self) -> usize {
        self.children.iter().map(Component::subtree_len).sum()
    }

    pub fn find(&self, id: ComponentId) -> Option<&Component> {
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }
}

/// Root aggregate persisted by the saver and rebuilt by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub rocket: Rocket,
    pub simulations: Vec<Simulation>,
    pub custom_expressions: Vec<CustomExpression>,
}

impl Document {
    pub fn new(rocket: Rocket) -> Self {
        Self {
            rocket,
            simulations: Vec::new(),
            custom_expressions: Vec::new(),
        }
    }

    pub fn with_simulation(mut self, simulation: Simulation) -> Self {
        self.simulations.push(simulation);
        self
    }

    /// True when there is nothing beyond the rocket's own metadata.
    pub fn is_empty(&self) -> bool {
        self.rocket.children.is_empty()
            && self.rocket.flight_configurations.is_empty()
            && self.simulations.is_empty()
            && self.custom_expressions.is_empty()
    }

    /// All scripting extensions across all simulations.
    pub fn scripts(&self) -> impl Iterator<Item = &ScriptingExtension> {
        self.simulations.iter().flat_map(Simulation::scripts)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Rocket::new("Rocket"))
    }
}
