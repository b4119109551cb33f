//! Rocket component tree
//!
//! Every component shares a common envelope (id, name, placement, preset,
//! appearance, children) and carries a tagged [`ComponentKind`] with the
//! kind-specific geometry and flight-configuration data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::flight::{DeploymentConfig, IgnitionConfig, SeparationConfig};
use super::{ComponentId, FlightConfigId};

/// A single node of the component hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    /// Axial offset relative to the parent, in meters.
    pub axial_offset: f64,
    pub comment: Option<String>,
    pub preset: Option<PresetRef>,
    pub appearance: Option<Appearance>,
    pub kind: ComponentKind,
    pub children: Vec<Component>,
}

impl Component {
    /// Create a component with a fresh id and no children.
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: ComponentId::generate(),
            name: name.into(),
            axial_offset: 0.0,
            comment: None,
            preset: None,
            appearance: None,
            kind,
            children: Vec::new(),
        }
    }

    /// Builder-style child attachment.
    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_preset(mut self, preset: PresetRef) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    /// Number of components in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Component::subtree_len).sum::<usize>()
    }

    /// Depth-first pre-order search by id.
    pub fn find(&self, id: ComponentId) -> Option<&Component> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Mutable depth-first pre-order search by id.
    pub fn find_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }
}

/// Kind-specific component data.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    Stage(StageData),
    /// A booster stage mounted in parallel with its parent stage.
    ParallelStage(ParallelStageData),
    PodSet(PodSetData),
    NoseCone(NoseConeData),
    Transition(TransitionData),
    BodyTube(TubeData),
    InnerTube(TubeData),
    TubeCoupler(TubeData),
    TrapezoidFinSet(TrapezoidFinSetData),
    TubeFinSet(TubeFinSetData),
    FinTab(FinTabData),
    LaunchLug(LaunchLugData),
    Parachute(ParachuteData),
    Streamer(StreamerData),
    MassComponent(MassComponentData),
}

impl ComponentKind {
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentKind::Stage(_) => ComponentType::Stage,
            ComponentKind::ParallelStage(_) => ComponentType::ParallelStage,
            ComponentKind::PodSet(_) => ComponentType::PodSet,
            ComponentKind::NoseCone(_) => ComponentType::NoseCone,
            ComponentKind::Transition(_) => ComponentType::Transition,
            ComponentKind::BodyTube(_) => ComponentType::BodyTube,
            ComponentKind::InnerTube(_) => ComponentType::InnerTube,
            ComponentKind::TubeCoupler(_) => ComponentType::TubeCoupler,
            ComponentKind::TrapezoidFinSet(_) => ComponentType::TrapezoidFinSet,
            ComponentKind::TubeFinSet(_) => ComponentType::TubeFinSet,
            ComponentKind::FinTab(_) => ComponentType::FinTab,
            ComponentKind::LaunchLug(_) => ComponentType::LaunchLug,
            ComponentKind::Parachute(_) => ComponentType::Parachute,
            ComponentKind::Streamer(_) => ComponentType::Streamer,
            ComponentKind::MassComponent(_) => ComponentType::MassComponent,
        }
    }

    /// Motor mount carried by body tubes, inner tubes and couplers, if any.
    pub fn motor_mount(&self) -> Option<&MotorMount> {
        match self {
            ComponentKind::BodyTube(t)
            | ComponentKind::InnerTube(t)
            | ComponentKind::TubeCoupler(t) => t.motor_mount.as_ref(),
            _ => None,
        }
    }

    /// Recovery deployment settings for parachutes and streamers.
    pub fn recovery(&self) -> Option<&RecoveryData> {
        match self {
            ComponentKind::Parachute(p) => Some(&p.recovery),
            ComponentKind::Streamer(s) => Some(&s.recovery),
            _ => None,
        }
    }

    /// Separation settings for stage kinds.
    pub fn separation(&self) -> Option<&StageSeparation> {
        match self {
            ComponentKind::Stage(s) => Some(&s.separation),
            ComponentKind::ParallelStage(p) => Some(&p.separation),
            _ => None,
        }
    }
}

/// Fieldless discriminant of [`ComponentKind`], also the on-disk tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Stage,
    ParallelStage,
    PodSet,
    NoseCone,
    Transition,
    BodyTube,
    InnerTube,
    TubeCoupler,
    TrapezoidFinSet,
    TubeFinSet,
    FinTab,
    LaunchLug,
    Parachute,
    Streamer,
    MassComponent,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Stage => "stage",
            ComponentType::ParallelStage => "parallel_stage",
            ComponentType::PodSet => "pod_set",
            ComponentType::NoseCone => "nose_cone",
            ComponentType::Transition => "transition",
            ComponentType::BodyTube => "body_tube",
            ComponentType::InnerTube => "inner_tube",
            ComponentType::TubeCoupler => "tube_coupler",
            ComponentType::TrapezoidFinSet => "trapezoid_fin_set",
            ComponentType::TubeFinSet => "tube_fin_set",
            ComponentType::FinTab => "fin_tab",
            ComponentType::LaunchLug => "launch_lug",
            ComponentType::Parachute => "parachute",
            ComponentType::Streamer => "streamer",
            ComponentType::MassComponent => "mass_component",
        }
    }
}

/// Default separation event plus per-flight-configuration overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageSeparation {
    pub default: SeparationConfig,
    pub overrides: BTreeMap<FlightConfigId, SeparationConfig>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageData {
    pub separation: StageSeparation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallelStageData {
    pub instance_count: u32,
    pub radial_offset: f64,
    pub angle_offset: f64,
    pub separation: StageSeparation,
}

impl Default for ParallelStageData {
    fn default() -> Self {
        Self {
            instance_count: 2,
            radial_offset: 0.0,
            angle_offset: 0.0,
            separation: StageSeparation::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PodSetData {
    pub instance_count: u32,
    pub radial_offset: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoseShape {
    #[default]
    Ogive,
    Conical,
    Ellipsoid,
    Parabolic,
    PowerSeries,
    Haack,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoseConeData {
    pub shape: NoseShape,
    pub length: f64,
    pub aft_radius: f64,
    pub thickness: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionData {
    pub shape: NoseShape,
    pub length: f64,
    pub fore_radius: f64,
    pub aft_radius: f64,
}

/// Geometry shared by body tubes, inner tubes and couplers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TubeData {
    pub length: f64,
    pub outer_radius: f64,
    pub thickness: f64,
    pub motor_mount: Option<MotorMount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrapezoidFinSetData {
    pub fin_count: u32,
    pub root_chord: f64,
    pub tip_chord: f64,
    pub height: f64,
    pub sweep: f64,
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TubeFinSetData {
    pub fin_count: u32,
    pub length: f64,
    pub outer_radius: f64,
    pub thickness: f64,
}

/// Through-the-wall tab on a fin set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinTabData {
    pub height: f64,
    pub length: f64,
    pub position: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchLugData {
    pub length: f64,
    pub outer_radius: f64,
}

/// Deployment settings shared by parachutes and streamers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecoveryData {
    pub cd: f64,
    pub deployment: DeploymentConfig,
    pub overrides: BTreeMap<FlightConfigId, DeploymentConfig>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParachuteData {
    pub diameter: f64,
    pub recovery: RecoveryData,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamerData {
    pub length: f64,
    pub width: f64,
    pub recovery: RecoveryData,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MassComponentData {
    pub mass: f64,
}

/// Motor mount attached to a body or inner tube.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotorMount {
    pub motors: BTreeMap<FlightConfigId, MotorPlacement>,
    pub ignition: IgnitionConfig,
    pub ignition_overrides: BTreeMap<FlightConfigId, IgnitionConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotorPlacement {
    pub motor: MotorRef,
    pub ejection_delay: f64,
}

/// Reference to a motor in an external thrust-curve database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorRef {
    pub manufacturer: String,
    pub designation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Reference to an entry in an external component-preset catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetRef {
    pub id: String,
    pub manufacturer: String,
    pub part_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decal {
    pub image: String,
    #[serde(with = "super::nullable_f64")]
    pub scale: f64,
    #[serde(with = "super::nullable_f64")]
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub paint: Color,
    #[serde(with = "super::nullable_f64")]
    pub shine: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decal: Option<Decal>,
}
