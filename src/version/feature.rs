//! Version-gated features and their detection
//!
//! Each [`Feature`] is a structural capability that first became
//! representable at a specific [`FileVersion`]. Detection is a pure function
//! of a single node plus its walk context; the calculator does the walking.

use std::fmt;

use crate::config::StorageOptions;
use crate::document::{
    Component, ComponentKind, ComponentType, DeployEvent, Document, Simulation,
    SimulationExtension,
};

use super::FileVersion;

/// Features whose presence raises the minimum file version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    FinTabs,
    TubeCouplerChildren,
    SimulationData,
    MotorConfigurations,
    ComponentPresets,
    CustomExpressions,
    LowerStageRecovery,
    Appearances,
    IgnitionOverrides,
    DeploymentOverrides,
    SeparationOverrides,
    SimulationExtensions,
    TubeFins,
    ScriptingExtensions,
    BoosterStages,
    PodSets,
}

impl Feature {
    pub const ALL: [Feature; 16] = [
        Feature::FinTabs,
        Feature::TubeCouplerChildren,
        Feature::SimulationData,
        Feature::MotorConfigurations,
        Feature::ComponentPresets,
        Feature::CustomExpressions,
        Feature::LowerStageRecovery,
        Feature::Appearances,
        Feature::IgnitionOverrides,
        Feature::DeploymentOverrides,
        Feature::SeparationOverrides,
        Feature::SimulationExtensions,
        Feature::TubeFins,
        Feature::ScriptingExtensions,
        Feature::BoosterStages,
        Feature::PodSets,
    ];

    /// The first version able to represent this feature.
    pub const fn introduced_in(self) -> FileVersion {
        match self {
            Feature::FinTabs | Feature::TubeCouplerChildren => FileVersion::V101,
            Feature::SimulationData | Feature::MotorConfigurations => FileVersion::V104,
            Feature::ComponentPresets
            | Feature::CustomExpressions
            | Feature::LowerStageRecovery => FileVersion::V105,
            Feature::Appearances
            | Feature::IgnitionOverrides
            | Feature::DeploymentOverrides
            | Feature::SeparationOverrides => FileVersion::V106,
            Feature::SimulationExtensions | Feature::TubeFins => FileVersion::V107,
            Feature::ScriptingExtensions | Feature::BoosterStages | Feature::PodSets => {
                FileVersion::V108
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::FinTabs => "fin_tabs",
            Feature::TubeCouplerChildren => "tube_coupler_children",
            Feature::SimulationData => "simulation_data",
            Feature::MotorConfigurations => "motor_configurations",
            Feature::ComponentPresets => "component_presets",
            Feature::CustomExpressions => "custom_expressions",
            Feature::LowerStageRecovery => "lower_stage_recovery",
            Feature::Appearances => "appearances",
            Feature::IgnitionOverrides => "ignition_overrides",
            Feature::DeploymentOverrides => "deployment_overrides",
            Feature::SeparationOverrides => "separation_overrides",
            Feature::SimulationExtensions => "simulation_extensions",
            Feature::TubeFins => "tube_fins",
            Feature::ScriptingExtensions => "scripting_extensions",
            Feature::BoosterStages => "booster_stages",
            Feature::PodSets => "pod_sets",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where in the tree a component sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkContext {
    pub parent: Option<ComponentType>,
}

impl WalkContext {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child_of(parent: &Component) -> Self {
        Self {
            parent: Some(parent.component_type()),
        }
    }
}

/// Features carried by a single component, not its descendants.
pub fn component_features(component: &Component, ctx: WalkContext) -> Vec<Feature> {
    let mut found = Vec::new();

    if ctx.parent == Some(ComponentType::TubeCoupler) {
        found.push(Feature::TubeCouplerChildren);
    }
    if component.preset.is_some() {
        found.push(Feature::ComponentPresets);
    }
    if component.appearance.is_some() {
        found.push(Feature::Appearances);
    }

    match &component.kind {
        ComponentKind::FinTab(_) => found.push(Feature::FinTabs),
        ComponentKind::TubeFinSet(_) => found.push(Feature::TubeFins),
        ComponentKind::PodSet(_) => found.push(Feature::PodSets),
        ComponentKind::ParallelStage(p) => {
            found.push(Feature::BoosterStages);
            if !p.separation.overrides.is_empty() {
                found.push(Feature::SeparationOverrides);
            }
        }
        ComponentKind::Stage(s) => {
            if !s.separation.overrides.is_empty() {
                found.push(Feature::SeparationOverrides);
            }
        }
        ComponentKind::BodyTube(t) | ComponentKind::InnerTube(t) | ComponentKind::TubeCoupler(t) => {
            if let Some(mount) = &t.motor_mount {
                if !mount.motors.is_empty() {
                    found.push(Feature::MotorConfigurations);
                }
                if !mount.ignition_overrides.is_empty() {
                    found.push(Feature::IgnitionOverrides);
                }
            }
        }
        ComponentKind::Parachute(_) | ComponentKind::Streamer(_) => {
            if let Some(recovery) = component.kind.recovery() {
                let lower_stage = std::iter::once(&recovery.deployment)
                    .chain(recovery.overrides.values())
                    .any(|d| d.event == DeployEvent::LowerStageSeparation);
                if lower_stage {
                    found.push(Feature::LowerStageRecovery);
                }
                if !recovery.overrides.is_empty() {
                    found.push(Feature::DeploymentOverrides);
                }
            }
        }
        ComponentKind::NoseCone(_)
        | ComponentKind::Transition(_)
        | ComponentKind::TrapezoidFinSet(_)
        | ComponentKind::LaunchLug(_)
        | ComponentKind::MassComponent(_) => {}
    }

    found
}

/// Features carried by a simulation under the given storage options.
pub fn simulation_features(simulation: &Simulation, options: &StorageOptions) -> Vec<Feature> {
    let mut found = Vec::new();

    if simulation.data.is_some() && options.stores_simulation_data() {
        found.push(Feature::SimulationData);
    }
    for extension in &simulation.extensions {
        match extension {
            SimulationExtension::Generic(_) => found.push(Feature::SimulationExtensions),
            SimulationExtension::Scripting(_) => found.push(Feature::ScriptingExtensions),
        }
    }

    found
}

/// Features carried by the document itself rather than a node.
pub fn document_features(document: &Document) -> Vec<Feature> {
    let mut found = Vec::new();
    if !document.custom_expressions.is_empty() {
        found.push(Feature::CustomExpressions);
    }
    if !document.rocket.flight_configurations.is_empty() {
        found.push(Feature::MotorConfigurations);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        FinTabData, FlightConfigId, MotorMount, ParachuteData, RecoveryData, StageData,
        TubeData,
    };

    #[test]
    fn test_every_feature_maps_to_a_known_non_baseline_version() {
        for feature in Feature::ALL {
            let v = feature.introduced_in();
            assert!(FileVersion::ALL.contains(&v));
            assert!(v > FileVersion::BASELINE, "{} must raise the version", feature);
        }
    }

    #[test]
    fn test_fin_tab_detected_on_node() {
        let tab = Component::new("Tab", ComponentKind::FinTab(FinTabData::default()));
        assert_eq!(
            component_features(&tab, WalkContext::root()),
            vec![Feature::FinTabs]
        );
    }

    #[test]
    fn test_coupler_child_detected_from_context() {
        let coupler = Component::new("Coupler", ComponentKind::TubeCoupler(TubeData::default()));
        let child = Component::new(
            "Mass",
            ComponentKind::MassComponent(Default::default()),
        );
        assert!(component_features(&coupler, WalkContext::root()).is_empty());
        assert_eq!(
            component_features(&child, WalkContext::child_of(&coupler)),
            vec![Feature::TubeCouplerChildren]
        );
    }

    #[test]
    fn test_empty_motor_mount_is_not_a_feature() {
        let tube = Component::new(
            "Mount",
            ComponentKind::InnerTube(TubeData {
                motor_mount: Some(MotorMount::default()),
                ..TubeData::default()
            }),
        );
        assert!(component_features(&tube, WalkContext::root()).is_empty());
    }

    #[test]
    fn test_lower_stage_deployment_and_overrides() {
        let mut recovery = RecoveryData::default();
        recovery.deployment.event = DeployEvent::LowerStageSeparation;
        recovery
            .overrides
            .insert(FlightConfigId::generate(), Default::default());
        let chute = Component::new(
            "Chute",
            ComponentKind::Parachute(ParachuteData {
                diameter: 0.3,
                recovery,
            }),
        );
        assert_eq!(
            component_features(&chute, WalkContext::root()),
            vec![Feature::LowerStageRecovery, Feature::DeploymentOverrides]
        );
    }

    #[test]
    fn test_stage_separation_override() {
        let mut data = StageData::default();
        data.separation
            .overrides
            .insert(FlightConfigId::generate(), Default::default());
        let stage = Component::new("Booster", ComponentKind::Stage(data));
        assert_eq!(
            component_features(&stage, WalkContext::root()),
            vec![Feature::SeparationOverrides]
        );
    }
}
