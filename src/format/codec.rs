//! Conversion between the document tree and the JSON body model
//!
//! Encoding is total: every document can be expressed. Decoding consults
//! the version's [`Grammar`] for every field that may be absent, so the same
//! routine serves all versions while the version-specific rules stay in the
//! grammar table.

use crate::config::StorageOptions;
use crate::document::{
    Component, ComponentId, ComponentKind, ComponentType, Document, FinTabData, FlightData,
    FlightDataBranch, FlightSummary, GenericExtension, LaunchLugData, MassComponentData,
    MotorMount, MotorPlacement, NoseConeData, ParachuteData, ParallelStageData, PodSetData,
    RecoveryData, Rocket, ScriptingExtension, Simulation, SimulationExtension, StageData,
    StageSeparation, StreamerData, TransitionData, TrapezoidFinSetData, TubeData,
    TubeFinSetData,
};

use super::errors::{FormatError, FormatResult};
use super::grammar::{Field, Grammar};
use super::wire::{
    finite, or_nan, BranchWire, ComponentWire, DocumentWire, ExtensionWire, FlightDataWire,
    MotorMountWire, MotorPlacementWire, PropsWire, RocketWire, SimulationWire, SummaryWire,
    EXTENSION_GENERIC, EXTENSION_SCRIPTING,
};

// =============================================================================
// Encoding
// =============================================================================

pub fn encode_document(
    document: &Document,
    grammar: &Grammar,
    options: &StorageOptions,
) -> DocumentWire {
    DocumentWire {
        rocket: Some(encode_rocket(&document.rocket, grammar)),
        simulations: document
            .simulations
            .iter()
            .map(|s| encode_simulation(s, options))
            .collect(),
        custom_expressions: document.custom_expressions.clone(),
    }
}

fn encode_rocket(rocket: &Rocket, grammar: &Grammar) -> RocketWire {
    let write_configs = grammar.requires(Field::FlightConfigurations)
        || !rocket.flight_configurations.is_empty();

    RocketWire {
        name: Some(rocket.name.clone()),
        designer: rocket.designer.clone(),
        revision: rocket.revision.clone(),
        comment: rocket.comment.clone(),
        flight_configurations: write_configs.then(|| rocket.flight_configurations.clone()),
        selected_configuration: rocket.selected_configuration,
        children: rocket.children.iter().map(encode_component).collect(),
    }
}

fn encode_component(component: &Component) -> ComponentWire {
    ComponentWire {
        kind: Some(component.component_type()),
        id: Some(component.id),
        name: Some(component.name.clone()),
        axial_offset: finite(component.axial_offset),
        comment: component.comment.clone(),
        preset: component.preset.clone(),
        appearance: component.appearance.clone(),
        props: encode_props(&component.kind),
        children: component.children.iter().map(encode_component).collect(),
    }
}

fn encode_separation(props: &mut PropsWire, separation: &StageSeparation) {
    props.separation = Some(separation.default);
    props.separation_overrides = separation.overrides.clone();
}

fn encode_recovery(props: &mut PropsWire, recovery: &RecoveryData) {
    props.cd = finite(recovery.cd);
    props.deployment = Some(recovery.deployment);
    props.deployment_overrides = recovery.overrides.clone();
}

fn encode_tube(props: &mut PropsWire, tube: &TubeData) {
    props.length = finite(tube.length);
    props.outer_radius = finite(tube.outer_radius);
    props.thickness = finite(tube.thickness);
    props.motor_mount = tube.motor_mount.as_ref().map(encode_motor_mount);
}

fn encode_motor_mount(mount: &MotorMount) -> MotorMountWire {
    MotorMountWire {
        motors: mount
            .motors
            .iter()
            .map(|(id, p)| {
                (
                    *id,
                    MotorPlacementWire {
                        motor: p.motor.clone(),
                        ejection_delay: p.ejection_delay,
                    },
                )
            })
            .collect(),
        ignition: mount.ignition,
        ignition_overrides: mount.ignition_overrides.clone(),
    }
}

fn encode_props(kind: &ComponentKind) -> PropsWire {
    let mut props = PropsWire::default();
    match kind {
        ComponentKind::Stage(s) => encode_separation(&mut props, &s.separation),
        ComponentKind::ParallelStage(p) => {
            props.instance_count = Some(p.instance_count);
            props.radial_offset = finite(p.radial_offset);
            props.angle_offset = finite(p.angle_offset);
            encode_separation(&mut props, &p.separation);
        }
        ComponentKind::PodSet(p) => {
            props.instance_count = Some(p.instance_count);
            props.radial_offset = finite(p.radial_offset);
        }
        ComponentKind::NoseCone(n) => {
            props.shape = Some(n.shape);
            props.length = finite(n.length);
            props.aft_radius = finite(n.aft_radius);
            props.thickness = finite(n.thickness);
        }
        ComponentKind::Transition(t) => {
            props.shape = Some(t.shape);
            props.length = finite(t.length);
            props.fore_radius = finite(t.fore_radius);
            props.aft_radius = finite(t.aft_radius);
        }
        ComponentKind::BodyTube(t) | ComponentKind::InnerTube(t) | ComponentKind::TubeCoupler(t) => {
            encode_tube(&mut props, t)
        }
        ComponentKind::TrapezoidFinSet(f) => {
            props.fin_count = Some(f.fin_count);
            props.root_chord = finite(f.root_chord);
            props.tip_chord = finite(f.tip_chord);
            props.height = finite(f.height);
            props.sweep = finite(f.sweep);
            props.thickness = finite(f.thickness);
        }
        ComponentKind::TubeFinSet(f) => {
            props.fin_count = Some(f.fin_count);
            props.length = finite(f.length);
            props.outer_radius = finite(f.outer_radius);
            props.thickness = finite(f.thickness);
        }
        ComponentKind::FinTab(t) => {
            props.height = finite(t.height);
            props.length = finite(t.length);
            props.position = finite(t.position);
        }
        ComponentKind::LaunchLug(l) => {
            props.length = finite(l.length);
            props.outer_radius = finite(l.outer_radius);
        }
        ComponentKind::Parachute(p) => {
            props.diameter = finite(p.diameter);
            encode_recovery(&mut props, &p.recovery);
        }
        ComponentKind::Streamer(s) => {
            props.length = finite(s.length);
            props.width = finite(s.width);
            encode_recovery(&mut props, &s.recovery);
        }
        ComponentKind::MassComponent(m) => props.mass = finite(m.mass),
    }
    props
}

fn encode_simulation(simulation: &Simulation, options: &StorageOptions) -> SimulationWire {
    let data = simulation
        .data
        .as_ref()
        .filter(|_| options.stores_simulation_data())
        .map(|d| encode_flight_data(&d.thinned(options.simulation_time_skip)));

    SimulationWire {
        name: Some(simulation.name.clone()),
        status: Some(simulation.status),
        config: Some(simulation.config.clone()),
        extensions: simulation.extensions.iter().map(encode_extension).collect(),
        data,
    }
}

fn encode_extension(extension: &SimulationExtension) -> ExtensionWire {
    match extension {
        SimulationExtension::Generic(g) => ExtensionWire {
            kind: Some(EXTENSION_GENERIC.to_string()),
            id: Some(g.extension_id.clone()),
            params: g.params.clone(),
            ..ExtensionWire::default()
        },
        // The enabled flag is deliberately not persisted.
        SimulationExtension::Scripting(s) => ExtensionWire {
            kind: Some(EXTENSION_SCRIPTING.to_string()),
            engine: Some(s.engine_id.clone()),
            script: Some(s.script_body.clone()),
            ..ExtensionWire::default()
        },
    }
}

fn encode_flight_data(data: &FlightData) -> FlightDataWire {
    let s = &data.summary;
    FlightDataWire {
        summary: SummaryWire {
            max_altitude: finite(s.max_altitude),
            max_velocity: finite(s.max_velocity),
            max_acceleration: finite(s.max_acceleration),
            time_to_apogee: finite(s.time_to_apogee),
            flight_time: finite(s.flight_time),
            ground_hit_velocity: finite(s.ground_hit_velocity),
        },
        branches: data
            .branches
            .iter()
            .map(|b| BranchWire {
                name: b.name.clone(),
                columns: b.columns.clone(),
                rows: b
                    .rows
                    .iter()
                    .map(|row| row.iter().map(|v| finite(*v)).collect())
                    .collect(),
                events: b.events.clone(),
            })
            .collect(),
    }
}

// =============================================================================
// Decoding
// =============================================================================

pub fn decode_document(wire: DocumentWire, grammar: &Grammar) -> FormatResult<Document> {
    let rocket = grammar.field_or(wire.rocket, Field::Rocket, RocketWire::default)?;

    let simulations = wire
        .simulations
        .into_iter()
        .map(|s| decode_simulation(s, grammar))
        .collect::<FormatResult<Vec<_>>>()?;

    Ok(Document {
        rocket: decode_rocket(rocket, grammar)?,
        simulations,
        custom_expressions: wire.custom_expressions,
    })
}

fn decode_rocket(wire: RocketWire, grammar: &Grammar) -> FormatResult<Rocket> {
    Ok(Rocket {
        name: grammar.field_or(wire.name, Field::RocketName, String::new)?,
        designer: wire.designer,
        revision: wire.revision,
        comment: wire.comment,
        flight_configurations: grammar.field_or(
            wire.flight_configurations,
            Field::FlightConfigurations,
            Vec::new,
        )?,
        selected_configuration: wire.selected_configuration,
        children: decode_components(wire.children, grammar)?,
    })
}

fn decode_components(wires: Vec<ComponentWire>, grammar: &Grammar) -> FormatResult<Vec<Component>> {
    wires
        .into_iter()
        .map(|c| decode_component(c, grammar))
        .collect()
}

fn decode_component(wire: ComponentWire, grammar: &Grammar) -> FormatResult<Component> {
    let component_type = grammar
        .field(wire.kind, Field::ComponentKind)?
        .ok_or_else(|| FormatError::corrupt_body("component without kind"))?;

    Ok(Component {
        id: grammar.field_or(wire.id, Field::ComponentId, ComponentId::generate)?,
        name: grammar.field_or(wire.name, Field::ComponentName, String::new)?,
        axial_offset: num(wire.axial_offset),
        comment: wire.comment,
        preset: wire.preset,
        appearance: wire.appearance,
        kind: decode_props(component_type, wire.props),
        children: decode_components(wire.children, grammar)?,
    })
}

fn num(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

fn count(value: Option<u32>) -> u32 {
    value.unwrap_or(1)
}

fn decode_separation(props: &mut PropsWire) -> StageSeparation {
    StageSeparation {
        default: props.separation.unwrap_or_default(),
        overrides: std::mem::take(&mut props.separation_overrides),
    }
}

fn decode_recovery(props: &mut PropsWire) -> RecoveryData {
    RecoveryData {
        cd: num(props.cd),
        deployment: props.deployment.unwrap_or_default(),
        overrides: std::mem::take(&mut props.deployment_overrides),
    }
}

fn decode_tube(props: PropsWire) -> TubeData {
    TubeData {
        length: num(props.length),
        outer_radius: num(props.outer_radius),
        thickness: num(props.thickness),
        motor_mount: props.motor_mount.map(|m| MotorMount {
            motors: m
                .motors
                .into_iter()
                .map(|(id, p)| {
                    (
                        id,
                        MotorPlacement {
                            motor: p.motor,
                            ejection_delay: p.ejection_delay,
                        },
                    )
                })
                .collect(),
            ignition: m.ignition,
            ignition_overrides: m.ignition_overrides,
        }),
    }
}

fn decode_props(component_type: ComponentType, mut props: PropsWire) -> ComponentKind {
    match component_type {
        ComponentType::Stage => ComponentKind::Stage(StageData {
            separation: decode_separation(&mut props),
        }),
        ComponentType::ParallelStage => ComponentKind::ParallelStage(ParallelStageData {
            instance_count: count(props.instance_count),
            radial_offset: num(props.radial_offset),
            angle_offset: num(props.angle_offset),
            separation: decode_separation(&mut props),
        }),
        ComponentType::PodSet => ComponentKind::PodSet(PodSetData {
            instance_count: count(props.instance_count),
            radial_offset: num(props.radial_offset),
        }),
        ComponentType::NoseCone => ComponentKind::NoseCone(NoseConeData {
            shape: props.shape.unwrap_or_default(),
            length: num(props.length),
            aft_radius: num(props.aft_radius),
            thickness: num(props.thickness),
        }),
        ComponentType::Transition => ComponentKind::Transition(TransitionData {
            shape: props.shape.unwrap_or_default(),
            length: num(props.length),
            fore_radius: num(props.fore_radius),
            aft_radius: num(props.aft_radius),
        }),
        ComponentType::BodyTube => ComponentKind::BodyTube(decode_tube(props)),
        ComponentType::InnerTube => ComponentKind::InnerTube(decode_tube(props)),
        ComponentType::TubeCoupler => ComponentKind::TubeCoupler(decode_tube(props)),
        ComponentType::TrapezoidFinSet => ComponentKind::TrapezoidFinSet(TrapezoidFinSetData {
            fin_count: count(props.fin_count),
            root_chord: num(props.root_chord),
            tip_chord: num(props.tip_chord),
            height: num(props.height),
            sweep: num(props.sweep),
            thickness: num(props.thickness),
        }),
        ComponentType::TubeFinSet => ComponentKind::TubeFinSet(TubeFinSetData {
            fin_count: count(props.fin_count),
            length: num(props.length),
            outer_radius: num(props.outer_radius),
            thickness: num(props.thickness),
        }),
        ComponentType::FinTab => ComponentKind::FinTab(FinTabData {
            height: num(props.height),
            length: num(props.length),
            position: num(props.position),
        }),
        ComponentType::LaunchLug => ComponentKind::LaunchLug(LaunchLugData {
            length: num(props.length),
            outer_radius: num(props.outer_radius),
        }),
        ComponentType::Parachute => ComponentKind::Parachute(ParachuteData {
            diameter: num(props.diameter),
            recovery: decode_recovery(&mut props),
        }),
        ComponentType::Streamer => ComponentKind::Streamer(StreamerData {
            length: num(props.length),
            width: num(props.width),
            recovery: decode_recovery(&mut props),
        }),
        ComponentType::MassComponent => ComponentKind::MassComponent(MassComponentData {
            mass: num(props.mass),
        }),
    }
}

fn decode_simulation(wire: SimulationWire, grammar: &Grammar) -> FormatResult<Simulation> {
    let extensions = wire
        .extensions
        .into_iter()
        .map(|e| decode_extension(e, grammar))
        .collect::<FormatResult<Vec<_>>>()?;

    Ok(Simulation {
        name: grammar.field_or(wire.name, Field::SimulationName, String::new)?,
        status: grammar.field_or(wire.status, Field::SimulationStatus, Default::default)?,
        config: wire.config.unwrap_or_default(),
        extensions,
        data: wire.data.map(decode_flight_data),
    })
}

fn decode_extension(wire: ExtensionWire, grammar: &Grammar) -> FormatResult<SimulationExtension> {
    let kind = grammar
        .field(wire.kind, Field::ExtensionType)?
        .ok_or_else(|| FormatError::corrupt_body("simulation extension without type"))?;

    match kind.as_str() {
        EXTENSION_GENERIC => Ok(SimulationExtension::Generic(GenericExtension {
            extension_id: wire.id.unwrap_or_default(),
            params: wire.params,
        })),
        // Stored `enabled` is ignored; the trust gate decides after decoding.
        EXTENSION_SCRIPTING => Ok(SimulationExtension::Scripting(ScriptingExtension {
            engine_id: grammar.field_or(wire.engine, Field::ScriptEngine, String::new)?,
            script_body: grammar.field_or(wire.script, Field::ScriptBody, String::new)?,
            enabled: false,
        })),
        other => Err(FormatError::corrupt_body(format!(
            "unknown simulation extension type '{}'",
            other
        ))),
    }
}

fn decode_flight_data(wire: FlightDataWire) -> FlightData {
    let s = wire.summary;
    FlightData {
        summary: FlightSummary {
            max_altitude: or_nan(s.max_altitude),
            max_velocity: or_nan(s.max_velocity),
            max_acceleration: or_nan(s.max_acceleration),
            time_to_apogee: or_nan(s.time_to_apogee),
            flight_time: or_nan(s.flight_time),
            ground_hit_velocity: or_nan(s.ground_hit_velocity),
        },
        branches: wire
            .branches
            .into_iter()
            .map(|b| FlightDataBranch {
                name: b.name,
                columns: b.columns,
                rows: b
                    .rows
                    .into_iter()
                    .map(|row| row.into_iter().map(or_nan).collect())
                    .collect(),
                events: b.events,
            })
            .collect(),
    }
}
