//! Shared test rockets and file helpers
//!
//! Each builder produces the smallest document that needs a given format
//! version, on top of a plain three-part rocket.

#![allow(dead_code)]

use std::sync::Arc;

use rocketstore::document::{
    Appearance, Color, Component, ComponentKind, CustomExpression, Decal, DeployEvent,
    DeploymentConfig, FinTabData, FlightConfiguration, FlightData, FlightDataBranch,
    FlightEvent, FlightSummary, GenericExtension, IgnitionConfig, IgnitionEvent,
    MassComponentData, MotorMount, MotorPlacement, MotorRef, NoseConeData, NoseShape, ParachuteData,
    ParallelStageData, ParamValue, PodSetData, PresetRef, RecoveryData, Rocket,
    ScriptingExtension, SeparationConfig, SeparationEvent, Simulation, SimulationExtension,
    StageData, TrapezoidFinSetData, TubeData, TubeFinSetData,
};
use rocketstore::format::{FileHeader, HEADER_LEN};
use rocketstore::{Document, FileVersion, Loader, Saver, StorageOptions, TrustStore};

pub const SCRIPT_ENGINE: &str = "JavaScript";

/// Script text with characters that need escaping in most formats.
pub const AWKWARD_SCRIPT: &str = "// Test <  &\n// >\n// <![CDATA[";

pub const TIME_SKIP: f64 = 0.05;

// =============================================================================
// Test Rockets
// =============================================================================

fn nose_cone() -> Component {
    Component::new(
        "Nose cone",
        ComponentKind::NoseCone(NoseConeData {
            shape: NoseShape::Ogive,
            length: 0.1,
            aft_radius: 0.0125,
            thickness: 0.002,
        }),
    )
}

fn body_tube() -> Component {
    Component::new(
        "Body tube",
        ComponentKind::BodyTube(TubeData {
            length: 0.3,
            outer_radius: 0.0125,
            thickness: 0.0005,
            motor_mount: None,
        }),
    )
}

fn fin_set() -> Component {
    Component::new(
        "Fins",
        ComponentKind::TrapezoidFinSet(TrapezoidFinSetData {
            fin_count: 3,
            root_chord: 0.05,
            tip_chord: 0.03,
            height: 0.04,
            sweep: 0.02,
            thickness: 0.003,
        }),
    )
}

fn parachute(deployment: DeploymentConfig) -> Component {
    Component::new(
        "Parachute",
        ComponentKind::Parachute(ParachuteData {
            diameter: 0.3,
            recovery: RecoveryData {
                cd: 0.8,
                deployment,
                overrides: Default::default(),
            },
        }),
    )
}

/// Sustainer stage with nose, body (fins inside) and the given extras on the body.
fn sustainer(body_extras: Vec<Component>) -> Component {
    let mut body = body_tube().with_child(fin_set());
    body.children.extend(body_extras);
    Component::new("Sustainer", ComponentKind::Stage(StageData::default()))
        .with_child(nose_cone())
        .with_child(body)
}

fn rocket_with(name: &str, body_extras: Vec<Component>) -> Rocket {
    Rocket::new(name).with_child(sustainer(body_extras))
}

/// Baseline rocket: needs nothing beyond version 100.
pub fn v100_plain() -> Document {
    Document::new(rocket_with("v100 plain", Vec::new()))
}

pub fn v101_fin_tabs() -> Document {
    let mut rocket = rocket_with("v101 fin tabs", Vec::new());
    let tab = Component::new(
        "Fin tab",
        ComponentKind::FinTab(FinTabData {
            height: 0.01,
            length: 0.02,
            position: 0.005,
        }),
    );
    rocket.children[0].children[1].children[0].children.push(tab);
    Document::new(rocket)
}

pub fn v101_tube_coupler_child() -> Document {
    let coupler = Component::new(
        "Coupler",
        ComponentKind::TubeCoupler(TubeData {
            length: 0.05,
            outer_radius: 0.012,
            thickness: 0.0005,
            motor_mount: None,
        }),
    )
    .with_child(Component::new(
        "Ballast",
        ComponentKind::MassComponent(MassComponentData { mass: 0.01 }),
    ));
    Document::new(rocket_with("v101 coupler child", vec![coupler]))
}

/// Four seconds of coast at 100 Hz with events on sample times.
pub fn flight_data() -> FlightData {
    let rows: Vec<Vec<f64>> = (0..=400)
        .map(|i| {
            let t = i as f64 * 0.01;
            let altitude = 100.0 * t - 12.5 * t * t;
            vec![t, altitude, 100.0 - 25.0 * t]
        })
        .collect();
    FlightData {
        summary: FlightSummary {
            max_altitude: 200.0,
            max_velocity: 100.0,
            max_acceleration: 25.0,
            time_to_apogee: 4.0,
            flight_time: 4.0,
            ground_hit_velocity: f64::NAN,
        },
        branches: vec![FlightDataBranch {
            name: "Sustainer".into(),
            columns: vec!["Time".into(), "Altitude".into(), "Vertical velocity".into()],
            events: vec![
                FlightEvent {
                    time: rows[0][0],
                    kind: "launch".into(),
                },
                FlightEvent {
                    time: rows[123][0],
                    kind: "burnout".into(),
                },
            ],
            rows,
        }],
    }
}

pub fn v104_simulation_data() -> Document {
    Document::new(rocket_with("v104 simulation data", Vec::new()))
        .with_simulation(Simulation::new("Simulation 1").with_data(flight_data()))
}

fn motor_mount(config: &FlightConfiguration) -> MotorMount {
    let mut mount = MotorMount::default();
    mount.motors.insert(
        config.id,
        MotorPlacement {
            motor: MotorRef {
                manufacturer: "Estes".into(),
                designation: "C6".into(),
                digest: Some("digest-c6".into()),
            },
            ejection_delay: 5.0,
        },
    );
    mount
}

fn motor_tube(mount: MotorMount) -> Component {
    Component::new(
        "Motor mount",
        ComponentKind::InnerTube(TubeData {
            length: 0.07,
            outer_radius: 0.0095,
            thickness: 0.0005,
            motor_mount: Some(mount),
        }),
    )
}

pub fn v104_motor_configuration() -> Document {
    let config = FlightConfiguration::new("[C6-5]");
    let mut rocket = rocket_with("v104 motor", vec![motor_tube(motor_mount(&config))]);
    rocket.selected_configuration = Some(config.id);
    rocket.flight_configurations.push(config);
    Document::new(rocket)
}

pub fn v105_component_preset() -> Document {
    let mut rocket = rocket_with("v105 preset", Vec::new());
    rocket.children[0].children[1].preset = Some(PresetRef {
        id: "estes-bt-50".into(),
        manufacturer: "Estes".into(),
        part_number: "BT-50".into(),
    });
    Document::new(rocket)
}

pub fn v105_custom_expression() -> Document {
    let mut doc = Document::new(rocket_with("v105 expression", Vec::new()));
    doc.custom_expressions.push(CustomExpression {
        name: "Kinetic energy".into(),
        symbol: "Ek".into(),
        unit: "J".into(),
        expression: "0.5 * m * v^2".into(),
    });
    doc
}

pub fn v105_lower_stage_recovery() -> Document {
    let chute = parachute(DeploymentConfig {
        event: DeployEvent::LowerStageSeparation,
        altitude: 0.0,
        delay: 0.0,
    });
    Document::new(rocket_with("v105 lower stage recovery", vec![chute]))
}

pub fn v106_appearance() -> Document {
    let mut rocket = rocket_with("v106 appearance", Vec::new());
    rocket.children[0].children[0].appearance = Some(Appearance {
        paint: Color::rgb(200, 30, 30),
        shine: 0.6,
        decal: Some(Decal {
            image: "decals/flame.png".into(),
            scale: 1.5,
            rotation: 0.25,
        }),
    });
    Document::new(rocket)
}

pub fn v106_ignition_override() -> Document {
    let mut doc = v104_motor_configuration();
    doc.rocket.name = "v106 ignition".into();
    let config = doc.rocket.flight_configurations[0].id;
    let mount_tube = &mut doc.rocket.children[0].children[1].children[1];
    if let ComponentKind::InnerTube(tube) = &mut mount_tube.kind {
        if let Some(mount) = &mut tube.motor_mount {
            mount.ignition_overrides.insert(
                config,
                IgnitionConfig {
                    event: IgnitionEvent::Launch,
                    delay: 0.5,
                },
            );
        }
    }
    doc
}

pub fn v106_deployment_override() -> Document {
    let config = FlightConfiguration::new("high");
    let mut chute = parachute(DeploymentConfig::default());
    if let ComponentKind::Parachute(p) = &mut chute.kind {
        p.recovery.overrides.insert(
            config.id,
            DeploymentConfig {
                event: DeployEvent::Altitude,
                altitude: 150.0,
                delay: 0.0,
            },
        );
    }
    let mut rocket = rocket_with("v106 deployment", vec![chute]);
    rocket.flight_configurations.push(config);
    Document::new(rocket)
}

pub fn v106_separation_override() -> Document {
    let config = FlightConfiguration::new("staged");
    let mut rocket = rocket_with("v106 separation", Vec::new());
    if let ComponentKind::Stage(stage) = &mut rocket.children[0].kind {
        stage.separation.overrides.insert(
            config.id,
            SeparationConfig {
                event: SeparationEvent::Burnout,
                delay: 1.0,
            },
        );
    }
    rocket.flight_configurations.push(config);
    Document::new(rocket)
}

pub fn v107_simulation_extension() -> Document {
    let mut params = std::collections::BTreeMap::new();
    params.insert("roll_rate".to_string(), ParamValue::Number(2.5));
    params.insert("enabled_below".to_string(), ParamValue::Bool(true));
    params.insert("label".to_string(), ParamValue::Text("spin".into()));
    let extension = SimulationExtension::Generic(GenericExtension {
        extension_id: "roll-control".into(),
        params,
    });
    Document::new(rocket_with("v107 extension", Vec::new()))
        .with_simulation(Simulation::new("Simulation 1").with_extension(extension))
}

pub fn v107_tube_fins() -> Document {
    let fins = Component::new(
        "Tube fins",
        ComponentKind::TubeFinSet(TubeFinSetData {
            fin_count: 6,
            length: 0.05,
            outer_radius: 0.006,
            thickness: 0.0004,
        }),
    );
    Document::new(rocket_with("v107 tube fins", vec![fins]))
}

pub fn v108_script(script: &str) -> Document {
    let extension =
        SimulationExtension::Scripting(ScriptingExtension::new(SCRIPT_ENGINE, script));
    Document::new(rocket_with("v108 script", Vec::new()))
        .with_simulation(Simulation::new("Simulation 1").with_extension(extension))
}

pub fn v108_boosters() -> Document {
    let boosters = Component::new(
        "Boosters",
        ComponentKind::ParallelStage(ParallelStageData {
            instance_count: 3,
            radial_offset: 0.03,
            angle_offset: 0.0,
            ..ParallelStageData::default()
        }),
    )
    .with_child(body_tube());
    Document::new(rocket_with("v108 boosters", vec![boosters]))
}

pub fn v108_pod_sets() -> Document {
    let pods = Component::new(
        "Pods",
        ComponentKind::PodSet(PodSetData {
            instance_count: 2,
            radial_offset: 0.04,
        }),
    )
    .with_child(body_tube());
    Document::new(rocket_with("v108 pods", vec![pods]))
}

/// Every test rocket with the version it needs.
pub fn all_test_rockets() -> Vec<(&'static str, Document, FileVersion)> {
    vec![
        ("v100_plain", v100_plain(), FileVersion::V100),
        ("v101_fin_tabs", v101_fin_tabs(), FileVersion::V101),
        ("v101_tube_coupler_child", v101_tube_coupler_child(), FileVersion::V101),
        ("v104_simulation_data", v104_simulation_data(), FileVersion::V104),
        ("v104_motor_configuration", v104_motor_configuration(), FileVersion::V104),
        ("v105_component_preset", v105_component_preset(), FileVersion::V105),
        ("v105_custom_expression", v105_custom_expression(), FileVersion::V105),
        ("v105_lower_stage_recovery", v105_lower_stage_recovery(), FileVersion::V105),
        ("v106_appearance", v106_appearance(), FileVersion::V106),
        ("v106_ignition_override", v106_ignition_override(), FileVersion::V106),
        ("v106_deployment_override", v106_deployment_override(), FileVersion::V106),
        ("v106_separation_override", v106_separation_override(), FileVersion::V106),
        ("v107_simulation_extension", v107_simulation_extension(), FileVersion::V107),
        ("v107_tube_fins", v107_tube_fins(), FileVersion::V107),
        ("v108_script", v108_script(AWKWARD_SCRIPT), FileVersion::V108),
        ("v108_boosters", v108_boosters(), FileVersion::V108),
        ("v108_pod_sets", v108_pod_sets(), FileVersion::V108),
    ]
}

// =============================================================================
// Save / Load Helpers
// =============================================================================

pub fn options() -> StorageOptions {
    StorageOptions::default().with_simulation_time_skip(TIME_SKIP)
}

pub fn save(doc: &Document, opts: &StorageOptions) -> Vec<u8> {
    Saver::new().to_bytes(doc, opts).expect("save failed")
}

/// Loader whose trust store trusts every script in `doc`.
pub fn trusting_loader(doc: &Document) -> Loader {
    let trust = Arc::new(TrustStore::new());
    for script in doc.scripts() {
        trust.set_trusted(&script.engine_id, &script.script_body, true);
    }
    Loader::new(trust)
}

pub fn untrusting_loader() -> Loader {
    Loader::new(Arc::new(TrustStore::new()))
}

/// What a load should return for `doc` saved with `time_skip`, assuming
/// every script is trusted.
pub fn expected_after_round_trip(doc: &Document, time_skip: f64) -> Document {
    let mut expected = doc.clone();
    for simulation in &mut expected.simulations {
        simulation.data = simulation.data.as_ref().map(|d| d.thinned(time_skip));
    }
    expected
}

/// Replaces NaN summary values so documents can be compared with `==`.
pub fn scrub_nan(doc: &mut Document) {
    for simulation in &mut doc.simulations {
        if let Some(data) = &mut simulation.data {
            let s = &mut data.summary;
            for v in [
                &mut s.max_altitude,
                &mut s.max_velocity,
                &mut s.max_acceleration,
                &mut s.time_to_apogee,
                &mut s.flight_time,
                &mut s.ground_hit_velocity,
            ] {
                if v.is_nan() {
                    *v = -1.0;
                }
            }
        }
    }
}

/// Frames an arbitrary JSON body as a file declaring `version`.
pub fn frame_raw(version: FileVersion, body: &[u8]) -> Vec<u8> {
    let header = FileHeader {
        version,
        compressed: false,
        body_len: body.len() as u64,
    };
    let mut out = header.encode().to_vec();
    out.extend_from_slice(body);
    out.extend_from_slice(&crc32fast::hash(body).to_le_bytes());
    out
}

/// Rewrites the header of `bytes` with a raw version number and a valid checksum.
pub fn with_raw_version(bytes: &[u8], raw_version: u32) -> Vec<u8> {
    let mut out = bytes.to_vec();
    out[4..8].copy_from_slice(&raw_version.to_le_bytes());
    let checksum = crc32fast::hash(&out[0..20]);
    out[20..HEADER_LEN].copy_from_slice(&checksum.to_le_bytes());
    out
}
