//! Simulations, their stored flight data, and simulation extensions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FlightConfigId;

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub name: String,
    pub status: SimulationStatus,
    pub config: SimulationConfig,
    /// Applied in order during a simulation run.
    pub extensions: Vec<SimulationExtension>,
    pub data: Option<FlightData>,
}

impl Simulation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: SimulationStatus::NotSimulated,
            config: SimulationConfig::default(),
            extensions: Vec::new(),
            data: None,
        }
    }

    pub fn with_extension(mut self, extension: SimulationExtension) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn with_data(mut self, data: FlightData) -> Self {
        self.status = SimulationStatus::Uptodate;
        self.data = Some(data);
        self
    }

    /// Scripting extensions in declaration order.
    pub fn scripts(&self) -> impl Iterator<Item = &ScriptingExtension> {
        self.extensions.iter().filter_map(|e| match e {
            SimulationExtension::Scripting(s) => Some(s),
            SimulationExtension::Generic(_) => None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    #[default]
    NotSimulated,
    Uptodate,
    Outdated,
    Loaded,
    CantRun,
    External,
}

/// Launch conditions and integration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_config: Option<FlightConfigId>,
    #[serde(with = "super::nullable_f64")]
    pub launch_rod_length: f64,
    #[serde(with = "super::nullable_f64")]
    pub launch_rod_angle: f64,
    #[serde(with = "super::nullable_f64")]
    pub launch_altitude: f64,
    #[serde(with = "super::nullable_f64")]
    pub wind_speed: f64,
    #[serde(with = "super::nullable_f64")]
    pub time_step: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            flight_config: None,
            launch_rod_length: 1.0,
            launch_rod_angle: 0.0,
            launch_altitude: 0.0,
            wind_speed: 2.0,
            time_step: 0.01,
        }
    }
}

/// Stored results of a simulation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightData {
    pub summary: FlightSummary,
    pub branches: Vec<FlightDataBranch>,
}

impl FlightData {
    pub fn point_count(&self) -> usize {
        self.branches.iter().map(|b| b.rows.len()).sum()
    }

    /// Copy with every branch thinned to `time_skip`.
    pub fn thinned(&self, time_skip: f64) -> FlightData {
        FlightData {
            summary: self.summary.clone(),
            branches: self.branches.iter().map(|b| b.thinned(time_skip)).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightSummary {
    pub max_altitude: f64,
    pub max_velocity: f64,
    pub max_acceleration: f64,
    pub time_to_apogee: f64,
    pub flight_time: f64,
    pub ground_hit_velocity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightEvent {
    #[serde(with = "super::nullable_f64")]
    pub time: f64,
    pub kind: String,
}

/// One branch of flight data. Column 0 is always time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightDataBranch {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub events: Vec<FlightEvent>,
}

impl FlightDataBranch {
    /// Reduce sample density.
    ///
    /// A row survives when it is the first or last row, lies exactly on a
    /// flight event, or is at least `time_skip` seconds after the previously
    /// kept row. Applying the same skip twice keeps the same rows.
    pub fn thinned(&self, time_skip: f64) -> FlightDataBranch {
        if time_skip <= 0.0 || self.rows.len() <= 2 {
            return self.clone();
        }

        let last = self.rows.len() - 1;
        let mut kept: Vec<Vec<f64>> = Vec::with_capacity(self.rows.len());
        let mut last_kept_time = f64::NEG_INFINITY;

        for (i, row) in self.rows.iter().enumerate() {
            let time = row.first().copied().unwrap_or(f64::NAN);
            let on_event = self.events.iter().any(|e| e.time == time);
            if i == 0 || i == last || on_event || time - last_kept_time >= time_skip {
                kept.push(row.clone());
                last_kept_time = time;
            }
        }

        FlightDataBranch {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: kept,
            events: self.events.clone(),
        }
    }
}

/// Pluggable simulation behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationExtension {
    Generic(GenericExtension),
    Scripting(ScriptingExtension),
}

/// An extension identified by id and configured with plain parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericExtension {
    pub extension_id: String,
    pub params: BTreeMap<String, ParamValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(#[serde(with = "super::nullable_f64")] f64),
    Text(String),
}

/// User script executed by a named script engine during simulation.
///
/// `enabled` coming out of the loader reflects the trust store, never the
/// file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptingExtension {
    pub engine_id: String,
    pub script_body: String,
    pub enabled: bool,
}

impl ScriptingExtension {
    pub fn new(engine_id: impl Into<String>, script_body: impl Into<String>) -> Self {
        Self {
            engine_id: engine_id.into(),
            script_body: script_body.into(),
            enabled: true,
        }
    }
}

/// User-defined derived flight quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomExpression {
    pub name: String,
    pub symbol: String,
    pub unit: String,
    pub expression: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(times: &[f64], events: &[f64]) -> FlightDataBranch {
        FlightDataBranch {
            name: "Sustainer".into(),
            columns: vec!["Time".into(), "Altitude".into()],
            rows: times.iter().map(|t| vec![*t, t * 10.0]).collect(),
            events: events
                .iter()
                .map(|t| FlightEvent {
                    time: *t,
                    kind: "apogee".into(),
                })
                .collect(),
        }
    }

    fn times(b: &FlightDataBranch) -> Vec<f64> {
        b.rows.iter().map(|r| r[0]).collect()
    }

    #[test]
    fn test_thinning_keeps_first_last_and_spacing() {
        let b = branch(&[0.0, 0.01, 0.02, 0.05, 0.06, 0.11, 0.12], &[]);
        let thinned = b.thinned(0.05);
        assert_eq!(times(&thinned), vec![0.0, 0.05, 0.11, 0.12]);
    }

    #[test]
    fn test_thinning_keeps_event_rows() {
        let b = branch(&[0.0, 0.01, 0.02, 0.03, 0.2], &[0.02]);
        let thinned = b.thinned(0.1);
        assert_eq!(times(&thinned), vec![0.0, 0.02, 0.2]);
        assert_eq!(thinned.events.len(), 1);
    }

    #[test]
    fn test_thinning_is_idempotent() {
        let all: Vec<f64> = (0..200).map(|i| i as f64 * 0.013).collect();
        let b = branch(&all, &[0.65, 1.3]);
        let once = b.thinned(0.05);
        let twice = once.thinned(0.05);
        assert_eq!(once, twice);
        assert!(once.rows.len() < b.rows.len());
    }

    #[test]
    fn test_zero_skip_keeps_everything() {
        let b = branch(&[0.0, 0.001, 0.002], &[]);
        assert_eq!(b.thinned(0.0), b);
    }

    #[test]
    fn test_scripts_filters_extensions() {
        let sim = Simulation::new("s")
            .with_extension(SimulationExtension::Generic(GenericExtension {
                extension_id: "air-start".into(),
                params: BTreeMap::new(),
            }))
            .with_extension(SimulationExtension::Scripting(ScriptingExtension::new(
                "JavaScript",
                "// noop",
            )));
        let scripts: Vec<_> = sim.scripts().collect();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].engine_id, "JavaScript");
    }
}
