//! Observable events for save and load
//!
//! Events are explicit and typed. Each carries the severity it is logged at
//! unless the call site escalates it.

use std::fmt;

use super::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Save
    /// Save requested
    SaveBegin,
    /// Document written to the sink
    SaveComplete,
    /// Save refused or the sink failed
    SaveRejected,

    // Load
    /// Load requested
    LoadBegin,
    /// Document decoded and gated
    LoadComplete,
    /// Load refused or the source failed
    LoadRejected,

    // Trust gate
    /// Script loaded with no trust entry
    ScriptDisabled,
    /// Script matched a trust entry
    ScriptEnabled,

    // Collaborators
    /// Motor reference not found in the motor database
    MotorUnresolved,
    /// Preset reference not found in the preset catalog
    PresetUnresolved,
}

impl Event {
    pub const ALL: [Event; 10] = [
        Event::SaveBegin,
        Event::SaveComplete,
        Event::SaveRejected,
        Event::LoadBegin,
        Event::LoadComplete,
        Event::LoadRejected,
        Event::ScriptDisabled,
        Event::ScriptEnabled,
        Event::MotorUnresolved,
        Event::PresetUnresolved,
    ];

    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SaveBegin => "ROCKET_SAVE_BEGIN",
            Event::SaveComplete => "ROCKET_SAVE_COMPLETE",
            Event::SaveRejected => "ROCKET_SAVE_REJECTED",
            Event::LoadBegin => "ROCKET_LOAD_BEGIN",
            Event::LoadComplete => "ROCKET_LOAD_COMPLETE",
            Event::LoadRejected => "ROCKET_LOAD_REJECTED",
            Event::ScriptDisabled => "SCRIPT_DISABLED",
            Event::ScriptEnabled => "SCRIPT_ENABLED",
            Event::MotorUnresolved => "MOTOR_UNRESOLVED",
            Event::PresetUnresolved => "PRESET_UNRESOLVED",
        }
    }

    /// Severity this event is normally logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SaveBegin | Event::LoadBegin => Severity::Trace,
            Event::SaveComplete | Event::LoadComplete | Event::ScriptEnabled => Severity::Info,
            Event::SaveRejected
            | Event::LoadRejected
            | Event::ScriptDisabled
            | Event::MotorUnresolved
            | Event::PresetUnresolved => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
