//! Per-version body grammar table
//!
//! Each known [`FileVersion`] maps to one static [`Grammar`] describing
//! which features the body may carry and which fields must be present.
//! Fields not listed as required fall back to documented defaults when
//! absent:
//!
//! | Field | Default |
//! |---|---|
//! | component id | freshly generated |
//! | simulation status | `not_simulated` |
//! | flight configuration list | empty |
//! | scripting `enabled` | ignored; decided by the trust store |
//! | numeric geometry | `0.0` |
//! | instance and fin counts | `1` |

use super::errors::{FormatError, FormatResult};
use crate::version::{Feature, FileVersion};

/// Body fields whose presence may be mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Rocket,
    RocketName,
    ComponentKind,
    ComponentName,
    ComponentId,
    SimulationName,
    SimulationStatus,
    ExtensionType,
    FlightConfigurations,
    ScriptEngine,
    ScriptBody,
}

impl Field {
    /// Path of the field inside the body, for error messages.
    pub fn path(&self) -> &'static str {
        match self {
            Field::Rocket => "rocket",
            Field::RocketName => "rocket.name",
            Field::ComponentKind => "component.kind",
            Field::ComponentName => "component.name",
            Field::ComponentId => "component.id",
            Field::SimulationName => "simulation.name",
            Field::SimulationStatus => "simulation.status",
            Field::ExtensionType => "extension.type",
            Field::FlightConfigurations => "rocket.flight_configurations",
            Field::ScriptEngine => "extension.engine",
            Field::ScriptBody => "extension.script",
        }
    }
}

/// Body rules for one format version.
#[derive(Debug)]
pub struct Grammar {
    pub version: FileVersion,
    required: &'static [Field],
}

impl Grammar {
    pub fn requires(&self, field: Field) -> bool {
        self.required.contains(&field)
    }

    /// Whether a body at this version may contain `feature`.
    pub fn admits(&self, feature: Feature) -> bool {
        self.version.supports(feature.introduced_in())
    }

    /// Unwraps a decoded field, failing if this version requires it.
    pub fn field<T>(&self, value: Option<T>, field: Field) -> FormatResult<Option<T>> {
        match value {
            None if self.requires(field) => {
                Err(FormatError::missing_required_field(field.path(), self.version))
            }
            other => Ok(other),
        }
    }

    /// Like [`Grammar::field`] but substitutes `default` when absent and allowed.
    pub fn field_or<T>(
        &self,
        value: Option<T>,
        field: Field,
        default: impl FnOnce() -> T,
    ) -> FormatResult<T> {
        Ok(self.field(value, field)?.unwrap_or_else(default))
    }
}

const BASE_FIELDS: &[Field] = &[
    Field::Rocket,
    Field::RocketName,
    Field::ComponentKind,
    Field::ComponentName,
    Field::SimulationName,
    Field::ExtensionType,
];

const V104_FIELDS: &[Field] = &[
    Field::Rocket,
    Field::RocketName,
    Field::ComponentKind,
    Field::ComponentName,
    Field::SimulationName,
    Field::ExtensionType,
    Field::ComponentId,
    Field::SimulationStatus,
];

const V106_FIELDS: &[Field] = &[
    Field::Rocket,
    Field::RocketName,
    Field::ComponentKind,
    Field::ComponentName,
    Field::SimulationName,
    Field::ExtensionType,
    Field::ComponentId,
    Field::SimulationStatus,
    Field::FlightConfigurations,
];

const V108_FIELDS: &[Field] = &[
    Field::Rocket,
    Field::RocketName,
    Field::ComponentKind,
    Field::ComponentName,
    Field::SimulationName,
    Field::ExtensionType,
    Field::ComponentId,
    Field::SimulationStatus,
    Field::FlightConfigurations,
    Field::ScriptEngine,
    Field::ScriptBody,
];

static GRAMMARS: [Grammar; 7] = [
    Grammar {
        version: FileVersion::V100,
        required: BASE_FIELDS,
    },
    Grammar {
        version: FileVersion::V101,
        required: BASE_FIELDS,
    },
    Grammar {
        version: FileVersion::V104,
        required: V104_FIELDS,
    },
    Grammar {
        version: FileVersion::V105,
        required: V104_FIELDS,
    },
    Grammar {
        version: FileVersion::V106,
        required: V106_FIELDS,
    },
    Grammar {
        version: FileVersion::V107,
        required: V106_FIELDS,
    },
    Grammar {
        version: FileVersion::V108,
        required: V108_FIELDS,
    },
];

/// The grammar for a known version.
pub fn grammar_for(version: FileVersion) -> &'static Grammar {
    let index = match version {
        FileVersion::V100 => 0,
        FileVersion::V101 => 1,
        FileVersion::V104 => 2,
        FileVersion::V105 => 3,
        FileVersion::V106 => 4,
        FileVersion::V107 => 5,
        FileVersion::V108 => 6,
    };
    &GRAMMARS[index]
}
