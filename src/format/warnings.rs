//! Non-fatal load findings
//!
//! A warning never stops a load. The referenced data stays in the document
//! exactly as stored.

use std::fmt;

use crate::services::Translator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// Motor reference unknown to the motor database
    MotorNotFound,
    /// Motor found, but its thrust-curve digest differs from the stored one
    MotorDigestMismatch,
    /// Preset reference unknown to the preset catalog
    PresetNotFound,
    /// Script loaded without a matching trust entry
    ScriptDisabled,
}

impl WarningKind {
    pub fn message_key(&self) -> &'static str {
        match self {
            WarningKind::MotorNotFound => "warning.motor_not_found",
            WarningKind::MotorDigestMismatch => "warning.motor_digest_mismatch",
            WarningKind::PresetNotFound => "warning.preset_not_found",
            WarningKind::ScriptDisabled => "warning.script_disabled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub kind: WarningKind,
    /// What the warning is about, e.g. "Estes A8" or a preset id.
    pub subject: String,
}

impl LoadWarning {
    pub fn new(kind: WarningKind, subject: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
        }
    }

    /// Human-readable text for display to a user.
    pub fn describe(&self, translator: &dyn Translator) -> String {
        format!("{}: {}", translator.translate(self.kind.message_key()), self.subject)
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.message_key(), self.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_describe_translates_key() {
        let mut table = HashMap::new();
        table.insert(
            "warning.motor_not_found".to_string(),
            "Motor not found".to_string(),
        );
        let warning = LoadWarning::new(WarningKind::MotorNotFound, "Estes A8");
        assert_eq!(warning.describe(&table), "Motor not found: Estes A8");
    }

    #[test]
    fn test_display_uses_raw_key() {
        let warning = LoadWarning::new(WarningKind::ScriptDisabled, "javascript");
        assert_eq!(warning.to_string(), "warning.script_disabled: javascript");
    }
}
