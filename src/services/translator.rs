//! Message lookup for human-readable strings

use std::collections::HashMap;

/// Maps message keys to display text.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Returns every key unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Fixed key/value table; unknown keys fall through unchanged.
impl Translator for HashMap<String, String> {
    fn translate(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_returns_key() {
        assert_eq!(PassthroughTranslator.translate("warning.motor_not_found"), "warning.motor_not_found");
    }

    #[test]
    fn test_table_translator_falls_through() {
        let mut table = HashMap::new();
        table.insert("error.corrupt_body".to_string(), "The file is damaged".to_string());
        assert_eq!(table.translate("error.corrupt_body"), "The file is damaged");
        assert_eq!(table.translate("other"), "other");
    }
}
