//! Configuration for the settings write path.

use reportkit_sanitizer::SanitizerConfig;
use serde::{Deserialize, Serialize};

/// Stock count used when the form omits it.
pub const DEFAULT_STOCK_COUNT: u32 = 6;

/// Settings service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Limits for the template-field sanitizer.
    pub sanitizer: SanitizerConfig,

    /// Stock count assumed when none is submitted.
    pub default_stock_count: u32,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            sanitizer: SanitizerConfig::default(),
            default_stock_count: DEFAULT_STOCK_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SettingsConfig::default();
        assert_eq!(config.default_stock_count, 6);
        assert_eq!(config.sanitizer, SanitizerConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config: SettingsConfig =
            serde_json::from_str(r#"{"sanitizer": {"max_input_bytes": 2048}}"#).unwrap();
        assert_eq!(config.sanitizer.max_input_bytes, 2048);
        assert_eq!(config.default_stock_count, DEFAULT_STOCK_COUNT);
    }
}
