//! Sanitizer configuration.

use serde::{Deserialize, Serialize};

/// Default upper bound on fragment size (1 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Runtime limits for [`HtmlSanitizer`](crate::HtmlSanitizer).
///
/// The allowlist itself is a [`Policy`](crate::Policy); this struct only
/// carries resource limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Inputs longer than this many bytes are rejected outright.
    pub max_input_bytes: usize,
}

impl SanitizerConfig {
    /// Create a config with default limits.
    pub const fn new() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    /// Set the maximum accepted input size in bytes.
    pub const fn with_max_input_bytes(mut self, max: usize) -> Self {
        self.max_input_bytes = max;
        self
    }
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SanitizerConfig::default();
        assert_eq!(config.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }

    #[test]
    fn test_builder() {
        let config = SanitizerConfig::new().with_max_input_bytes(64);
        assert_eq!(config.max_input_bytes, 64);
    }

    #[test]
    fn test_config_serialization() {
        let config = SanitizerConfig::new().with_max_input_bytes(4096);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SanitizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        // Missing fields fall back to defaults
        let parsed: SanitizerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }
}
