//! Compile configuration.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Options recognized by the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    /// Let many-to-many contract fields carry nested creation payloads of the
    /// related class as well as plain ids.
    pub nested_creations: bool,
}

impl CompileConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable nested creations.
    pub fn with_nested_creations(mut self, enabled: bool) -> Self {
        self.nested_creations = enabled;
        self
    }

    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert!(!CompileConfig::new().nested_creations);
        assert!(CompileConfig::new().with_nested_creations(true).nested_creations);
    }

    #[test]
    fn test_from_json() {
        let config = CompileConfig::from_json(r#"{"nested_creations": true}"#).unwrap();
        assert!(config.nested_creations);

        let config = CompileConfig::from_json("{}").unwrap();
        assert_eq!(config, CompileConfig::default());
    }

    #[test]
    fn test_unknown_option_rejected() {
        let result = CompileConfig::from_json(r#"{"nested": true}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
