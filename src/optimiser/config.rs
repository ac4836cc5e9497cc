//! Optimiser configuration.

use serde::{Deserialize, Serialize};

/// Constant-folding options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimiserConfig {
    /// Check that every descendant of a static node is static before
    /// folding it. A failing node is left in place and reported.
    pub verify_static_descendants: bool,

    /// Emit a debug event for every replaced subtree.
    pub log_replacements: bool,
}

impl Default for OptimiserConfig {
    fn default() -> Self {
        Self {
            verify_static_descendants: true,
            log_replacements: false,
        }
    }
}

impl OptimiserConfig {
    /// Toggle the static-descendants check.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_static_descendants = verify;
        self
    }

    /// Toggle per-replacement logging.
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log_replacements = log;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OptimiserConfig::default();
        assert!(config.verify_static_descendants);
        assert!(!config.log_replacements);
    }

    #[test]
    fn test_builder_pattern() {
        let config = OptimiserConfig::default().with_verification(false).with_logging(true);
        assert!(!config.verify_static_descendants);
        assert!(config.log_replacements);
    }

    #[test]
    fn test_serialization() {
        let config = OptimiserConfig::default().with_logging(true);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: OptimiserConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
