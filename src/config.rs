//! Configuration loader - YAML manifest of choices + spin tuning

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::wheel::SpinTuning;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Main configuration loaded from choices.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Choice names, in wheel order
    #[serde(default)]
    pub choices: Vec<String>,
    /// Animation tuning overrides
    #[serde(default)]
    pub wheel: SpinTuning,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Spin tuning with malformed values floored
    pub fn tuning(&self) -> SpinTuning {
        self.wheel.sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = "\
choices:
  - Pizza
  - Sushi
wheel:
  duration_ms: 3000
  min_turns: 4.0
  extra_turns: 2.0
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.choices, ["Pizza", "Sushi"]);
        assert_eq!(config.wheel.duration_ms, 3000);
        assert_eq!(config.wheel.min_turns, 4.0);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: Config = serde_yaml::from_str("choices: [A, B]").unwrap();
        assert_eq!(config.wheel.duration_ms, 5_000);
        assert_eq!(config.wheel.min_turns, 5.0);

        let empty: Config = serde_yaml::from_str("{}").unwrap();
        assert!(empty.choices.is_empty());
    }

    #[test]
    fn test_tuning_is_sanitized() {
        let config: Config =
            serde_yaml::from_str("wheel: { duration_ms: 0, min_turns: 0.0 }").unwrap();
        let tuning = config.tuning();
        assert_eq!(tuning.duration_ms, 5_000);
        assert_eq!(tuning.min_turns, 1.0);
    }
}
