//! Configuration schema for fleetlink
//!
//! Defines the structure and defaults for the config.json file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::docker::VersionTable;

/// Main configuration structure for fleetlink
///
/// Serialized to/from `~/.config/fleetlink/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    pub version: u32,

    /// SSH connect timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Override of the built-in supported Docker version table
    /// Format: {"1.8": ["1.12.6", "1.13.1"]}
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_versions: Option<VersionTable>,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            connect_timeout_secs: default_connect_timeout_secs(),
            docker_versions: None,
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check values serde cannot reject on its own
    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout_secs == 0 {
            return Err("connect_timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }

    /// SSH connect timeout
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Effective Docker version table: the override if set, else built-in
    pub fn version_table(&self) -> VersionTable {
        self.docker_versions.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::K8S_VERSION;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert!(config.docker_versions.is_none());
        assert!(config.version_table().supported(K8S_VERSION).is_some());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"version": 1}"#).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_version_table_override() {
        let json = r#"{"version": 1, "docker_versions": {"1.8": ["1.12.0"]}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let table = config.version_table();
        assert_eq!(table.supported("1.8"), Some(&["1.12.0".to_string()][..]));
    }

    #[test]
    fn test_zero_connect_timeout_is_invalid() {
        let config: Config =
            serde_json::from_str(r#"{"version": 1, "connect_timeout_secs": 0}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("connect_timeout_secs"));

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let json = r#"{"version": 1, "bind": "0.0.0.0"}"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }
}
