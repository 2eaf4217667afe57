//! Host configuration schema
//!
//! Data structures for storing fleet node configurations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Default private key location
pub const DEFAULT_SSH_KEY_PATH: &str = "~/.ssh/id_rsa";

/// Configuration for a fleet node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// SSH hostname or IP address
    pub address: String,

    /// SSH port (default: 22)
    #[serde(default)]
    pub port: Option<u16>,

    /// SSH username (default: current user from whoami)
    #[serde(default = "default_user")]
    pub user: String,

    /// Inline private key material; takes precedence over `ssh_key_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,

    /// Path to SSH private key (default: ~/.ssh/id_rsa)
    #[serde(default = "default_ssh_key_path")]
    pub ssh_key_path: String,

    /// Fail tunnel setup when the Docker version is unsupported
    /// (default: false, only warn)
    #[serde(default)]
    pub enforce_docker_version: bool,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

fn default_user() -> String {
    whoami::username()
}

fn default_ssh_key_path() -> String {
    DEFAULT_SSH_KEY_PATH.to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            port: None,
            user: default_user(),
            ssh_key: None,
            ssh_key_path: default_ssh_key_path(),
            enforce_docker_version: false,
            description: None,
        }
    }
}

impl HostConfig {
    /// Create a new host config with just an address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set user
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Builder pattern: set port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Builder pattern: set inline private key material
    pub fn with_ssh_key(mut self, key: impl Into<String>) -> Self {
        self.ssh_key = Some(key.into());
        self
    }

    /// Builder pattern: set private key path
    pub fn with_ssh_key_path(mut self, path: impl Into<String>) -> Self {
        self.ssh_key_path = path.into();
        self
    }

    /// Builder pattern: enforce Docker version support
    pub fn with_enforce_docker_version(mut self, enforce: bool) -> Self {
        self.enforce_docker_version = enforce;
        self
    }

    /// Builder pattern: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Effective SSH port
    pub fn ssh_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SSH_PORT)
    }
}

/// Root structure for hosts.json file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HostsFile {
    /// Schema version for future migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Map of host name to configuration
    #[serde(default)]
    pub hosts: BTreeMap<String, HostConfig>,
}

fn default_version() -> u32 {
    1
}

impl HostsFile {
    /// Create empty hosts file
    pub fn new() -> Self {
        Self {
            version: default_version(),
            hosts: BTreeMap::new(),
        }
    }

    /// Add a host
    pub fn add_host(&mut self, name: impl Into<String>, config: HostConfig) {
        self.hosts.insert(name.into(), config);
    }

    /// Remove a host
    pub fn remove_host(&mut self, name: &str) -> Option<HostConfig> {
        self.hosts.remove(name)
    }

    /// Get a host by name
    pub fn get_host(&self, name: &str) -> Option<&HostConfig> {
        self.hosts.get(name)
    }

    /// Check if host exists
    pub fn has_host(&self, name: &str) -> bool {
        self.hosts.contains_key(name)
    }

    /// Get list of host names
    pub fn host_names(&self) -> Vec<&str> {
        self.hosts.keys().map(|s| s.as_str()).collect()
    }
}
