//! fleetlink-core - Core library for fleetlink
//!
//! Opens authenticated SSH tunnels to fleet nodes, binds a Docker client to
//! each tunnel and checks the remote daemon's version against the versions
//! supported by the orchestration release.

pub mod config;
pub mod docker;
pub mod host;
pub mod version;

// Re-export version functions for Rust consumers
pub use version::{get_version, get_version_long};

// Re-export config types
pub use config::{Config, get_hosts_path, load_config, save_config};

// Re-export Docker types
pub use docker::{
    Compatibility, DOCKER_API_VERSION, DOCKER_ENDPOINT, DaemonInfo, DockerClient, DockerError,
    K8S_VERSION, VersionError, VersionTable, check_docker_version,
};

// Re-export host types
pub use host::{
    CredentialError, Dialer, DialerError, DialerFactory, EngineState, Host, HostConfig, HostError,
    HostsFile, SecretPrompt, SshDialerFactory, TerminalPrompt, TunnelError, TunnelOutcome,
    TunnelStage, load_hosts, save_hosts,
};
