//! Docker operations module
//!
//! This module provides the Docker side of a host tunnel:
//! - Docker client wrapper bound to a tunneled transport
//! - Docker-specific error types
//! - Loopback relay that carries Docker API traffic over a dialer
//! - Daemon version compatibility checks

mod client;
mod error;
mod transport;
pub mod version;

// Core types
pub use client::{DaemonInfo, DockerClient, parse_api_version};
pub use error::DockerError;
pub use transport::TunnelTransport;

// Version gate
pub use version::{Compatibility, VersionError, VersionTable, check_docker_version};

/// Docker endpoint addressed through the tunnel
pub const DOCKER_ENDPOINT: &str = "unix:///var/run/docker.sock";

/// Remote socket path opened by SSH dialers
pub const DOCKER_SOCKET_PATH: &str = "/var/run/docker.sock";

/// Docker API version requested from the daemon
pub const DOCKER_API_VERSION: &str = "1.24";

/// Orchestration release used as the key into the version table
pub const K8S_VERSION: &str = "1.8";
