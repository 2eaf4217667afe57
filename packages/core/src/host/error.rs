//! Host-specific error types
//!
//! Errors that can occur while resolving credentials, dialing a host and
//! bringing up the Docker tunnel, plus hosts-file storage errors.

use std::fmt;

use thiserror::Error;

use crate::docker::{DockerError, VersionError};

/// Errors that can occur during host storage operations
#[derive(Error, Debug)]
pub enum HostError {
    /// Host not found in hosts.json
    #[error("Host not found: {0}")]
    NotFound(String),

    /// Host already exists
    #[error("Host already exists: {0}")]
    AlreadyExists(String),

    /// Failed to load hosts file
    #[error("Failed to load hosts file: {0}")]
    LoadFailed(String),

    /// Failed to save hosts file
    #[error("Failed to save hosts file: {0}")]
    SaveFailed(String),

    /// Invalid host configuration
    #[error("Invalid host configuration: {0}")]
    InvalidConfig(String),
}

/// Structured outcome of a single private key parse attempt
#[derive(Error, Debug)]
pub enum KeyParseError {
    /// The key is encrypted and a passphrase must be supplied
    #[error("private key is encrypted and requires a passphrase")]
    NeedsPassphrase,

    /// Anything else: truncated, unsupported type, bad passphrase
    #[error("{0}")]
    Invalid(String),
}

/// Errors produced while turning key material into a signer
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Key material could not be parsed as a private key
    #[error("Failed to parse private SSH key: {0}")]
    Malformed(String),

    /// Passphrase was supplied but the key could not be decrypted with it
    #[error("Failed to decrypt private SSH key with the supplied passphrase: {0}")]
    WrongPassphrase(String),

    /// Reading the passphrase from the terminal failed
    #[error("Failed to read passphrase: {0}")]
    Prompt(#[source] std::io::Error),

    /// Operator entered an empty passphrase
    #[error("Passphrase entry was declined for encrypted private SSH key")]
    Declined,
}

/// Errors from building the tunnel transport for a host
#[derive(Error, Debug)]
pub enum DialerError {
    /// Credentials for the host could not be resolved
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// SSH connection could not be established
    #[error("SSH connection failed: {0}")]
    Connect(String),

    /// Server rejected public key authentication
    #[error("SSH authentication rejected for user '{user}'")]
    AuthRejected { user: String },

    /// Opening a channel to the remote Docker socket failed
    #[error("Failed to open channel to {socket}: {message}")]
    Channel { socket: String, message: String },

    /// Local loopback relay could not be started
    #[error("Failed to start local tunnel relay: {0}")]
    Relay(#[source] std::io::Error),

    /// Background task running blocking credential work panicked or was cancelled
    #[error("Credential task failed: {0}")]
    Task(String),
}

/// Stage of tunnel setup at which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelStage {
    /// Dialer or tunneled transport setup
    Dialer,
    /// Docker API client construction
    ClientInit,
    /// Docker daemon info query
    DaemonInfo,
    /// Docker version compatibility check
    VersionCheck,
}

impl fmt::Display for TunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TunnelStage::Dialer => "dialer",
            TunnelStage::ClientInit => "client",
            TunnelStage::DaemonInfo => "info",
            TunnelStage::VersionCheck => "version",
        };
        f.write_str(name)
    }
}

/// Errors returned by tunnel setup, each tagged with the host address
#[derive(Error, Debug)]
pub enum TunnelError {
    /// Dialer or tunneled HTTP transport could not be set up
    #[error("Can't establish dialer connection to host [{host}]: {source}")]
    Dialer {
        host: String,
        #[source]
        source: DialerError,
    },

    /// Docker client could not be constructed over the tunnel
    #[error("Can't initiate Docker client for host [{host}]: {source}")]
    ClientInit {
        host: String,
        #[source]
        source: DockerError,
    },

    /// Daemon info query failed
    #[error("Can't retrieve Docker info from host [{host}]: {source}")]
    DaemonInfo {
        host: String,
        #[source]
        source: DockerError,
    },

    /// Compatibility of the daemon version could not be assessed
    #[error("Error while determining supported Docker version on host [{host}]: {source}")]
    VersionUndetermined {
        host: String,
        #[source]
        source: VersionError,
    },

    /// Daemon version is not supported and the host enforces the check
    #[error(
        "Unsupported Docker version found [{version}] on host [{host}], supported versions are [{}]",
        .supported.join(", ")
    )]
    UnsupportedVersion {
        host: String,
        version: String,
        supported: Vec<String>,
    },
}

impl TunnelError {
    /// Stage of tunnel setup this error came from
    pub fn stage(&self) -> TunnelStage {
        match self {
            TunnelError::Dialer { .. } => TunnelStage::Dialer,
            TunnelError::ClientInit { .. } => TunnelStage::ClientInit,
            TunnelError::DaemonInfo { .. } => TunnelStage::DaemonInfo,
            TunnelError::VersionUndetermined { .. } | TunnelError::UnsupportedVersion { .. } => {
                TunnelStage::VersionCheck
            }
        }
    }

    /// Address of the host the error refers to
    pub fn host(&self) -> &str {
        match self {
            TunnelError::Dialer { host, .. }
            | TunnelError::ClientInit { host, .. }
            | TunnelError::DaemonInfo { host, .. }
            | TunnelError::VersionUndetermined { host, .. }
            | TunnelError::UnsupportedVersion { host, .. } => host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_version_lists_supported_set() {
        let err = TunnelError::UnsupportedVersion {
            host: "10.0.0.5".to_string(),
            version: "1.11.0".to_string(),
            supported: vec!["1.12.0".to_string(), "1.13.0".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("[1.11.0]"));
        assert!(msg.contains("[1.12.0, 1.13.0]"));
        assert!(msg.contains("10.0.0.5"));
        assert_eq!(err.stage(), TunnelStage::VersionCheck);
    }

    #[test]
    fn dialer_error_carries_credential_context() {
        let err = TunnelError::Dialer {
            host: "node-1".to_string(),
            source: DialerError::Credential(CredentialError::Declined),
        };
        assert_eq!(err.stage(), TunnelStage::Dialer);
        assert_eq!(err.host(), "node-1");
        assert!(err.to_string().contains("Passphrase entry was declined"));
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(TunnelStage::Dialer.to_string(), "dialer");
        assert_eq!(TunnelStage::DaemonInfo.to_string(), "info");
    }
}
