//! Docker-specific error types
//!
//! This module defines errors that can occur while talking to a remote
//! Docker daemon through a tunnel, with actionable messages for common issues.

use thiserror::Error;

/// Errors that can occur during Docker operations
#[derive(Error, Debug)]
pub enum DockerError {
    /// Failed to connect to the Docker daemon
    #[error("Docker connection failed: {0}")]
    Connection(String),

    /// Docker daemon is not running on the remote host
    #[error("Docker daemon not running on the remote host. Start the Docker service.")]
    NotRunning,

    /// Permission denied accessing Docker socket
    #[error(
        "Permission denied accessing Docker socket. The SSH user may need to be in the 'docker' group."
    )]
    PermissionDenied,

    /// API version string could not be understood
    #[error("Invalid Docker API version: {0}")]
    InvalidApiVersion(String),

    /// Daemon answered with an error status
    #[error("Docker API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Daemon answered with a body that could not be decoded
    #[error("Invalid response from Docker daemon: {0}")]
    InvalidResponse(String),

    /// Operation timed out
    #[error("Docker operation timed out")]
    Timeout,
}

impl From<reqwest::Error> for DockerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return DockerError::Timeout;
        }

        let msg = err.to_string();

        // Detect common error patterns and provide better messages
        if msg.contains("Cannot connect to the Docker daemon")
            || msg.contains("connection refused")
            || msg.contains("No such file or directory")
        {
            DockerError::NotRunning
        } else if msg.contains("permission denied") || msg.contains("Permission denied") {
            DockerError::PermissionDenied
        } else if err.is_decode() {
            DockerError::InvalidResponse(msg)
        } else {
            DockerError::Connection(msg)
        }
    }
}
