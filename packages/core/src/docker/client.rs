//! Docker client wrapper bound to a tunnel
//!
//! The client talks HTTP to the tunnel's loopback relay, which forwards
//! every connection to the remote Docker socket. Every request path carries
//! the pinned API version prefix, e.g. `/v1.24/info`.

use std::net::SocketAddr;
use std::time::Duration;

use bollard::ClientVersion;
use bollard::models::{SystemInfo, SystemVersion};
use serde::de::DeserializeOwned;

use super::error::DockerError;
use super::transport::TunnelTransport;
use super::{DOCKER_API_VERSION, DOCKER_ENDPOINT};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Snapshot of the daemon's `/info` response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaemonInfo {
    pub server_version: Option<String>,
    pub name: Option<String>,
    pub operating_system: Option<String>,
    pub kernel_version: Option<String>,
}

impl From<SystemInfo> for DaemonInfo {
    fn from(info: SystemInfo) -> Self {
        Self {
            server_version: info.server_version,
            name: info.name,
            operating_system: info.operating_system,
            kernel_version: info.kernel_version,
        }
    }
}

/// Docker client wrapper owning its tunnel transport
pub struct DockerClient {
    http: reqwest::Client,
    base_url: String,
    // Keeps the relay alive as long as the client
    transport: TunnelTransport,
}

impl DockerClient {
    /// Create a client that reaches the daemon through `transport`
    ///
    /// Requests are pinned to API version [`DOCKER_API_VERSION`].
    pub fn over_tunnel(transport: TunnelTransport) -> Result<Self, DockerError> {
        let api_version = parse_api_version(DOCKER_API_VERSION)?;
        let base_url = api_base_url(transport.local_addr(), &api_version);

        tracing::debug!(
            "Binding Docker client to {} via {}",
            DOCKER_ENDPOINT,
            base_url
        );

        // The relay is loopback only; never route it through a proxy
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| DockerError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            transport,
        })
    }

    /// Fetch daemon info
    pub async fn info(&self) -> Result<DaemonInfo, DockerError> {
        let info: SystemInfo = self.get_json("info").await?;
        Ok(info.into())
    }

    /// Get Docker version info (useful for debugging)
    pub async fn version(&self) -> Result<String, DockerError> {
        let version: SystemVersion = self.get_json("version").await?;

        let version_str = format!(
            "Docker {} (API {})",
            version.version.unwrap_or_else(|| "unknown".to_string()),
            version.api_version.unwrap_or_else(|| "unknown".to_string())
        );

        Ok(version_str)
    }

    /// Loopback address of the tunnel relay
    pub fn relay_url(&self) -> String {
        self.transport.docker_url()
    }

    /// Versioned URL for an API path
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DockerError> {
        let url = self.endpoint(path);
        tracing::trace!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DockerError::Api {
                status: status.as_u16(),
                message: daemon_message(&body),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// Base URL for versioned API calls through the relay
fn api_base_url(relay: SocketAddr, version: &ClientVersion) -> String {
    format!(
        "http://{}/v{}.{}",
        relay, version.major_version, version.minor_version
    )
}

/// Pull the `message` field out of a daemon error body
fn daemon_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Parse a `major.minor` API version string
pub fn parse_api_version(version: &str) -> Result<ClientVersion, DockerError> {
    let invalid = || DockerError::InvalidApiVersion(version.to_string());

    let (major, minor) = version.split_once('.').ok_or_else(invalid)?;
    Ok(ClientVersion {
        major_version: major.parse().map_err(|_| invalid())?,
        minor_version: minor.parse().map_err(|_| invalid())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pinned_api_version() {
        let version = parse_api_version(DOCKER_API_VERSION).unwrap();
        assert_eq!(version.major_version, 1);
        assert_eq!(version.minor_version, 24);
    }

    #[test]
    fn rejects_malformed_api_version() {
        assert!(matches!(
            parse_api_version("124"),
            Err(DockerError::InvalidApiVersion(_))
        ));
        assert!(parse_api_version("1.x").is_err());
    }

    #[test]
    fn base_url_carries_version_prefix() {
        let relay: SocketAddr = "127.0.0.1:40123".parse().unwrap();
        let version = parse_api_version(DOCKER_API_VERSION).unwrap();
        assert_eq!(
            api_base_url(relay, &version),
            "http://127.0.0.1:40123/v1.24"
        );
    }

    #[test]
    fn daemon_message_prefers_json_field() {
        assert_eq!(
            daemon_message(r#"{"message":"daemon is shutting down"}"#),
            "daemon is shutting down"
        );
        assert_eq!(daemon_message("bad gateway\n"), "bad gateway");
    }

    #[test]
    fn daemon_info_from_system_info() {
        let info = SystemInfo {
            server_version: Some("17.03.2-ce".to_string()),
            name: Some("node-1".to_string()),
            ..Default::default()
        };
        let info = DaemonInfo::from(info);
        assert_eq!(info.server_version.as_deref(), Some("17.03.2-ce"));
        assert_eq!(info.name.as_deref(), Some("node-1"));
        assert!(info.kernel_version.is_none());
    }
}
