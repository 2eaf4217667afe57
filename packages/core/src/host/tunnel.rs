//! Host tunnel establishment
//!
//! Brings up a Docker client for a fleet node through a dialer, then gates
//! on the daemon's version. A bound host short-circuits further setup calls.

use super::dialer::DialerFactory;
use super::error::{DialerError, TunnelError, TunnelStage};
use super::schema::HostConfig;
use crate::docker::{
    Compatibility, DaemonInfo, DockerClient, K8S_VERSION, TunnelTransport, VersionTable,
    check_docker_version,
};

/// Docker client state of a host
pub enum EngineState {
    /// No tunnel has been established
    Unbound,
    /// Tunnel is up and the daemon passed the version gate
    Bound(DockerClient),
    /// Last setup attempt failed; a new call retries from scratch
    Failed(TunnelFailure),
}

impl EngineState {
    pub fn is_bound(&self) -> bool {
        matches!(self, EngineState::Bound(_))
    }
}

impl std::fmt::Debug for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Unbound => f.write_str("Unbound"),
            EngineState::Bound(client) => f
                .debug_tuple("Bound")
                .field(&client.relay_url())
                .finish(),
            EngineState::Failed(failure) => f.debug_tuple("Failed").field(failure).finish(),
        }
    }
}

/// Memo of the last failed setup attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelFailure {
    pub stage: TunnelStage,
    pub message: String,
}

impl From<&TunnelError> for TunnelFailure {
    fn from(err: &TunnelError) -> Self {
        Self {
            stage: err.stage(),
            message: err.to_string(),
        }
    }
}

/// Successful result of [`Host::tunnel_up`]
#[derive(Debug, Clone, PartialEq)]
pub enum TunnelOutcome {
    /// Host was already bound; nothing was done
    AlreadyBound,
    /// Tunnel was established on this call
    Established {
        info: DaemonInfo,
        compatibility: Compatibility,
    },
}

/// A fleet node and its Docker client state
///
/// Setup takes `&mut self`, so one host cannot run two setups at once.
/// Distinct hosts share nothing and can be set up concurrently.
#[derive(Debug)]
pub struct Host {
    address: String,
    port: u16,
    user: String,
    ssh_key: String,
    ssh_key_path: String,
    enforce_docker_version: bool,
    engine: EngineState,
}

impl Host {
    /// Create an unbound host from its stored configuration
    pub fn from_config(config: &HostConfig) -> Self {
        Self {
            address: config.address.clone(),
            port: config.ssh_port(),
            user: config.user.clone(),
            ssh_key: config.ssh_key.clone().unwrap_or_default(),
            ssh_key_path: config.ssh_key_path.clone(),
            enforce_docker_version: config.enforce_docker_version,
            engine: EngineState::Unbound,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Inline private key material, empty when a key path is used
    pub fn ssh_key(&self) -> &str {
        &self.ssh_key
    }

    pub fn ssh_key_path(&self) -> &str {
        &self.ssh_key_path
    }

    pub fn enforce_docker_version(&self) -> bool {
        self.enforce_docker_version
    }

    pub fn engine(&self) -> &EngineState {
        &self.engine
    }

    /// Docker client, once the tunnel is up
    pub fn docker(&self) -> Option<&DockerClient> {
        match &self.engine {
            EngineState::Bound(client) => Some(client),
            _ => None,
        }
    }

    /// Establish the Docker tunnel for this host
    ///
    /// A bound host returns [`TunnelOutcome::AlreadyBound`] without doing any
    /// credential or network work. Failures are returned as-is and recorded
    /// in [`EngineState::Failed`]; there are no retries.
    pub async fn tunnel_up(
        &mut self,
        dialer_factory: &dyn DialerFactory,
        versions: &VersionTable,
    ) -> Result<TunnelOutcome, TunnelError> {
        if self.engine.is_bound() {
            return Ok(TunnelOutcome::AlreadyBound);
        }

        tracing::info!("[dialer] Setup tunnel for host [{}]", self.address);

        match self.connect(dialer_factory, versions).await {
            Ok((client, outcome)) => {
                self.engine = EngineState::Bound(client);
                Ok(outcome)
            }
            Err(err) => {
                self.engine = EngineState::Failed(TunnelFailure::from(&err));
                Err(err)
            }
        }
    }

    async fn connect(
        &self,
        dialer_factory: &dyn DialerFactory,
        versions: &VersionTable,
    ) -> Result<(DockerClient, TunnelOutcome), TunnelError> {
        let transport =
            self.new_transport(dialer_factory)
                .await
                .map_err(|source| TunnelError::Dialer {
                    host: self.address.clone(),
                    source,
                })?;

        tracing::debug!("Connecting to Docker API for host [{}]", self.address);
        let client =
            DockerClient::over_tunnel(transport).map_err(|source| TunnelError::ClientInit {
                host: self.address.clone(),
                source,
            })?;

        let info = client
            .info()
            .await
            .map_err(|source| TunnelError::DaemonInfo {
                host: self.address.clone(),
                source,
            })?;
        tracing::debug!("Docker Info found: {:?}", info);

        let compatibility =
            check_docker_version(versions, K8S_VERSION, info.server_version.as_deref()).map_err(
                |source| TunnelError::VersionUndetermined {
                    host: self.address.clone(),
                    source,
                },
            )?;

        if let Compatibility::Unsupported { version, supported } = &compatibility {
            if self.enforce_docker_version {
                return Err(TunnelError::UnsupportedVersion {
                    host: self.address.clone(),
                    version: version.clone(),
                    supported: supported.clone(),
                });
            }
            tracing::warn!(
                "Unsupported Docker version found [{}] on host [{}], supported versions are [{}]",
                version,
                self.address,
                supported.join(", ")
            );
        }

        Ok((
            client,
            TunnelOutcome::Established {
                info,
                compatibility,
            },
        ))
    }

    /// Dial the host and wrap the dialer in a loopback HTTP transport
    async fn new_transport(
        &self,
        dialer_factory: &dyn DialerFactory,
    ) -> Result<TunnelTransport, DialerError> {
        let dialer = dialer_factory.dialer(self).await?;
        TunnelTransport::bind(dialer).await
    }
}
