//! Tunnel dialers
//!
//! A [`DialerFactory`] turns a [`Host`] into a [`Dialer`] that opens byte
//! streams to the host's Docker socket. The production factory tunnels
//! through an SSH session; tests plug in in-memory dialers.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Config, Handle};
use russh_keys::key::PublicKey;
use tokio::io::{AsyncRead, AsyncWrite};

use super::auth::{HostKeyPolicy, build_auth_config};
use super::credentials::{SecretPrompt, resolve_signer};
use super::error::DialerError;
use super::tunnel::Host;
use crate::docker::DOCKER_SOCKET_PATH;

/// Default SSH connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bidirectional byte stream
pub trait AsyncStream: AsyncRead + AsyncWrite + Send {}

impl<T: AsyncRead + AsyncWrite + Send + ?Sized> AsyncStream for T {}

/// Stream to a remote Docker socket, carried over the tunnel
pub type TunnelStream = Pin<Box<dyn AsyncStream>>;

/// Opens connections to a host's Docker control endpoint
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Open a fresh stream to the Docker socket
    async fn dial(&self) -> Result<TunnelStream, DialerError>;
}

/// Builds a [`Dialer`] for a host
#[async_trait]
pub trait DialerFactory: Send + Sync {
    /// Establish whatever session the dialer needs and return it
    async fn dialer(&self, host: &Host) -> Result<Arc<dyn Dialer>, DialerError>;
}

/// Dialer factory that authenticates over SSH with the host's private key
///
/// Each dial opens a `direct-streamlocal` channel to the remote Docker socket
/// on the same SSH session.
pub struct SshDialerFactory {
    prompt: Arc<dyn SecretPrompt>,
    connect_timeout: Duration,
}

impl SshDialerFactory {
    /// Create a factory using `prompt` for encrypted key passphrases
    pub fn new(prompt: Arc<dyn SecretPrompt>) -> Self {
        Self {
            prompt,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Builder pattern: set SSH connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

#[async_trait]
impl DialerFactory for SshDialerFactory {
    async fn dialer(&self, host: &Host) -> Result<Arc<dyn Dialer>, DialerError> {
        // Key parsing may block on the passphrase prompt
        let key = host.ssh_key().to_string();
        let key_path = host.ssh_key_path().to_string();
        let prompt = Arc::clone(&self.prompt);
        let signer =
            tokio::task::spawn_blocking(move || resolve_signer(&key, &key_path, prompt.as_ref()))
                .await
                .map_err(|e| DialerError::Task(e.to_string()))??;

        let auth = build_auth_config(host.user(), signer);
        let handler = TunnelHandler {
            policy: auth.host_key_policy(),
        };

        let address = host.address().to_string();
        let port = host.port();
        tracing::debug!("[ssh] Connecting to {}@{}:{}", auth.user(), address, port);

        let mut session = tokio::time::timeout(
            self.connect_timeout,
            client::connect(Arc::new(Config::default()), (address.as_str(), port), handler),
        )
        .await
        .map_err(|_| {
            DialerError::Connect(format!(
                "connection to {address}:{port} timed out after {}s",
                self.connect_timeout.as_secs()
            ))
        })?
        .map_err(|e| DialerError::Connect(format!("{address}:{port}: {e}")))?;

        let authenticated = session
            .authenticate_publickey(auth.user(), auth.key_pair())
            .await
            .map_err(|e| DialerError::Connect(format!("authentication error: {e}")))?;

        if !authenticated {
            return Err(DialerError::AuthRejected {
                user: auth.user().to_string(),
            });
        }

        tracing::debug!(
            "[ssh] Authenticated to {} with {} key",
            address,
            auth.key_algorithm()
        );

        Ok(Arc::new(SshDialer {
            session,
            socket_path: DOCKER_SOCKET_PATH.to_string(),
        }))
    }
}

/// Dialer backed by an authenticated SSH session
struct SshDialer {
    session: Handle<TunnelHandler>,
    socket_path: String,
}

#[async_trait]
impl Dialer for SshDialer {
    async fn dial(&self) -> Result<TunnelStream, DialerError> {
        let channel = self
            .session
            .channel_open_direct_streamlocal(self.socket_path.clone())
            .await
            .map_err(|e| DialerError::Channel {
                socket: self.socket_path.clone(),
                message: e.to_string(),
            })?;

        Ok(Box::pin(channel.into_stream()))
    }
}

/// SSH client callbacks for tunnel sessions
struct TunnelHandler {
    policy: HostKeyPolicy,
}

#[async_trait]
impl client::Handler for TunnelHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(self.policy.accepts(&server_public_key.fingerprint()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostConfig;
    use crate::host::credentials::tests::ScriptedPrompt;

    #[tokio::test]
    async fn ssh_factory_reports_credential_failure_before_dialing() {
        let config = HostConfig::new("127.0.0.1")
            .with_user("ops")
            .with_ssh_key("definitely not a key");
        let host = Host::from_config(&config);

        let factory = SshDialerFactory::new(Arc::new(ScriptedPrompt::answering("unused")));
        let result = factory.dialer(&host).await;

        assert!(matches!(result, Err(DialerError::Credential(_))));
    }

    #[tokio::test]
    async fn ssh_factory_reports_connect_failure() {
        // Bind then drop to get a local port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = HostConfig::new("127.0.0.1")
            .with_port(port)
            .with_ssh_key(crate::host::credentials::tests::PLAIN_KEY);
        let host = Host::from_config(&config);

        let factory = SshDialerFactory::new(Arc::new(ScriptedPrompt::answering("unused")))
            .with_connect_timeout(Duration::from_secs(2));
        let result = factory.dialer(&host).await;

        assert!(matches!(result, Err(DialerError::Connect(_))));
    }
}
