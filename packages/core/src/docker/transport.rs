//! Docker API transport over a tunnel dialer
//!
//! Binds a loopback listener and relays every accepted connection through a
//! freshly dialed tunnel stream, so an HTTP client pointed at the listener
//! talks to the remote Docker socket.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::host::{Dialer, DialerError};

/// Loopback endpoint whose connections are carried over a dialer
///
/// The listener does not authenticate clients. Any local user can reach the
/// remote Docker socket, which is root-equivalent on the node, while the
/// transport is alive. Only run it on machines whose local users are trusted.
///
/// Dropping the transport stops accepting new connections.
pub struct TunnelTransport {
    local_addr: SocketAddr,
    accept_task: JoinHandle<()>,
}

impl TunnelTransport {
    /// Start relaying loopback connections through `dialer`
    pub async fn bind(dialer: Arc<dyn Dialer>) -> Result<Self, DialerError> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .map_err(DialerError::Relay)?;
        let local_addr = listener.local_addr().map_err(DialerError::Relay)?;

        tracing::debug!("Tunnel relay listening on {}", local_addr);
        let accept_task = tokio::spawn(accept_loop(listener, dialer));

        Ok(Self {
            local_addr,
            accept_task,
        })
    }

    /// Local address the HTTP client connects to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Docker connection URL for the relay
    pub fn docker_url(&self) -> String {
        format!("tcp://{}", self.local_addr)
    }
}

impl Drop for TunnelTransport {
    fn drop(&mut self) {
        tracing::debug!("Closing tunnel relay on {}", self.local_addr);
        self.accept_task.abort();
    }
}

async fn accept_loop(listener: TcpListener, dialer: Arc<dyn Dialer>) {
    loop {
        match listener.accept().await {
            Ok((inbound, peer)) => {
                tracing::trace!("Relaying connection from {}", peer);
                tokio::spawn(relay_connection(inbound, Arc::clone(&dialer)));
            }
            Err(e) => {
                tracing::warn!("Tunnel relay stopped accepting connections: {}", e);
                return;
            }
        }
    }
}

async fn relay_connection(mut inbound: TcpStream, dialer: Arc<dyn Dialer>) {
    let mut remote = match dialer.dial().await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!("Failed to dial Docker socket through tunnel: {}", e);
            return;
        }
    };

    match tokio::io::copy_bidirectional(&mut inbound, &mut remote).await {
        Ok((sent, received)) => {
            tracing::trace!("Relay closed ({} bytes sent, {} received)", sent, received);
        }
        Err(e) => tracing::debug!("Relay connection ended: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use crate::host::TunnelStream;

    /// Dialer whose remote end echoes everything back
    struct EchoDialer;

    #[async_trait]
    impl Dialer for EchoDialer {
        async fn dial(&self) -> Result<TunnelStream, DialerError> {
            let (local, mut remote) = tokio::io::duplex(1024);
            tokio::spawn(async move {
                let mut buf = [0u8; 64];
                while let Ok(n) = remote.read(&mut buf).await {
                    if n == 0 || remote.write_all(&buf[..n]).await.is_err() {
                        break;
                    }
                }
            });
            Ok(Box::pin(local))
        }
    }

    #[tokio::test]
    async fn relays_bytes_through_dialer() {
        let transport = TunnelTransport::bind(Arc::new(EchoDialer)).await.unwrap();
        assert!(transport.local_addr().ip().is_loopback());

        let mut conn = TcpStream::connect(transport.local_addr()).await.unwrap();
        conn.write_all(b"ping").await.unwrap();

        let mut buf = [0u8; 4];
        conn.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ping");
    }

    #[tokio::test]
    async fn docker_url_uses_tcp_scheme() {
        let transport = TunnelTransport::bind(Arc::new(EchoDialer)).await.unwrap();
        assert_eq!(
            transport.docker_url(),
            format!("tcp://127.0.0.1:{}", transport.local_addr().port())
        );
    }
}
