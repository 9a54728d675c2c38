//! TCP client implementation.

use super::framing::CluckFrameCodec;
use crate::error::TransportError;
use bytes::Bytes;
use cluck_core::Message;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

/// Configuration for TCP client.
#[derive(Debug, Clone)]
pub struct TcpClientConfig {
    /// Server address to connect to.
    pub server_addr: SocketAddr,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Enable TCP_NODELAY.
    pub tcp_nodelay: bool,
}

impl Default for TcpClientConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 9000)),
            connect_timeout: Duration::from_secs(5),
            tcp_nodelay: true,
        }
    }
}

impl TcpClientConfig {
    /// Creates a new client config with the specified server address.
    #[must_use]
    pub fn new(server_addr: SocketAddr) -> Self {
        Self {
            server_addr,
            ..Default::default()
        }
    }

    /// Creates a new client config from a `host:port` string.
    ///
    /// # Errors
    /// Returns [`TransportError::AddrParse`] if `addr` is not a socket address.
    pub fn parse(addr: &str) -> Result<Self, TransportError> {
        Ok(Self::new(addr.parse()?))
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets TCP_NODELAY option.
    #[must_use]
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }
}

/// TCP client for Cluck messaging.
pub struct TcpClient {
    framed: Framed<TcpStream, CluckFrameCodec>,
    peer_addr: SocketAddr,
}

impl TcpClient {
    /// Connects to a server with the given configuration.
    ///
    /// # Errors
    /// Returns `TransportError` if connection fails.
    pub async fn connect(config: TcpClientConfig) -> Result<Self, TransportError> {
        let stream = tokio::time::timeout(
            config.connect_timeout,
            TcpStream::connect(config.server_addr),
        )
        .await
        .map_err(|_| {
            tracing::warn!("Connect to {} timed out", config.server_addr);
            TransportError::ConnectTimeout
        })?
        .map_err(TransportError::Io)?;

        stream.set_nodelay(config.tcp_nodelay)?;

        let peer_addr = stream.peer_addr()?;
        let framed = Framed::new(stream, CluckFrameCodec::new());

        Ok(Self { framed, peer_addr })
    }

    /// Sends a message to the server.
    ///
    /// # Errors
    /// Returns `TransportError` if send fails.
    pub async fn send(&mut self, message: &Message) -> Result<(), TransportError> {
        self.framed.send(message).await
    }

    /// Sends raw bytes to the server without framing them.
    ///
    /// # Errors
    /// Returns `TransportError` if send fails.
    pub async fn send_raw(&mut self, packet: Bytes) -> Result<(), TransportError> {
        self.framed.send(packet).await
    }

    /// Receives the next complete message from the server.
    ///
    /// # Returns
    /// `Ok(Some(message))` if a message was received, `Ok(None)` if connection closed.
    ///
    /// # Errors
    /// Returns `TransportError` if receive fails.
    pub async fn recv(&mut self) -> Result<Option<Message>, TransportError> {
        self.framed.next().await.transpose()
    }

    /// Returns the peer address.
    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Closes the connection.
    pub async fn close(mut self) -> Result<(), TransportError> {
        SinkExt::<Bytes>::close(&mut self.framed).await
    }
}
