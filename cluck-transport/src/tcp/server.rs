//! TCP server implementation.
//!
//! Server-side connections are read chunk by chunk: each read from the
//! socket is handed up as one raw packet, and outbound frames are written
//! verbatim.

use bytes::{Bytes, BytesMut};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{BytesCodec, Framed};

/// Configuration for TCP server.
#[derive(Debug, Clone)]
pub struct TcpServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Maximum number of connections.
    pub max_connections: usize,
    /// Enable TCP_NODELAY.
    pub tcp_nodelay: bool,
}

impl Default for TcpServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9000)),
            max_connections: 1000,
            tcp_nodelay: true,
        }
    }
}

impl TcpServerConfig {
    /// Creates a new server config with the specified bind address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Default::default()
        }
    }

    /// Sets the maximum number of connections.
    #[must_use]
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets TCP_NODELAY option.
    #[must_use]
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }
}

/// TCP server for Cluck messaging.
pub struct TcpServer {
    listener: TcpListener,
    config: Arc<TcpServerConfig>,
}

impl TcpServer {
    /// Binds to the configured address and creates a new server.
    ///
    /// # Errors
    /// Returns IO error if binding fails.
    pub async fn bind(config: TcpServerConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        Ok(Self {
            listener,
            config: Arc::new(config),
        })
    }

    /// Accepts a new connection.
    ///
    /// # Errors
    /// Returns IO error if accept fails.
    pub async fn accept(&self) -> std::io::Result<TcpConnection> {
        let (stream, addr) = self.listener.accept().await?;
        stream.set_nodelay(self.config.tcp_nodelay)?;
        tracing::debug!("Accepted connection from {}", addr);
        Ok(TcpConnection::new(stream, addr))
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// A TCP connection to a client.
pub struct TcpConnection {
    framed: Framed<TcpStream, BytesCodec>,
    peer_addr: SocketAddr,
}

impl TcpConnection {
    /// Wraps an accepted stream.
    #[must_use]
    pub fn new(stream: TcpStream, peer_addr: SocketAddr) -> Self {
        Self {
            framed: Framed::new(stream, BytesCodec::new()),
            peer_addr,
        }
    }

    /// Returns the peer address.
    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Writes an encoded frame to the client.
    ///
    /// # Errors
    /// Returns IO error if the write fails.
    pub async fn send(&mut self, frame: Bytes) -> std::io::Result<()> {
        self.framed.send(frame).await
    }

    /// Receives the next chunk of bytes read from the client.
    ///
    /// # Returns
    /// `Some(Ok(bytes))` for each read, `None` once the peer closed the connection.
    pub async fn recv(&mut self) -> Option<std::io::Result<BytesMut>> {
        self.framed.next().await
    }

    /// Closes the connection.
    pub async fn close(mut self) -> std::io::Result<()> {
        SinkExt::<Bytes>::close(&mut self.framed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[test]
    fn test_tcp_server_config_default() {
        let config = TcpServerConfig::default();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.max_connections, 1000);
        assert!(config.tcp_nodelay);
    }

    #[test]
    fn test_tcp_server_config_builder() {
        let addr: SocketAddr = "127.0.0.1:7000".parse().unwrap();
        let config = TcpServerConfig::new(addr)
            .max_connections(500)
            .tcp_nodelay(false);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.max_connections, 500);
        assert!(!config.tcp_nodelay);
    }

    #[tokio::test]
    async fn test_connection_send_recv() {
        let server = TcpServer::bind(TcpServerConfig::new("127.0.0.1:0".parse().unwrap()))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();

        let mut client = TcpStream::connect(addr).await.unwrap();
        let mut conn = server.accept().await.unwrap();

        client.write_all(b"\x00\x6e\x00\x00").await.unwrap();
        let chunk = conn.recv().await.unwrap().unwrap();
        assert_eq!(&chunk[..], b"\x00\x6e\x00\x00");

        conn.send(Bytes::from_static(b"\x00\x65\x00\x01Z")).await.unwrap();
        let mut reply = [0u8; 5];
        client.read_exact(&mut reply).await.unwrap();
        assert_eq!(&reply, b"\x00\x65\x00\x01Z");

        drop(client);
        assert!(conn.recv().await.is_none());
    }
}
