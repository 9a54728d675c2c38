//! Client session management.

use crate::error::ClientError;
use bytes::Bytes;
use cluck_core::{Message, MessageCode};
use cluck_transport::tcp::{TcpClient, TcpClientConfig};
use std::net::SocketAddr;

/// A connection to a Cluck server used in request/reply fashion.
///
/// The server answers every request with exactly one frame, so each helper
/// sends one message and waits for the next frame.
pub struct ClientSession {
    client: TcpClient,
}

impl ClientSession {
    /// Connects to `addr` (`host:port`) with default settings.
    ///
    /// # Errors
    /// Returns `ClientError` if the address is invalid or connection fails.
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        Self::connect_with(TcpClientConfig::parse(addr)?).await
    }

    /// Connects with an explicit transport configuration.
    ///
    /// # Errors
    /// Returns `ClientError` if connection fails.
    pub async fn connect_with(config: TcpClientConfig) -> Result<Self, ClientError> {
        let client = TcpClient::connect(config).await?;
        tracing::debug!("Connected to {}", client.peer_addr());
        Ok(Self { client })
    }

    /// Returns the server address.
    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.client.peer_addr()
    }

    /// Sends `message` and waits for the reply.
    ///
    /// # Errors
    /// Returns [`ClientError::ConnectionClosed`] if the server hangs up first.
    pub async fn request(&mut self, message: &Message) -> Result<Message, ClientError> {
        self.client.send(message).await?;
        self.recv().await
    }

    /// Writes raw bytes without framing them.
    ///
    /// # Errors
    /// Returns `ClientError` if the write fails.
    pub async fn send_raw(&mut self, packet: Bytes) -> Result<(), ClientError> {
        self.client.send_raw(packet).await?;
        Ok(())
    }

    /// Waits for the next frame from the server.
    ///
    /// # Errors
    /// Returns [`ClientError::ConnectionClosed`] if the server hangs up.
    pub async fn recv(&mut self) -> Result<Message, ClientError> {
        self.client.recv().await?.ok_or(ClientError::ConnectionClosed)
    }

    /// Fetches the message of the day.
    ///
    /// # Errors
    /// Returns `ClientError` on transport failure or an unexpected reply.
    pub async fn motd(&mut self) -> Result<String, ClientError> {
        let reply = self.request(&Message::empty(MessageCode::MotdRequest)).await?;
        expect_text(&reply, MessageCode::Motd)
    }

    /// Registers `name` on this connection and returns the confirmation text.
    ///
    /// # Errors
    /// Returns [`ClientError::Rejected`] with the server's reason if the name
    /// is refused.
    pub async fn register_user(&mut self, name: &str) -> Result<String, ClientError> {
        let request = Message::text(MessageCode::RegisterUser, name)?;
        let reply = self.request(&request).await?;
        expect_text(&reply, MessageCode::CommandSuccess)
    }

    /// Asks which name is registered on this connection.
    ///
    /// # Returns
    /// `Ok(None)` if no name has been registered yet.
    ///
    /// # Errors
    /// Returns `ClientError` on transport failure or an unexpected reply.
    pub async fn whoami(&mut self) -> Result<Option<String>, ClientError> {
        let reply = self.request(&Message::empty(MessageCode::Whoami)).await?;
        match expect_text(&reply, MessageCode::UserStatus) {
            Ok(name) => Ok(Some(name)),
            Err(ClientError::Rejected(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Closes the connection.
    ///
    /// # Errors
    /// Returns `ClientError` if the shutdown fails.
    pub async fn close(self) -> Result<(), ClientError> {
        self.client.close().await?;
        Ok(())
    }
}

/// Reads the text of `reply`, requiring it to carry `expected`.
fn expect_text(reply: &Message, expected: MessageCode) -> Result<String, ClientError> {
    let code = reply.code();
    if code == expected.as_u16() {
        Ok(reply.data_ascii()?.to_owned())
    } else if code == MessageCode::CommandError.as_u16() {
        Err(ClientError::Rejected(reply.data_ascii()?.to_owned()))
    } else {
        Err(ClientError::UnexpectedReply { code })
    }
}
