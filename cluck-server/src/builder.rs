//! Server builder and main server implementation.

use crate::directory::UserDirectory;
use crate::dispatcher::MessageDispatcher;
use crate::error::ServerError;
use crate::handler::{MessageHandler, SessionResponder};
use crate::motd::BannerSource;
use crate::registry::Registry;
use crate::session::Session;
use bytes::Bytes;
use cluck_core::decode;
use cluck_transport::tcp::{TcpConnection, TcpServer, TcpServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Builder for configuring and creating a server.
pub struct ServerBuilder<H = MessageDispatcher> {
    bind_addr: SocketAddr,
    handler: H,
    max_connections: usize,
    channel_capacity: usize,
    tcp_nodelay: bool,
}

impl ServerBuilder<MessageDispatcher> {
    /// Creates a new server builder serving the Cluck protocol.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9000)),
            handler: MessageDispatcher::new(),
            max_connections: 1000,
            channel_capacity: 4096,
            tcp_nodelay: true,
        }
    }

    /// Sets the user directory consulted by `REGISTER_USER`.
    #[must_use]
    pub fn directory<D: UserDirectory + 'static>(mut self, directory: D) -> Self {
        self.handler = self.handler.with_directory(directory);
        self
    }

    /// Sets the banner returned for `MOTD_REQUEST`.
    #[must_use]
    pub fn banner<B: BannerSource + 'static>(mut self, banner: B) -> Self {
        self.handler = self.handler.with_banner(banner);
        self
    }
}

impl Default for ServerBuilder<MessageDispatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MessageHandler> ServerBuilder<H> {
    /// Sets the bind address.
    #[must_use]
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Replaces the message handler.
    #[must_use]
    pub fn handler<H2: MessageHandler>(self, handler: H2) -> ServerBuilder<H2> {
        ServerBuilder {
            bind_addr: self.bind_addr,
            handler,
            max_connections: self.max_connections,
            channel_capacity: self.channel_capacity,
            tcp_nodelay: self.tcp_nodelay,
        }
    }

    /// Sets the maximum number of connections.
    #[must_use]
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the command and event channel capacity.
    #[must_use]
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Sets TCP_NODELAY on accepted connections.
    #[must_use]
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }

    /// Builds the server and handle.
    #[must_use]
    pub fn build(self) -> (Server<H>, ServerHandle) {
        let capacity = self.channel_capacity.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel(capacity);
        let (event_tx, event_rx) = mpsc::channel(capacity);

        let config = TcpServerConfig::new(self.bind_addr)
            .max_connections(self.max_connections)
            .tcp_nodelay(self.tcp_nodelay);

        let server = Server {
            config,
            handler: Arc::new(self.handler),
            registry: Arc::new(Registry::new()),
            cmd_rx,
            event_tx,
        };

        let handle = ServerHandle { cmd_tx, event_rx };

        (server, handle)
    }
}

/// The main server instance.
pub struct Server<H> {
    config: TcpServerConfig,
    handler: Arc<H>,
    registry: Arc<Registry>,
    cmd_rx: mpsc::Receiver<ServerCommand>,
    event_tx: mpsc::Sender<ServerEvent>,
}

impl<H: MessageHandler + 'static> Server<H> {
    /// Returns the registry of live sessions.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Runs the server, accepting connections until shutdown is requested.
    ///
    /// # Errors
    /// Returns `ServerError` if the listener cannot be bound.
    pub async fn run(&mut self) -> Result<(), ServerError> {
        let listener = TcpServer::bind(self.config.clone()).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Server listening on {}", local_addr);
        self.emit(ServerEvent::Listening(local_addr));

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok(conn) => self.handle_connection(conn),
                        Err(e) => {
                            tracing::error!("Accept error: {}", e);
                            self.emit(ServerEvent::Error(e.to_string()));
                        }
                    }
                }

                Some(cmd) = self.cmd_rx.recv() => {
                    if self.handle_command(cmd) {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn handle_connection(&self, conn: TcpConnection) {
        let addr = conn.peer_addr();
        if self.registry.count() >= self.config.max_connections {
            tracing::warn!("Max connections reached, rejecting {}", addr);
            return;
        }

        let (session, rx) = self.registry.create_session(addr);
        let handler = Arc::clone(&self.handler);
        let registry = Arc::clone(&self.registry);
        let event_tx = self.event_tx.clone();

        handler.on_session_start(&session);
        let _ = event_tx.try_send(ServerEvent::SessionCreated(session.id(), addr));

        tokio::spawn(async move {
            let session_id = session.id();
            tracing::info!("Session {} connected from {}", session_id, addr);

            if let Err(e) = handle_session(&session, conn, rx, handler.as_ref(), &registry).await {
                tracing::error!("Session {} error: {}", session_id, e);
            }

            registry.remove(session_id);
            handler.on_session_end(&session);
            tracing::info!("Session {} disconnected", session_id);
            let _ = event_tx.try_send(ServerEvent::SessionClosed(session_id));
        });
    }

    fn handle_command(&self, cmd: ServerCommand) -> bool {
        match cmd {
            ServerCommand::Shutdown => {
                tracing::info!("Server shutdown requested");
                self.registry.for_each(Session::close);
                true
            }
            ServerCommand::CloseSession(session_id) => {
                match self.registry.get(session_id) {
                    Some(session) => session.close(),
                    None => tracing::debug!("Close requested for unknown session {}", session_id),
                }
                false
            }
            ServerCommand::Broadcast(frame) => {
                let delivered = self.registry.broadcast(&frame);
                tracing::debug!("Broadcast delivered to {} sessions", delivered);
                false
            }
        }
    }

    fn emit(&self, event: ServerEvent) {
        let _ = self.event_tx.try_send(event);
    }
}

/// Handle for controlling the server from outside.
pub struct ServerHandle {
    cmd_tx: mpsc::Sender<ServerCommand>,
    event_rx: mpsc::Receiver<ServerEvent>,
}

impl ServerHandle {
    /// Requests server shutdown.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.try_send(ServerCommand::Shutdown);
    }

    /// Closes a specific session.
    pub fn close_session(&self, session_id: u64) {
        let _ = self
            .cmd_tx
            .try_send(ServerCommand::CloseSession(session_id));
    }

    /// Broadcasts an encoded frame to all ready sessions.
    pub fn broadcast(&self, frame: Bytes) {
        let _ = self.cmd_tx.try_send(ServerCommand::Broadcast(frame));
    }

    /// Polls for server events without waiting.
    pub fn poll_events(&mut self) -> impl Iterator<Item = ServerEvent> + '_ {
        std::iter::from_fn(|| self.event_rx.try_recv().ok())
    }

    /// Waits for the next server event. Returns `None` once the server is gone.
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.event_rx.recv().await
    }
}

/// Commands that can be sent to the server.
#[derive(Debug)]
pub enum ServerCommand {
    /// Shutdown the server.
    Shutdown,
    /// Close a specific session.
    CloseSession(u64),
    /// Broadcast an encoded frame to ready sessions.
    Broadcast(Bytes),
}

/// Events emitted by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// The listener is bound.
    Listening(SocketAddr),
    /// A new session was created.
    SessionCreated(u64, SocketAddr),
    /// A session was closed.
    SessionClosed(u64),
    /// An error occurred.
    Error(String),
}

/// Handles a single client session until the peer disconnects or the session
/// is closed.
async fn handle_session<H: MessageHandler>(
    session: &Session,
    mut conn: TcpConnection,
    mut rx: mpsc::UnboundedReceiver<Bytes>,
    handler: &H,
    registry: &Registry,
) -> Result<(), std::io::Error> {
    loop {
        tokio::select! {
            result = conn.recv() => {
                match result {
                    Some(Ok(raw)) => {
                        tracing::debug!("Session {} read {} bytes", session.id(), raw.len());
                        let responder = SessionResponder::new(session, registry);
                        match decode(&raw) {
                            Ok(message) => handler.on_message(session, &message, &responder),
                            Err(e) => handler.on_decode_error(session, &raw, &e, &responder),
                        }
                    }
                    Some(Err(e)) => return Err(e),
                    None => return Ok(()),
                }
            }

            Some(frame) = rx.recv() => {
                conn.send(frame).await?;
            }

            () = session.closed() => {
                return conn.close().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Responder;
    use crate::session::SessionState;
    use cluck_client::ClientSession;
    use cluck_core::{Message, MessageCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    struct EchoHandler {
        seen: AtomicUsize,
    }

    impl MessageHandler for EchoHandler {
        fn on_message(&self, _session: &Session, message: &Message, responder: &dyn Responder) {
            self.seen.fetch_add(1, Ordering::Relaxed);
            let _ = responder.send(message.encode());
        }
    }

    fn loopback() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    async fn listening(handle: &mut ServerHandle) -> SocketAddr {
        match handle.next_event().await {
            Some(ServerEvent::Listening(addr)) => addr,
            other => panic!("expected Listening, got {:?}", other),
        }
    }

    #[test]
    fn test_server_builder_build() {
        let (server, _handle) = ServerBuilder::new()
            .bind(loopback())
            .max_connections(10)
            .channel_capacity(16)
            .tcp_nodelay(false)
            .build();

        assert_eq!(server.config.max_connections, 10);
        assert!(!server.config.tcp_nodelay);
        assert_eq!(server.registry().count(), 0);
    }

    #[test]
    fn test_server_builder_custom_handler() {
        let (_server, _handle) = ServerBuilder::new()
            .handler(EchoHandler {
                seen: AtomicUsize::new(0),
            })
            .build();
    }

    #[test]
    fn test_server_command_debug() {
        assert!(format!("{:?}", ServerCommand::Shutdown).contains("Shutdown"));
        assert!(format!("{:?}", ServerCommand::CloseSession(42)).contains("CloseSession"));
        assert!(
            format!("{:?}", ServerCommand::Broadcast(Bytes::from_static(b"x")))
                .contains("Broadcast")
        );
    }

    #[test]
    fn test_poll_events_empty() {
        let (_server, mut handle) = ServerBuilder::new().build();
        assert_eq!(handle.poll_events().count(), 0);
    }

    #[tokio::test]
    async fn test_custom_handler_round_trip() {
        let (mut server, mut handle) = ServerBuilder::new()
            .bind(loopback())
            .handler(EchoHandler {
                seen: AtomicUsize::new(0),
            })
            .build();
        let task = tokio::spawn(async move { server.run().await });
        let addr = listening(&mut handle).await;

        let mut client = TcpStream::connect(addr).await.unwrap();
        assert!(matches!(
            handle.next_event().await,
            Some(ServerEvent::SessionCreated(_, _))
        ));

        client.write_all(b"\x00\x02\x00\x00").await.unwrap();
        let mut reply = [0u8; 4];
        client.read_exact(&mut reply).await.unwrap();
        assert_eq!(&reply, b"\x00\x02\x00\x00");

        handle.shutdown();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_close_session_command() {
        let (mut server, mut handle) = ServerBuilder::new().bind(loopback()).build();
        let task = tokio::spawn(async move { server.run().await });
        let addr = listening(&mut handle).await;

        let mut client = TcpStream::connect(addr).await.unwrap();
        let id = match handle.next_event().await {
            Some(ServerEvent::SessionCreated(id, _)) => id,
            other => panic!("expected SessionCreated, got {:?}", other),
        };

        handle.close_session(id);
        assert_eq!(handle.next_event().await, Some(ServerEvent::SessionClosed(id)));

        let mut buf = [0u8; 1];
        assert_eq!(client.read(&mut buf).await.unwrap(), 0);

        handle.shutdown();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_broadcast_reaches_ready_session() {
        let (mut server, mut handle) = ServerBuilder::new().bind(loopback()).build();
        let registry = Arc::clone(server.registry());
        let task = tokio::spawn(async move { server.run().await });
        let addr = listening(&mut handle).await;

        let mut ready = TcpStream::connect(addr).await.unwrap();
        let Some(ServerEvent::SessionCreated(ready_id, _)) = handle.next_event().await else {
            panic!("expected SessionCreated");
        };
        let mut idle = TcpStream::connect(addr).await.unwrap();
        let Some(ServerEvent::SessionCreated(_, _)) = handle.next_event().await else {
            panic!("expected SessionCreated");
        };

        registry.get(ready_id).unwrap().set_state(SessionState::Ready);
        let frame = Message::text(MessageCode::Motd, "hi").unwrap().encode();
        handle.broadcast(frame.clone());

        let mut received = vec![0u8; frame.len()];
        ready.read_exact(&mut received).await.unwrap();
        assert_eq!(received, frame.as_ref());

        // The idle session was skipped; its next frame answers its own request.
        idle.write_all(b"\x00\x6e\x00\x00").await.unwrap();
        let mut header = [0u8; 4];
        idle.read_exact(&mut header).await.unwrap();
        assert_eq!(&header[..2], &[0x00, 0x0b]);

        handle.shutdown();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_max_connections_refuses_extra_clients() {
        let (mut server, mut handle) = ServerBuilder::new()
            .bind(loopback())
            .max_connections(1)
            .build();
        let task = tokio::spawn(async move { server.run().await });
        let addr = listening(&mut handle).await;

        let mut first = ClientSession::connect(&addr.to_string()).await.unwrap();
        let Some(ServerEvent::SessionCreated(first_id, _)) = handle.next_event().await else {
            panic!("expected SessionCreated");
        };
        assert_eq!(first.whoami().await.unwrap(), None);

        let mut refused = ClientSession::connect(&addr.to_string()).await.unwrap();
        assert!(refused.whoami().await.is_err());
        assert_eq!(first.whoami().await.unwrap(), None);

        drop(first);
        assert_eq!(
            handle.next_event().await,
            Some(ServerEvent::SessionClosed(first_id))
        );

        let mut next = ClientSession::connect(&addr.to_string()).await.unwrap();
        assert_eq!(next.whoami().await.unwrap(), None);

        handle.shutdown();
        task.await.unwrap().unwrap();
    }
}
