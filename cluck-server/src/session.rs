//! Per-connection session state.

use crate::error::SendError;
use bytes::Bytes;
use parking_lot::RwLock;
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Connection lifecycle state.
///
/// Every session starts in [`SessionState::Connecting`]. No protocol handler
/// moves a session out of it; `Ready` and `Error` are only entered through
/// [`Session::set_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Connection accepted.
    #[default]
    Connecting,
    /// Eligible for broadcasts.
    Ready,
    /// Connection flagged as failed.
    Error,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Ready => write!(f, "ready"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Server-side state bound to one live connection.
///
/// Outbound frames are pushed onto an unbounded queue drained by the task
/// that owns the socket, so [`Session::send`] never blocks.
#[derive(Debug)]
pub struct Session {
    id: u64,
    peer_addr: SocketAddr,
    created_at: u64,
    state: RwLock<SessionState>,
    username: RwLock<Option<String>>,
    outbound: mpsc::UnboundedSender<Bytes>,
    closed: CancellationToken,
}

impl Session {
    /// Creates a session writing into `outbound`.
    #[must_use]
    pub fn new(id: u64, peer_addr: SocketAddr, outbound: mpsc::UnboundedSender<Bytes>) -> Self {
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        Self {
            id,
            peer_addr,
            created_at,
            state: RwLock::new(SessionState::Connecting),
            username: RwLock::new(None),
            outbound,
            closed: CancellationToken::new(),
        }
    }

    /// Creates a session together with the receiving end of its outbound queue.
    #[must_use]
    pub fn channel(id: u64, peer_addr: SocketAddr) -> (Self, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(id, peer_addr, tx), rx)
    }

    /// Session ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Peer address.
    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Creation timestamp (nanos since epoch).
    #[must_use]
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Sets the lifecycle state.
    pub fn set_state(&self, state: SessionState) {
        *self.state.write() = state;
    }

    /// Returns the registered username, if any.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.username.read().clone()
    }

    /// Stores `username`, replacing any previous registration.
    pub fn set_username(&self, username: impl Into<String>) {
        *self.username.write() = Some(username.into());
    }

    /// Queues an encoded frame for this session's connection.
    ///
    /// # Errors
    /// Returns [`SendError`] once the connection task has gone away.
    pub fn send(&self, frame: Bytes) -> Result<(), SendError> {
        self.outbound
            .send(frame)
            .map_err(|_| SendError { session_id: self.id })
    }

    /// Asks the connection task to shut this session down.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Returns true once [`Session::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Completes when [`Session::close`] is called.
    pub async fn closed(&self) {
        self.closed.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    #[test]
    fn test_new_session_defaults() {
        let (session, _rx) = Session::channel(7, addr());

        assert_eq!(session.id(), 7);
        assert_eq!(session.peer_addr(), addr());
        assert_eq!(session.state(), SessionState::Connecting);
        assert!(session.username().is_none());
        assert!(session.created_at() > 0);
        assert!(!session.is_closed());
    }

    #[test]
    fn test_username_overwrite() {
        let (session, _rx) = Session::channel(1, addr());

        session.set_username("Alice");
        assert_eq!(session.username().as_deref(), Some("Alice"));

        session.set_username("Bob");
        assert_eq!(session.username().as_deref(), Some("Bob"));
    }

    #[test]
    fn test_set_state() {
        let (session, _rx) = Session::channel(1, addr());

        session.set_state(SessionState::Ready);
        assert_eq!(session.state(), SessionState::Ready);

        session.set_state(SessionState::Error);
        assert_eq!(session.state(), SessionState::Error);
        assert_eq!(session.state().to_string(), "error");
    }

    #[test]
    fn test_send_queues_frame() {
        let (session, mut rx) = Session::channel(1, addr());

        session.send(Bytes::from_static(b"\x00\x01\x00\x00")).unwrap();
        assert_eq!(rx.try_recv().unwrap().as_ref(), b"\x00\x01\x00\x00");
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (session, rx) = Session::channel(3, addr());
        drop(rx);

        let err = session.send(Bytes::from_static(b"x")).unwrap_err();
        assert_eq!(err, SendError { session_id: 3 });
    }

    #[tokio::test]
    async fn test_close_wakes_waiter() {
        let (session, _rx) = Session::channel(1, addr());
        session.close();
        session.closed().await;
        assert!(session.is_closed());
    }
}
