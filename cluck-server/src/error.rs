//! Error types for server operations.

use thiserror::Error;

/// Error type for server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] cluck_transport::TransportError),
}

/// Error returned when a frame cannot be queued for a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("send error: session {session_id} is closed")]
pub struct SendError {
    /// Session the frame was addressed to.
    pub session_id: u64,
}
