//! Message handler traits.

use crate::error::SendError;
use crate::registry::Registry;
use crate::session::Session;
use bytes::Bytes;
use cluck_core::{DecodeError, Message};

/// Trait for handling decoded Cluck messages.
///
/// Handlers run to completion on the connection task and must not block.
pub trait MessageHandler: Send + Sync {
    /// Called when a packet decoded into a message.
    ///
    /// # Arguments
    /// * `session` - Session that sent the message
    /// * `message` - Decoded message
    /// * `responder` - Interface for sending responses
    fn on_message(&self, session: &Session, message: &Message, responder: &dyn Responder);

    /// Called when a packet could not be decoded.
    ///
    /// # Arguments
    /// * `session` - Session that sent the packet
    /// * `raw` - The undecodable bytes
    /// * `error` - Why decoding failed
    /// * `responder` - Interface for sending responses
    fn on_decode_error(
        &self,
        _session: &Session,
        _raw: &[u8],
        _error: &DecodeError,
        _responder: &dyn Responder,
    ) {
    }

    /// Called when a new session is established.
    fn on_session_start(&self, _session: &Session) {}

    /// Called when a session ends.
    fn on_session_end(&self, _session: &Session) {}
}

/// Responder for sending frames back to clients.
pub trait Responder: Send + Sync {
    /// Sends an encoded frame to the originating session.
    ///
    /// # Errors
    /// Returns error if the session's connection is gone.
    fn send(&self, frame: Bytes) -> Result<(), SendError>;

    /// Sends an encoded frame to every ready session.
    ///
    /// # Returns
    /// The number of sessions the frame was queued for.
    fn broadcast(&self, frame: Bytes) -> usize;
}

/// [`Responder`] bound to one session and the shared registry.
pub struct SessionResponder<'a> {
    session: &'a Session,
    registry: &'a Registry,
}

impl<'a> SessionResponder<'a> {
    /// Creates a responder for `session`.
    #[must_use]
    pub fn new(session: &'a Session, registry: &'a Registry) -> Self {
        Self { session, registry }
    }
}

impl Responder for SessionResponder<'_> {
    fn send(&self, frame: Bytes) -> Result<(), SendError> {
        self.session.send(frame)
    }

    fn broadcast(&self, frame: Bytes) -> usize {
        self.registry.broadcast(&frame)
    }
}
