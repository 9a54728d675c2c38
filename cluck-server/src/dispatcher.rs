//! Protocol dispatcher routing Cluck messages by code.

use crate::directory::{InMemoryDirectory, UserDirectory};
use crate::handler::{MessageHandler, Responder};
use crate::motd::{BannerSource, StaticBanner};
use crate::session::Session;
use cluck_core::{DecodeError, Message, MessageCode};
use std::sync::Arc;

/// Dispatcher implementing the Cluck request handlers.
///
/// Every request gets exactly one reply on the originating session. Bad
/// packets are answered with `COMMAND_ERROR` and never close the connection.
pub struct MessageDispatcher {
    directory: Arc<dyn UserDirectory>,
    banner: Arc<dyn BannerSource>,
}

impl MessageDispatcher {
    /// Creates a dispatcher with an in-memory directory and the default banner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            directory: Arc::new(InMemoryDirectory::new()),
            banner: Arc::new(StaticBanner::default()),
        }
    }

    /// Replaces the user directory.
    #[must_use]
    pub fn with_directory<D: UserDirectory + 'static>(mut self, directory: D) -> Self {
        self.directory = Arc::new(directory);
        self
    }

    /// Replaces the banner source.
    #[must_use]
    pub fn with_banner<B: BannerSource + 'static>(mut self, banner: B) -> Self {
        self.banner = Arc::new(banner);
        self
    }

    /// Computes the reply to `message` received on `session`.
    pub fn dispatch(&self, session: &Session, message: &Message) -> Message {
        match MessageCode::try_from(message.code()) {
            Ok(MessageCode::MotdRequest) => reply(MessageCode::Motd, &self.banner.banner()),
            Ok(MessageCode::RegisterUser) => self.register_user(session, message),
            Ok(MessageCode::Whoami) => whoami(session),
            Ok(
                MessageCode::Motd
                | MessageCode::CommandSuccess
                | MessageCode::CommandError
                | MessageCode::UserStatus,
            )
            | Err(_) => {
                tracing::warn!(
                    "Session {} sent unhandled message code {}",
                    session.id(),
                    message.code()
                );
                reply(
                    MessageCode::CommandError,
                    &format!("malformed_packet_error: bad message code ({})", message.code()),
                )
            }
        }
    }

    fn register_user(&self, session: &Session, message: &Message) -> Message {
        let name = match message.data_ascii() {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!("Session {} sent undecodable username: {}", session.id(), e);
                return reply(
                    MessageCode::CommandError,
                    "register_user_error: user names must be ASCII text.",
                );
            }
        };

        if let Err(e) = self.directory.validate(name) {
            tracing::debug!("Session {} username {:?} rejected: {}", session.id(), name, e);
            return reply(
                MessageCode::CommandError,
                &format!("register_user_error: {e}"),
            );
        }

        self.directory.register(name);
        session.set_username(name);
        tracing::info!("Session {} registered as {}", session.id(), name);
        reply(
            MessageCode::CommandSuccess,
            &format!("register_user_success: {name} confirmed."),
        )
    }
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageHandler for MessageDispatcher {
    fn on_message(&self, session: &Session, message: &Message, responder: &dyn Responder) {
        let reply = self.dispatch(session, message);
        if let Err(e) = responder.send(reply.encode()) {
            tracing::warn!("Session {} reply dropped: {}", session.id(), e);
        }
    }

    fn on_decode_error(
        &self,
        session: &Session,
        raw: &[u8],
        error: &DecodeError,
        responder: &dyn Responder,
    ) {
        tracing::warn!("Session {} sent malformed packet: {}", session.id(), error);
        let reply = reject_packet(raw, error);
        if let Err(e) = responder.send(reply.encode()) {
            tracing::warn!("Session {} reply dropped: {}", session.id(), e);
        }
    }

    fn on_session_start(&self, session: &Session) {
        tracing::debug!("Session {} ready for requests", session.id());
    }

    fn on_session_end(&self, session: &Session) {
        if let Some(name) = session.username() {
            tracing::debug!("Session {} ({}) ended", session.id(), name);
        }
    }
}

/// Builds the `COMMAND_ERROR` reply for a packet that failed to decode.
#[must_use]
pub fn reject_packet(raw: &[u8], error: &DecodeError) -> Message {
    let text = match error {
        DecodeError::IncompleteHeader { .. } => {
            format!("malformed_packet_error: incomplete header, {raw:02x?}")
        }
        other => format!("malformed_packet_error: {other}"),
    };
    reply(MessageCode::CommandError, &text)
}

fn whoami(session: &Session) -> Message {
    match session.username() {
        Some(name) => reply(MessageCode::UserStatus, &name),
        None => reply(
            MessageCode::CommandError,
            "user_status: host has no registered users.",
        ),
    }
}

/// Builds a text reply, falling back to an empty `COMMAND_ERROR` when the
/// text does not fit in one frame.
fn reply(code: MessageCode, text: &str) -> Message {
    Message::text(code, text).unwrap_or_else(|e| {
        tracing::error!("Cannot build {} reply: {}", code, e);
        Message::empty(MessageCode::CommandError)
    })
}
