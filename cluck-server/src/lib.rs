//! # Cluck Server
//!
//! Server-side engine for Cluck messaging.
//!
//! This crate provides:
//! - Server builder with configuration options
//! - Per-connection [`Session`] state and the shared [`Registry`]
//! - Message handler trait and the protocol [`MessageDispatcher`]
//! - Seams for the user directory and the message-of-the-day banner

pub mod builder;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod motd;
pub mod registry;
pub mod session;

pub use builder::{Server, ServerBuilder, ServerCommand, ServerEvent, ServerHandle};
pub use directory::{InMemoryDirectory, UserDirectory, UsernameError, validate_username};
pub use dispatcher::{MessageDispatcher, reject_packet};
pub use error::{SendError, ServerError};
pub use handler::{MessageHandler, Responder, SessionResponder};
pub use motd::{BannerSource, StaticBanner};
pub use registry::Registry;
pub use session::{Session, SessionState};
