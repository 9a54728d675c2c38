//! # Cluck Client
//!
//! Client-side engine for Cluck messaging.
//!
//! This crate provides:
//! - [`ClientSession`], a request/reply wrapper over the TCP transport
//! - Typed helpers for `MOTD_REQUEST`, `REGISTER_USER` and `WHOAMI`

pub mod error;
pub mod session;

pub use error::ClientError;
pub use session::ClientSession;
