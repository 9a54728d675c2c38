//! # Cluck Transport
//!
//! Network transport layer for Cluck messaging.
//!
//! This crate provides:
//! - [`tcp`] - TCP client/server connections
//! - [`tcp::CluckFrameCodec`] - header-delimited framing for byte streams

pub mod error;
#[cfg(feature = "tcp-tokio")]
pub mod tcp;

pub use error::TransportError;
