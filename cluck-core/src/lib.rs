//! # Cluck Core
//!
//! Wire codec for the Cluck messaging protocol.
//!
//! This crate provides:
//! - [`FrameHeader`] - the 4-byte code/length header
//! - [`MessageCode`] - the known message codes
//! - [`Message`] - a code with an optional payload
//! - [`encode`] and [`decode`] for raw frames
//! - Error types for encoding/decoding operations

pub mod code;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod message;

pub use code::MessageCode;
pub use decoder::decode;
pub use encoder::encode;
pub use error::{DecodeError, EncodeError};
pub use header::FrameHeader;
pub use message::Message;

/// Largest payload a single frame can carry.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;
