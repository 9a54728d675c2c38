//! Error types for client operations.

use cluck_core::{DecodeError, EncodeError};
use thiserror::Error;

/// Error type for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] cluck_transport::TransportError),

    /// Reply payload could not be read as text.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Request could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Connection closed by server.
    #[error("connection closed")]
    ConnectionClosed,

    /// Server answered with `COMMAND_ERROR`.
    #[error("rejected by server: {0}")]
    Rejected(String),

    /// Server answered with a code the request does not expect.
    #[error("unexpected reply code {code}")]
    UnexpectedReply {
        /// Code of the reply.
        code: u16,
    },
}
