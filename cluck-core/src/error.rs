//! Error types for Cluck codec operations.

use thiserror::Error;

/// Error returned when raw bytes cannot be turned into a [`Message`](crate::Message)
/// or its payload cannot be read as text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes than a frame header were supplied.
    #[error("incomplete header: required {required} bytes, available {available} bytes")]
    IncompleteHeader {
        /// Header size in bytes.
        required: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// Payload is not ASCII text.
    #[error("payload is not ASCII text: invalid byte at offset {offset}")]
    InvalidText {
        /// Offset of the first non-ASCII byte.
        offset: usize,
    },
}

/// Error returned when a frame cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Payload does not fit in the 16-bit length field.
    #[error("payload too large: {size} bytes exceeds maximum {max} bytes")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum payload size.
        max: usize,
    },
}

impl EncodeError {
    /// Creates a payload too large error.
    pub fn payload_too_large(size: usize) -> Self {
        Self::PayloadTooLarge {
            size,
            max: crate::MAX_PAYLOAD_LEN,
        }
    }
}
