//! Cluck frame header.
//!
//! Every frame starts with a [`FrameHeader`] followed by `length` payload
//! bytes.

use crate::error::DecodeError;
use bytes::BufMut;

/// Frame header (4 bytes).
///
/// # Wire Format
/// ```text
/// +0: code    (u16, big-endian)
/// +2: length  (u16, big-endian)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHeader {
    /// Message code.
    pub code: u16,
    /// Payload length in bytes.
    pub length: u16,
}

impl FrameHeader {
    /// Encoded length of the header in bytes.
    pub const ENCODED_LENGTH: usize = 4;

    /// Creates a new header.
    #[must_use]
    pub const fn new(code: u16, length: u16) -> Self {
        Self { code, length }
    }

    /// Reads a header from the start of `buffer`.
    ///
    /// # Errors
    /// Returns [`DecodeError::IncompleteHeader`] if `buffer` is shorter than
    /// [`Self::ENCODED_LENGTH`].
    pub fn wrap(buffer: &[u8]) -> Result<Self, DecodeError> {
        match buffer {
            [c0, c1, l0, l1, ..] => Ok(Self {
                code: u16::from_be_bytes([*c0, *c1]),
                length: u16::from_be_bytes([*l0, *l1]),
            }),
            _ => Err(DecodeError::IncompleteHeader {
                required: Self::ENCODED_LENGTH,
                available: buffer.len(),
            }),
        }
    }

    /// Appends the encoded header to `dst`.
    #[inline]
    pub fn encode<B: BufMut + ?Sized>(&self, dst: &mut B) {
        dst.put_u16(self.code);
        dst.put_u16(self.length);
    }

    /// Returns the total frame size (header + payload).
    #[must_use]
    pub const fn frame_size(&self) -> usize {
        Self::ENCODED_LENGTH + self.length as usize
    }
}
