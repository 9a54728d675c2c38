//! Cluck message type.

use crate::code::MessageCode;
use crate::error::{DecodeError, EncodeError};
use crate::header::FrameHeader;
use crate::MAX_PAYLOAD_LEN;
use bytes::{Bytes, BytesMut};

/// A message code with an optional payload.
///
/// The payload is never longer than [`MAX_PAYLOAD_LEN`], so the header
/// length field always matches the bytes that follow it. An empty payload is
/// stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    code: u16,
    data: Option<Bytes>,
}

impl Message {
    /// Creates a message from a raw code and payload.
    ///
    /// # Errors
    /// Returns [`EncodeError::PayloadTooLarge`] if `data` exceeds
    /// [`MAX_PAYLOAD_LEN`] bytes.
    pub fn new(code: impl Into<u16>, data: Option<Bytes>) -> Result<Self, EncodeError> {
        match data {
            Some(d) if d.len() > MAX_PAYLOAD_LEN => Err(EncodeError::payload_too_large(d.len())),
            Some(d) if d.is_empty() => Ok(Self::empty(code)),
            data => Ok(Self {
                code: code.into(),
                data,
            }),
        }
    }

    /// Creates a message without a payload.
    #[must_use]
    pub fn empty(code: impl Into<u16>) -> Self {
        Self {
            code: code.into(),
            data: None,
        }
    }

    /// Creates a message whose payload is `text`.
    ///
    /// # Errors
    /// Returns [`EncodeError::PayloadTooLarge`] if `text` is too long.
    pub fn text(code: impl Into<u16>, text: &str) -> Result<Self, EncodeError> {
        Self::new(code, Some(Bytes::copy_from_slice(text.as_bytes())))
    }

    pub(crate) fn from_parts(code: u16, data: Option<Bytes>) -> Self {
        Self { code, data }
    }

    /// Returns the raw message code.
    #[must_use]
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Returns the message code if it is a known one.
    #[must_use]
    pub fn known_code(&self) -> Option<MessageCode> {
        MessageCode::try_from(self.code).ok()
    }

    /// Returns the payload length, zero when absent.
    #[must_use]
    pub fn length(&self) -> u16 {
        // Bounded by MAX_PAYLOAD_LEN at construction.
        self.data.as_ref().map_or(0, |d| d.len() as u16)
    }

    /// Returns the payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Returns true if the message carries a payload.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Returns the payload as ASCII text. An absent payload reads as `""`.
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidText`] if the payload contains a
    /// non-ASCII byte.
    pub fn data_ascii(&self) -> Result<&str, DecodeError> {
        let bytes = self.data.as_deref().unwrap_or_default();
        if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
            return Err(DecodeError::InvalidText { offset });
        }
        // ASCII is always valid UTF-8.
        std::str::from_utf8(bytes).map_err(|e| DecodeError::InvalidText {
            offset: e.valid_up_to(),
        })
    }

    /// Returns the header describing this message.
    #[must_use]
    pub fn header(&self) -> FrameHeader {
        FrameHeader::new(self.code, self.length())
    }

    /// Encodes the message into a complete frame.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let header = self.header();
        let mut buf = BytesMut::with_capacity(header.frame_size());
        self.encode_to(&mut buf);
        buf.freeze()
    }

    /// Appends the encoded frame to `dst`.
    pub fn encode_to(&self, dst: &mut BytesMut) {
        let header = self.header();
        dst.reserve(header.frame_size());
        header.encode(dst);
        if let Some(data) = &self.data {
            dst.extend_from_slice(data);
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "message(code={}, length={}", self.code, self.length())?;
        match &self.data {
            Some(data) => write!(f, ", data={:?})", data),
            None => write!(f, ", data=None)"),
        }
    }
}
