//! Cluck framing codec for TCP.
//!
//! Splits a byte stream into complete frames using the frame header, so
//! replies that arrive coalesced in one read are still delivered one
//! [`Message`] at a time.

use crate::error::TransportError;
use bytes::{Bytes, BytesMut};
use cluck_core::{FrameHeader, MAX_PAYLOAD_LEN, Message};
use tokio_util::codec::{Decoder, Encoder};

/// Header-delimited framing codec.
///
/// Frame format: `[2-byte code][2-byte length][length bytes]`, big-endian.
#[derive(Debug, Default, Clone, Copy)]
pub struct CluckFrameCodec;

impl CluckFrameCodec {
    /// Largest frame this codec will write as a raw packet.
    pub const MAX_FRAME_SIZE: usize = FrameHeader::ENCODED_LENGTH + MAX_PAYLOAD_LEN;

    /// Creates a new frame codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for CluckFrameCodec {
    type Item = Message;
    type Error = TransportError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let header = match FrameHeader::wrap(src) {
            Ok(header) => header,
            // Need at least the header
            Err(_) => return Ok(None),
        };

        let frame_size = header.frame_size();
        if src.len() < frame_size {
            src.reserve(frame_size - src.len());
            return Ok(None);
        }

        let frame = src.split_to(frame_size);
        Ok(Some(cluck_core::decode(&frame)?))
    }
}

impl Encoder<&Message> for CluckFrameCodec {
    type Error = TransportError;

    fn encode(&mut self, item: &Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.encode_to(dst);
        Ok(())
    }
}

impl Encoder<Message> for CluckFrameCodec {
    type Error = TransportError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&Message>>::encode(self, &item, dst)
    }
}

/// Writes an already-encoded packet verbatim. The bytes are not checked
/// against the header, which lets callers send malformed packets on purpose.
impl Encoder<Bytes> for CluckFrameCodec {
    type Error = TransportError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.len() > Self::MAX_FRAME_SIZE {
            return Err(TransportError::frame_too_large(
                item.len(),
                Self::MAX_FRAME_SIZE,
            ));
        }

        dst.extend_from_slice(&item);
        Ok(())
    }
}
