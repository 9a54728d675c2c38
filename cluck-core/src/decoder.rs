//! Frame decoding.

use crate::error::DecodeError;
use crate::header::FrameHeader;
use crate::message::Message;
use bytes::Bytes;

/// Decodes one raw packet into a [`Message`].
///
/// The payload is captured only when the declared length is non-zero and the
/// packet holds at least that many bytes after the header. A frame whose
/// payload exactly fills the rest of the packet keeps its payload. A frame
/// that promises more bytes than it carries decodes with no payload rather
/// than a truncated one. Bytes past the declared payload are ignored.
///
/// Unknown codes are passed through unchanged.
///
/// # Errors
/// Returns [`DecodeError::IncompleteHeader`] if `raw` is shorter than
/// [`FrameHeader::ENCODED_LENGTH`].
pub fn decode(raw: &[u8]) -> Result<Message, DecodeError> {
    let header = FrameHeader::wrap(raw)?;
    let data = payload(raw, header.length).map(Bytes::copy_from_slice);
    Ok(Message::from_parts(header.code, data))
}

fn payload(raw: &[u8], length: u16) -> Option<&[u8]> {
    let length = length as usize;
    if length == 0 {
        return None;
    }
    raw.get(FrameHeader::ENCODED_LENGTH..FrameHeader::ENCODED_LENGTH + length)
}
