//! Frame encoding.

use crate::error::EncodeError;
use crate::header::FrameHeader;
use bytes::{BufMut, Bytes, BytesMut};

/// Encodes a code and optional payload into a complete frame.
///
/// The header length is zero when `data` is absent or empty; otherwise the
/// payload follows the header verbatim.
///
/// # Errors
/// Returns [`EncodeError::PayloadTooLarge`] if `data` exceeds
/// [`MAX_PAYLOAD_LEN`](crate::MAX_PAYLOAD_LEN) bytes.
pub fn encode(code: u16, data: Option<&[u8]>) -> Result<Bytes, EncodeError> {
    let data = data.unwrap_or_default();
    let length =
        u16::try_from(data.len()).map_err(|_| EncodeError::payload_too_large(data.len()))?;

    let header = FrameHeader::new(code, length);
    let mut buf = BytesMut::with_capacity(header.frame_size());
    header.encode(&mut buf);
    buf.put_slice(data);
    Ok(buf.freeze())
}
