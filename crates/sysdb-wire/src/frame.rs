//! Frame header and incremental frame decoder.
//!
//! A frame is `{code: u32, length: u32, payload[length]}`, all integers
//! big-endian (spec.md §4.2). [`FrameDecoder`] buffers partial reads keyed
//! by how many header/payload bytes have been seen so far, so a caller can
//! feed it whatever a non-blocking socket read happens to return and ask
//! "is there a complete frame yet?" without restarting from byte zero on
//! every call (spec.md §9 "Connection state leakage on truncated frames").

use crate::error::WireError;

pub const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub code: u32,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(code: u32, payload: Vec<u8>) -> Self {
        Frame { code, payload }
    }

    /// Encode `{code, length, payload}` as bytes ready to write to a socket.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&self.code.to_be_bytes());
        out.extend_from_slice(&(self.payload.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.payload);
        out
    }
}

pub fn encode_header(code: u32, length: u32) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    out[0..4].copy_from_slice(&code.to_be_bytes());
    out[4..8].copy_from_slice(&length.to_be_bytes());
    out
}

pub fn decode_header(bytes: &[u8; HEADER_LEN]) -> (u32, u32) {
    let code = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
    let length = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    (code, length)
}

/// Incremental frame decoder over a growable byte buffer. Not a socket
/// reader itself — the connection layer owns the socket; this just knows
/// how to tell a complete frame apart from a partial one.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        FrameDecoder::default()
    }

    /// Append freshly-read bytes to the decode buffer.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// How many bytes of the current frame are already buffered. Used by
    /// callers that want to size their next `read()` without over-reading
    /// into the next frame.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// If a complete frame is buffered, drain and return it. Returns
    /// `Ok(None)` (not an error) when more bytes are still needed — the
    /// spec's "returning 0 means nothing new available" behavior.
    pub fn try_take_frame(&mut self) -> Result<Option<Frame>, WireError> {
        if self.buf.len() < HEADER_LEN {
            return Ok(None);
        }
        let header: [u8; HEADER_LEN] = self.buf[..HEADER_LEN].try_into().unwrap();
        let (code, length) = decode_header(&header);
        let total = HEADER_LEN + length as usize;
        if self.buf.len() < total {
            return Ok(None);
        }
        let payload = self.buf[HEADER_LEN..total].to_vec();
        self.buf.drain(..total);
        Ok(Some(Frame::new(code, payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_frame_fed_in_one_shot() {
        let frame = Frame::new(7, b"hello".to_vec());
        let mut dec = FrameDecoder::new();
        dec.feed(&frame.encode());
        assert_eq!(dec.try_take_frame().unwrap(), Some(frame));
    }

    #[test]
    fn decodes_frame_fed_byte_by_byte() {
        let frame = Frame::new(11, b"some payload bytes".to_vec());
        let bytes = frame.encode();
        let mut dec = FrameDecoder::new();
        for b in &bytes[..bytes.len() - 1] {
            dec.feed(&[*b]);
            assert_eq!(dec.try_take_frame().unwrap(), None);
        }
        dec.feed(&bytes[bytes.len() - 1..]);
        assert_eq!(dec.try_take_frame().unwrap(), Some(frame));
    }

    #[test]
    fn handles_two_frames_in_one_feed() {
        let a = Frame::new(1, vec![]);
        let b = Frame::new(2, vec![9, 9]);
        let mut bytes = a.encode();
        bytes.extend(b.encode());
        let mut dec = FrameDecoder::new();
        dec.feed(&bytes);
        assert_eq!(dec.try_take_frame().unwrap(), Some(a));
        assert_eq!(dec.try_take_frame().unwrap(), Some(b));
        assert_eq!(dec.try_take_frame().unwrap(), None);
    }
}
