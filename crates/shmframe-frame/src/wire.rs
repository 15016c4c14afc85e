//! Serialization of frames into the byte stream placed in shared memory.
//!
//! The current wire form is the raw frame bytes. Going through
//! [`encode_frame`] rather than borrowing the buffer directly leaves room for
//! a versioned header later without touching the producer.

use bytes::{BufMut, Bytes, BytesMut};

use crate::buffer::FrameBuffer;
use crate::error::Result;
use crate::geometry::FrameGeometry;

/// Append the wire form of `frame` to `dst`.
pub fn encode_frame(frame: &FrameBuffer, dst: &mut BytesMut) {
    dst.reserve(frame.len());
    dst.put_slice(frame.as_bytes());
}

/// Parse a wire-form frame of the given geometry.
pub fn decode_frame(geometry: FrameGeometry, src: &[u8]) -> Result<FrameBuffer> {
    FrameBuffer::from_bytes(geometry, src)
}

impl FrameBuffer {
    /// Encode this frame into a freshly allocated wire buffer.
    pub fn to_wire(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());
        encode_frame(self, &mut buf);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::pixel::{CHANNELS, MARKER_BYTES};

    #[test]
    fn wire_form_is_raw_bytes() {
        let geometry = FrameGeometry::new(4, 4).unwrap();
        let mut frame = FrameBuffer::simulate(geometry);
        frame.patch_pixel(CHANNELS, MARKER_BYTES).unwrap();

        let wire = frame.to_wire();
        assert_eq!(wire.len(), geometry.size_bytes());
        assert_eq!(wire.as_ref(), frame.as_bytes());
    }

    #[test]
    fn encode_appends_after_existing_bytes() {
        let geometry = FrameGeometry::new(2, 1).unwrap();
        let frame = FrameBuffer::filled(geometry, 0x11);
        let mut buf = BytesMut::from(&b"xy"[..]);
        encode_frame(&frame, &mut buf);
        assert_eq!(&buf[..2], b"xy");
        assert_eq!(&buf[2..], &[0x11; 8]);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let geometry = FrameGeometry::new(2, 2).unwrap();
        assert!(matches!(
            decode_frame(geometry, &[0u8; 15]),
            Err(FrameError::LengthMismatch { .. })
        ));
    }
}
