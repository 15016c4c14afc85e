use std::slice::ChunksExact;

use tracing::trace;

use crate::error::{FrameError, Result};
use crate::geometry::FrameGeometry;
use crate::pixel::{Pixel, CHANNELS, FILL_BYTE, MARKER_BYTES, MARKER_LEN};

/// One frame of RGBA pixel data, owned in a single fixed-size allocation.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    geometry: FrameGeometry,
    data: Box<[u8]>,
}

impl FrameBuffer {
    /// A frame with every byte set to zero.
    pub fn zeroed(geometry: FrameGeometry) -> Self {
        Self::filled(geometry, 0)
    }

    /// A frame with every byte set to `byte`.
    pub fn filled(geometry: FrameGeometry, byte: u8) -> Self {
        Self {
            geometry,
            data: vec![byte; geometry.size_bytes()].into_boxed_slice(),
        }
    }

    /// A synthetic frame: every byte is [`FILL_BYTE`] and the final pixel
    /// slot holds the marker.
    pub fn simulate(geometry: FrameGeometry) -> Self {
        let mut frame = Self::filled(geometry, FILL_BYTE);
        let offset = geometry.marker_offset();
        frame.data[offset..offset + MARKER_LEN].copy_from_slice(&MARKER_BYTES);
        trace!(size = frame.len(), "simulated frame");
        frame
    }

    /// Copy `bytes` into a new frame; the length must match the geometry.
    pub fn from_bytes(geometry: FrameGeometry, bytes: &[u8]) -> Result<Self> {
        let mut frame = Self::zeroed(geometry);
        frame.copy_from(bytes)?;
        Ok(frame)
    }

    /// Overwrite the whole frame with `src`.
    pub fn copy_from(&mut self, src: &[u8]) -> Result<()> {
        if src.len() != self.data.len() {
            return Err(FrameError::LengthMismatch {
                expected: self.data.len(),
                actual: src.len(),
            });
        }
        self.data.copy_from_slice(src);
        Ok(())
    }

    /// Overwrite the four bytes starting at byte `offset`.
    pub fn patch_pixel(&mut self, offset: usize, value: [u8; CHANNELS]) -> Result<()> {
        let end = offset
            .checked_add(CHANNELS)
            .filter(|&end| end <= self.data.len())
            .ok_or(FrameError::OutOfBounds {
                offset,
                len: self.data.len(),
            })?;
        self.data[offset..end].copy_from_slice(&value);
        Ok(())
    }

    /// Pixel at `index`, or `None` past the end of the frame.
    pub fn pixel(&self, index: usize) -> Option<Pixel> {
        let start = index.checked_mul(CHANNELS)?;
        let bytes = self.data.get(start..start.checked_add(CHANNELS)?)?;
        let mut rgba = [0u8; CHANNELS];
        rgba.copy_from_slice(bytes);
        Some(Pixel::from_bytes(rgba))
    }

    /// The first `n` pixels (fewer if the frame is smaller).
    ///
    /// The returned iterator is `Clone`, so it can be walked more than once.
    pub fn first_n_pixels(&self, n: usize) -> Pixels<'_> {
        let count = n.min(self.geometry.pixel_count());
        Pixels {
            chunks: self.data[..count * CHANNELS].chunks_exact(CHANNELS),
        }
    }

    /// The value stored in the marker slot, native byte order.
    pub fn marker(&self) -> u32 {
        let offset = self.geometry.marker_offset();
        let mut bytes = [0u8; MARKER_LEN];
        bytes.copy_from_slice(&self.data[offset..offset + MARKER_LEN]);
        u32::from_ne_bytes(bytes)
    }

    /// Whether the marker slot holds the synthetic-frame marker.
    pub fn has_marker(&self) -> bool {
        self.data[self.geometry.marker_offset()..] == MARKER_BYTES
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Frame size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; frames hold at least two pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.geometry.width())
            .field("height", &self.geometry.height())
            .field("len", &self.data.len())
            .finish()
    }
}

/// Iterator over leading pixels of a frame.
#[derive(Clone, Debug)]
pub struct Pixels<'a> {
    chunks: ChunksExact<'a, u8>,
}

impl Iterator for Pixels<'_> {
    type Item = Pixel;

    fn next(&mut self) -> Option<Pixel> {
        let chunk = self.chunks.next()?;
        Some(Pixel::from_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Pixels<'_> {}
