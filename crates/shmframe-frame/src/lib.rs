//! Fixed-layout RGBA frame buffers.
//!
//! A frame is `width * height * 4` bytes, row-major, one byte per channel.
//! Synthetic frames are filled with [`FILL_BYTE`] and carry the 32-bit
//! [`MARKER`] in their final pixel slot so a reader can tell that the bytes
//! came from a producer run rather than from a zeroed segment.
//!
//! The wire form of a frame is the raw pixel bytes: no header, no length
//! prefix. The marker is stored in native byte order.

pub mod buffer;
pub mod dump;
pub mod error;
pub mod geometry;
pub mod pixel;
pub mod wire;

pub use buffer::{FrameBuffer, Pixels};
pub use dump::{dump_pixels, DUMP_PIXEL_COUNT};
pub use error::{FrameError, Result};
pub use geometry::FrameGeometry;
pub use pixel::{Pixel, CHANNELS, FILL_BYTE, MARKER, MARKER_BYTES, MARKER_LEN};
pub use wire::{decode_frame, encode_frame};
