use crate::error::{FrameError, Result};
use crate::pixel::{CHANNELS, MARKER_LEN};

/// Frame dimensions. Pixels are always 4-channel RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameGeometry {
    width: u32,
    height: u32,
}

impl FrameGeometry {
    /// 1920x1080 RGBA, 7,962,624 bytes.
    pub const FULL_HD: Self = Self {
        width: 1920,
        height: 1080,
    };

    /// Smallest frame that still has room for a patched second pixel.
    const MIN_PIXELS: usize = 2;

    /// Validate frame dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let invalid = |reason| FrameError::InvalidGeometry {
            width,
            height,
            reason,
        };

        if width == 0 || height == 0 {
            return Err(invalid("dimensions must be non-zero"));
        }
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| invalid("pixel count overflows"))?;
        pixels
            .checked_mul(CHANNELS)
            .ok_or_else(|| invalid("frame size overflows"))?;
        if pixels < Self::MIN_PIXELS {
            return Err(invalid("frame must hold at least two pixels"));
        }

        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Frame size in bytes (`width * height * 4`).
    pub fn size_bytes(&self) -> usize {
        self.pixel_count() * CHANNELS
    }

    /// Byte offset of the marker slot (the final pixel).
    pub fn marker_offset(&self) -> usize {
        self.size_bytes() - MARKER_LEN
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::FULL_HD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hd_size() {
        assert_eq!(FrameGeometry::FULL_HD.size_bytes(), 1920 * 1080 * 4);
        assert_eq!(FrameGeometry::FULL_HD.size_bytes(), 7_962_624);
        assert_eq!(
            FrameGeometry::FULL_HD.marker_offset(),
            FrameGeometry::FULL_HD.size_bytes() - 4
        );
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(FrameGeometry::new(0, 10).is_err());
        assert!(FrameGeometry::new(10, 0).is_err());
        assert!(FrameGeometry::new(1, 1).is_err());
        assert!(FrameGeometry::new(2, 1).is_ok());
    }
}
