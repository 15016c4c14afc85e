//! RGBA pixel model and synthetic fill constants.

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Value every channel of a synthetic frame is filled with.
pub const FILL_BYTE: u8 = 0xCF;

/// Verification marker written into synthetic frames.
pub const MARKER: u32 = 0xCF5A_5ACF;

/// Marker length in bytes.
pub const MARKER_LEN: usize = 4;

/// The marker as stored in a frame (native byte order).
pub const MARKER_BYTES: [u8; MARKER_LEN] = MARKER.to_ne_bytes();

/// One RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Build a pixel from its four channel bytes in RGBA order.
    pub const fn from_bytes(bytes: [u8; CHANNELS]) -> Self {
        Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            a: bytes[3],
        }
    }

    /// Channel bytes in RGBA order.
    pub const fn to_bytes(self) -> [u8; CHANNELS] {
        [self.r, self.g, self.b, self.a]
    }

    /// Zero-padded uppercase hex for each channel.
    pub fn hex_channels(self) -> [String; CHANNELS] {
        self.to_bytes().map(|c| format!("{c:02X}"))
    }
}
