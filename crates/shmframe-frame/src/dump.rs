//! Text rendering of the leading pixels of a frame.

use std::fmt::Write;

use crate::buffer::FrameBuffer;

/// Number of pixels included in a dump.
pub const DUMP_PIXEL_COUNT: usize = 4;

/// Render the first four pixels of `frame` in decimal and then in
/// zero-padded uppercase hex, one line per pixel, prefixed with `label`.
pub fn dump_pixels(frame: &FrameBuffer, label: &str) -> String {
    let pixels = frame.first_n_pixels(DUMP_PIXEL_COUNT);
    let mut out = String::new();

    let _ = writeln!(out, "First four pixels (RGBA):");
    for (i, p) in pixels.clone().enumerate() {
        let _ = writeln!(
            out,
            "{label} {i}: R={}, G={}, B={}, A={}",
            p.r, p.g, p.b, p.a
        );
    }

    let _ = writeln!(out, "First four pixels (hex):");
    for (i, p) in pixels.enumerate() {
        let _ = writeln!(
            out,
            "{label} {i}: R={:02X}, G={:02X}, B={:02X}, A={:02X}",
            p.r, p.g, p.b, p.a
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FrameGeometry;
    use crate::pixel::{CHANNELS, MARKER_BYTES};

    #[test]
    fn dumps_decimal_then_hex() {
        let mut frame = FrameBuffer::simulate(FrameGeometry::new(4, 2).unwrap());
        frame.patch_pixel(CHANNELS, MARKER_BYTES).unwrap();
        frame.patch_pixel(2 * CHANNELS, [0x00, 0x0A, 0xFF, 0x01]).unwrap();

        let text = dump_pixels(&frame, "Updated Pixel");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "First four pixels (RGBA):");
        assert_eq!(lines[1], "Updated Pixel 0: R=207, G=207, B=207, A=207");
        assert_eq!(lines[2], "Updated Pixel 1: R=207, G=90, B=90, A=207");
        assert_eq!(lines[3], "Updated Pixel 2: R=0, G=10, B=255, A=1");
        assert_eq!(lines[5], "First four pixels (hex):");
        assert_eq!(lines[7], "Updated Pixel 1: R=CF, G=5A, B=5A, A=CF");
        assert_eq!(lines[8], "Updated Pixel 2: R=00, G=0A, B=FF, A=01");
    }
}
