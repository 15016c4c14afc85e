/// Errors that can occur when building or accessing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The requested frame dimensions are unusable.
    #[error("invalid frame geometry {width}x{height}: {reason}")]
    InvalidGeometry {
        width: u32,
        height: u32,
        reason: &'static str,
    },

    /// A pixel write would fall outside the buffer.
    #[error("pixel at byte offset {offset} is outside the {len}-byte frame")]
    OutOfBounds { offset: usize, len: usize },

    /// Source bytes do not match the frame size.
    #[error("frame length mismatch ({actual} bytes, expected {expected})")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
