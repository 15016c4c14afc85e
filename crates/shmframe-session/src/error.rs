use std::time::Duration;

/// Errors that can occur during a frame handoff.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Segment-level error.
    #[error("segment error: {0}")]
    Segment(#[from] shmframe_segment::SegmentError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] shmframe_frame::FrameError),

    /// No frame was published before the wait expired.
    #[error("no frame published within {0:?}")]
    TransferTimeout(Duration),

    /// The caller stopped the wait before a frame was published.
    #[error("interrupted while waiting for a frame")]
    Interrupted,

    /// The segment or frame size disagrees with the configured geometry.
    #[error("size mismatch ({actual} bytes, expected {expected})")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, SessionError>;
