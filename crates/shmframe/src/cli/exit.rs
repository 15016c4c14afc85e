use std::fmt;
use std::io;

use shmframe_frame::FrameError;
use shmframe_segment::SegmentError;
use shmframe_session::SessionError;

// Process exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const SEGMENT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn io_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => SEGMENT_ERROR,
    }
}

pub fn segment_error(context: &str, err: SegmentError) -> CliError {
    let code = match &err {
        SegmentError::InvalidName { .. } => USAGE,
        SegmentError::NotFound { .. } => SEGMENT_ERROR,
        SegmentError::Invalid { .. } => DATA_INVALID,
        SegmentError::Create { source, .. }
        | SegmentError::Attach { source, .. }
        | SegmentError::Lock { source, .. }
        | SegmentError::Io(source) => io_code(source),
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    let code = match &err {
        FrameError::InvalidGeometry { .. } => USAGE,
        FrameError::OutOfBounds { .. } | FrameError::LengthMismatch { .. } => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Segment(err) => segment_error(context, err),
        SessionError::Frame(err) => frame_error(context, err),
        SessionError::TransferTimeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        SessionError::Interrupted => CliError::new(FAILURE, format!("{context}: {err}")),
        SessionError::SizeMismatch { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn maps_session_failures_to_distinct_codes() {
        let missing = SessionError::Segment(SegmentError::NotFound {
            name: "/x".to_string(),
        });
        let err = session_error("attach failed", missing);
        assert_eq!(err.code, SEGMENT_ERROR);
        assert_eq!(err.message, "attach failed: segment /x not found");

        let timeout = SessionError::TransferTimeout(Duration::from_secs(1));
        assert_eq!(session_error("receive failed", timeout).code, TIMEOUT);
    }

    #[test]
    fn stopped_wait_is_a_plain_failure() {
        let err = session_error("receive failed", SessionError::Interrupted);
        assert_eq!(err.code, FAILURE);
        assert_eq!(
            err.message,
            "receive failed: interrupted while waiting for a frame"
        );
    }

    #[test]
    fn create_permission_denied_maps_to_permission_code() {
        let err = SegmentError::Create {
            name: "/x".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(segment_error("publish failed", err).code, PERMISSION_DENIED);
    }
}
