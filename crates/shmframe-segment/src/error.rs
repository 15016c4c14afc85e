/// Errors that can occur in shared-memory segment operations.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// The segment name cannot be used as a shared-memory key.
    #[error("invalid segment name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The OS refused to create the segment.
    #[error("failed to create segment {name}: {source}")]
    Create {
        name: String,
        source: std::io::Error,
    },

    /// No live segment exists under the name.
    #[error("segment {name} not found")]
    NotFound { name: String },

    /// The segment exists but could not be opened.
    #[error("failed to attach to segment {name}: {source}")]
    Attach {
        name: String,
        source: std::io::Error,
    },

    /// The object under the name is not a usable segment.
    #[error("segment {name} is invalid: {reason}")]
    Invalid { name: String, reason: String },

    /// Acquiring or releasing the segment lock failed.
    #[error("failed to lock segment {name}: {source}")]
    Lock {
        name: String,
        source: std::io::Error,
    },

    /// An I/O error occurred on the segment.
    #[error("segment I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SegmentError>;
