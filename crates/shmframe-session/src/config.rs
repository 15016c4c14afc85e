use std::time::Duration;

use shmframe_frame::FrameGeometry;

/// Segment name used when none is configured.
pub const DEFAULT_SEGMENT_NAME: &str = "shmframe.frame";

/// Configuration shared by both sides of a handoff.
///
/// Producer and consumer must agree on `segment_name` and `geometry`; no
/// negotiation happens over the segment.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Shared-memory key both processes rendezvous on.
    pub segment_name: String,
    /// Frame dimensions.
    pub geometry: FrameGeometry,
    /// How long a consumer waits for a publication.
    pub ready_timeout: Duration,
    /// Sleep between readiness checks.
    pub poll_interval: Duration,
}

impl SessionConfig {
    /// Default configuration with an explicit segment name.
    pub fn new(segment_name: impl Into<String>) -> Self {
        Self {
            segment_name: segment_name.into(),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            segment_name: DEFAULT_SEGMENT_NAME.to_string(),
            geometry: FrameGeometry::FULL_HD,
            ready_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(1),
        }
    }
}
