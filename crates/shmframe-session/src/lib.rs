//! Single-frame handoff between a producer and a consumer process.
//!
//! The [`Producer`] copies a frame into a freshly created segment and bumps
//! the segment's published sequence while holding the segment lock. The
//! [`Consumer`] attaches, waits under the same lock until a sequence newer
//! than the last one it saw is published, copies the frame out and
//! acknowledges it. A consumer that sees nothing within the configured
//! timeout fails with [`SessionError::TransferTimeout`] instead of reading a
//! stale or half-written buffer.

pub mod config;
pub mod consumer;
pub mod error;
pub mod producer;
pub mod timing;

pub use config::{SessionConfig, DEFAULT_SEGMENT_NAME};
pub use consumer::{process_passes, Consumer, Reception};
pub use error::{Result, SessionError};
pub use producer::{HoldOutcome, Publication, Producer};
pub use timing::{fps, ProcessingStats, TransferMeasurement};
