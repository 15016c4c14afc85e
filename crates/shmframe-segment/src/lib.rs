//! Named shared-memory segments.
//!
//! This is the lowest layer of shmframe. A [`SharedSegment`] is a POSIX
//! shared-memory object with a small control header in front of the data
//! region. The header carries the published and acknowledged sequence
//! numbers used by the session layer. Attachment is tracked with
//! open-file-description byte-range locks, so a segment whose attachers have
//! all exited, cleanly or not, is reclaimed by the next create or attach.
//!
//! Everything else builds on the handle and [`SegmentGuard`] provided here.

pub mod error;
pub mod name;

#[cfg(target_os = "linux")]
mod header;
#[cfg(target_os = "linux")]
pub mod segment;

pub use error::{Result, SegmentError};
pub use name::SegmentName;

#[cfg(target_os = "linux")]
pub use header::HEADER_SIZE;
#[cfg(target_os = "linux")]
pub use segment::{Detached, SegmentGuard, SharedSegment};
