//! Control header stored at the start of every segment.

use std::sync::atomic::{AtomicU32, AtomicU64};

/// Size of the control header that precedes the data region.
pub const HEADER_SIZE: usize = 64;

/// Magic bytes: "SHMF".
pub(crate) const MAGIC: u32 = u32::from_le_bytes(*b"SHMF");

/// Header layout revision. Bumped on any incompatible change.
pub(crate) const LAYOUT_VERSION: u32 = 2;

pub(crate) const STATE_LIVE: u32 = 1;
pub(crate) const STATE_DESTROYED: u32 = 2;

/// Segment control header.
///
/// A freshly truncated segment is zero-filled; the creator writes every
/// field and stores `magic` last with release ordering, so an attacher that
/// observes the magic also observes the rest of the header. `state` only
/// changes while the data lock is held.
///
/// Attachment is not recorded here. Each handle holds a lock on the file
/// instead, which the kernel drops when the owning process exits.
#[repr(C)]
pub(crate) struct SegmentHeader {
    pub magic: AtomicU32,
    pub version: AtomicU32,
    pub capacity: AtomicU64,
    pub published: AtomicU64,
    pub acknowledged: AtomicU64,
    pub state: AtomicU32,
    _reserved: [u8; 28],
}

const _: () = assert!(std::mem::size_of::<SegmentHeader>() == HEADER_SIZE);
