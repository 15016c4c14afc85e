//! Single-frame shared-memory handoff with latency measurement.
//!
//! A producer process publishes one RGBA frame into a named shared-memory
//! segment; a consumer process attaches, waits for the publication, copies
//! the frame out and reports transfer and processing frame rates.
//!
//! # Crate Structure
//!
//! - [`segment`] — Named shared-memory segments with crash-safe attachment and locking
//! - [`frame`] — Frame geometry, RGBA buffers, wire form and pixel dumps
//! - [`session`] — Producer/consumer handoff and timing

/// Re-export segment types.
pub mod segment {
    pub use shmframe_segment::*;
}

/// Re-export frame types.
pub mod frame {
    pub use shmframe_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use shmframe_session::*;
}

/// Support code for the `produce` and `consume` executables.
#[cfg(feature = "cli")]
#[doc(hidden)]
pub mod cli;
