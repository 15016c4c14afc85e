use std::thread;
use std::time::Instant;

use shmframe_frame::{decode_frame, FrameBuffer};
use shmframe_segment::{Detached, SharedSegment};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::timing::{ProcessingStats, TransferMeasurement};

/// Reads frames out of a named segment.
#[derive(Debug, Clone)]
pub struct Consumer {
    config: SessionConfig,
}

impl Consumer {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Attach and wait for the first publication.
    pub fn receive(&self) -> Result<Reception> {
        self.receive_after(0)
    }

    /// Attach and wait for a publication newer than `last_seen`.
    ///
    /// Fails with a segment `NotFound` error if the producer has not created
    /// the segment, and with [`SessionError::TransferTimeout`] if nothing new
    /// is published within the configured timeout.
    pub fn receive_after(&self, last_seen: u64) -> Result<Reception> {
        self.receive_while(last_seen, || true)
    }

    /// Like [`Consumer::receive_after`], but gives up with
    /// [`SessionError::Interrupted`] once `keep_running` returns false.
    pub fn receive_while(
        &self,
        last_seen: u64,
        keep_running: impl Fn() -> bool,
    ) -> Result<Reception> {
        let mut segment = SharedSegment::attach(&self.config.segment_name)?;

        let expected = self.config.geometry.size_bytes();
        if segment.capacity() != expected {
            return Err(SessionError::SizeMismatch {
                expected,
                actual: segment.capacity(),
            });
        }

        let deadline = Instant::now() + self.config.ready_timeout;

        loop {
            let mut guard = segment.lock()?;
            let published = guard.published();
            if published > last_seen {
                let start = Instant::now();
                let frame = decode_frame(self.config.geometry, guard.data())?;
                let measurement = TransferMeasurement::new(start.elapsed());
                guard.acknowledge(published);
                guard.unlock()?;

                info!(
                    segment = %segment.name(),
                    sequence = published,
                    bytes = frame.len(),
                    elapsed_ms = measurement.elapsed_ms(),
                    "received frame"
                );

                return Ok(Reception {
                    segment,
                    frame,
                    sequence: published,
                    measurement,
                });
            }
            guard.unlock()?;

            if !keep_running() {
                return Err(SessionError::Interrupted);
            }
            if Instant::now() >= deadline {
                return Err(SessionError::TransferTimeout(self.config.ready_timeout));
            }
            thread::sleep(self.config.poll_interval);
        }
    }
}

/// A frame copied out of a segment that is still attached.
#[derive(Debug)]
pub struct Reception {
    segment: SharedSegment,
    frame: FrameBuffer,
    sequence: u64,
    measurement: TransferMeasurement,
}

impl Reception {
    /// The local copy of the frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Time spent copying the frame out of the segment.
    pub fn measurement(&self) -> TransferMeasurement {
        self.measurement
    }

    pub fn segment(&self) -> &SharedSegment {
        &self.segment
    }

    /// Release the consumer's attachment, keeping the local frame.
    pub fn detach(self) -> Result<(FrameBuffer, Detached)> {
        let detached = self.segment.detach()?;
        Ok((self.frame, detached))
    }
}

/// Run `passes` timed placeholder passes over `frame`.
///
/// Each pass only reads the frame through an optimization barrier; it stands
/// in for real decode or analysis work.
pub fn process_passes(frame: &FrameBuffer, passes: usize) -> ProcessingStats {
    let mut stats = ProcessingStats::with_capacity(passes);
    for pass in 0..passes {
        let start = Instant::now();
        std::hint::black_box(frame.as_bytes());
        let elapsed = start.elapsed();
        debug!(pass, elapsed_us = elapsed.as_micros() as u64, "processing pass");
        stats.record(elapsed);
    }
    stats
}
