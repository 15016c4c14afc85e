use std::thread;
use std::time::{Duration, Instant};

use shmframe_frame::FrameBuffer;
use shmframe_segment::{Detached, SharedSegment};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::timing::TransferMeasurement;

const HOLD_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Why [`Publication::hold`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// A consumer acknowledged the published sequence.
    Acknowledged,
    /// The hold timeout elapsed first.
    TimedOut,
    /// The caller asked to stop.
    Interrupted,
}

/// Publishes frames into a named segment.
#[derive(Debug, Clone)]
pub struct Producer {
    config: SessionConfig,
}

impl Producer {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create or replace the segment and copy `frame` into it.
    ///
    /// The copy and the sequence bump happen under the segment lock, so a
    /// consumer either sees no publication or the complete frame. The
    /// returned [`Publication`] keeps the segment attached.
    pub fn publish(&self, frame: &FrameBuffer) -> Result<Publication> {
        if frame.geometry() != self.config.geometry {
            return Err(SessionError::SizeMismatch {
                expected: self.config.geometry.size_bytes(),
                actual: frame.len(),
            });
        }

        let wire = frame.to_wire();
        let mut segment = SharedSegment::create_or_replace(&self.config.segment_name, wire.len())?;

        let start = Instant::now();
        let mut guard = segment.lock()?;
        guard.data_mut().copy_from_slice(&wire);
        let sequence = guard.publish();
        guard.unlock()?;
        let measurement = TransferMeasurement::new(start.elapsed());

        info!(
            segment = %segment.name(),
            sequence,
            bytes = wire.len(),
            elapsed_ms = measurement.elapsed_ms(),
            "published frame"
        );

        Ok(Publication {
            segment,
            sequence,
            measurement,
        })
    }
}

/// A frame that has been published and is still attached.
#[derive(Debug)]
pub struct Publication {
    segment: SharedSegment,
    sequence: u64,
    measurement: TransferMeasurement,
}

impl Publication {
    /// Sequence number assigned to the frame.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Time spent locking, copying and unlocking.
    pub fn measurement(&self) -> TransferMeasurement {
        self.measurement
    }

    pub fn segment(&self) -> &SharedSegment {
        &self.segment
    }

    /// Whether a consumer has acknowledged this frame.
    pub fn is_acknowledged(&self) -> bool {
        self.segment.acknowledged() >= self.sequence
    }

    /// Keep the segment alive until a consumer acknowledges the frame,
    /// `timeout` elapses, or `keep_running` returns false.
    pub fn hold(&self, timeout: Option<Duration>, keep_running: impl Fn() -> bool) -> HoldOutcome {
        let start = Instant::now();
        loop {
            if self.is_acknowledged() {
                debug!(sequence = self.sequence, "publication acknowledged");
                return HoldOutcome::Acknowledged;
            }
            if !keep_running() {
                return HoldOutcome::Interrupted;
            }
            if timeout.is_some_and(|limit| start.elapsed() >= limit) {
                return HoldOutcome::TimedOut;
            }
            thread::sleep(HOLD_POLL_INTERVAL);
        }
    }

    /// Release the producer's attachment.
    pub fn detach(self) -> Result<Detached> {
        Ok(self.segment.detach()?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use shmframe_frame::FrameGeometry;

    use super::*;
    use crate::consumer::Consumer;

    fn test_config(tag: &str) -> SessionConfig {
        let name = format!(
            "sf-{tag}-{:x}-{:08x}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .subsec_nanos()
        );
        SessionConfig {
            geometry: FrameGeometry::new(16, 8).expect("geometry should be valid"),
            ready_timeout: Duration::from_secs(2),
            ..SessionConfig::new(name)
        }
    }

    #[test]
    fn publish_rejects_mismatched_geometry() {
        let config = test_config("geometry");
        let producer = Producer::new(config);
        let frame = FrameBuffer::simulate(FrameGeometry::new(4, 4).unwrap());
        assert!(matches!(
            producer.publish(&frame),
            Err(SessionError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn hold_returns_when_consumer_acknowledges() {
        let config = test_config("ack");
        let producer = Producer::new(config.clone());
        let publication = producer
            .publish(&FrameBuffer::simulate(config.geometry))
            .expect("publish should succeed");
        assert!(!publication.is_acknowledged());

        let consumer = thread::spawn(move || {
            let reception = Consumer::new(config).receive().expect("receive should succeed");
            reception.detach().expect("detach should succeed")
        });

        let outcome = publication.hold(Some(Duration::from_secs(5)), || true);
        assert_eq!(outcome, HoldOutcome::Acknowledged);

        let (_, consumer_detached) = consumer.join().expect("consumer thread should complete");
        assert_eq!(consumer_detached, Detached::Released);
        assert_eq!(publication.detach().unwrap(), Detached::Destroyed);
    }

    #[test]
    fn hold_times_out_without_consumer() {
        let config = test_config("timeout");
        let publication = Producer::new(config.clone())
            .publish(&FrameBuffer::simulate(config.geometry))
            .expect("publish should succeed");

        let outcome = publication.hold(Some(Duration::from_millis(30)), || true);
        assert_eq!(outcome, HoldOutcome::TimedOut);
    }

    #[test]
    fn hold_stops_when_interrupted() {
        let config = test_config("interrupt");
        let publication = Producer::new(config.clone())
            .publish(&FrameBuffer::simulate(config.geometry))
            .expect("publish should succeed");

        let running = AtomicBool::new(false);
        let outcome = publication.hold(None, || running.load(Ordering::SeqCst));
        assert_eq!(outcome, HoldOutcome::Interrupted);
    }

    #[test]
    fn republish_replaces_previous_frame() {
        let config = test_config("rerun");
        let producer = Producer::new(config.clone());

        let first = producer
            .publish(&FrameBuffer::filled(config.geometry, 0x11))
            .expect("first publish should succeed");
        first.detach().expect("first detach should succeed");

        let second = producer
            .publish(&FrameBuffer::simulate(config.geometry))
            .expect("second publish should succeed");
        assert_eq!(second.sequence(), 1);

        let reception = Consumer::new(config.clone())
            .receive()
            .expect("receive should succeed");
        assert_eq!(
            reception.frame(),
            &FrameBuffer::simulate(config.geometry),
            "no bytes from the first run may survive"
        );
    }
}
