//! Producer and consumer in one process, on two threads.
//!
//! Run with:
//!   cargo run --example in-process
//!
//! For the two-process version:
//!   cargo run --bin produce -- --name demo --hexOutput
//!   cargo run --bin consume -- --name demo --measurementCount 10

use std::thread;
use std::time::Duration;

use shmframe::frame::{FrameBuffer, CHANNELS, MARKER_BYTES};
use shmframe::session::{process_passes, Consumer, HoldOutcome, Producer, SessionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig::new(format!("shmframe-example-{}", std::process::id()));

    let mut frame = FrameBuffer::simulate(config.geometry);
    frame.patch_pixel(CHANNELS, MARKER_BYTES)?;

    let publication = Producer::new(config.clone()).publish(&frame)?;
    eprintln!(
        "Published {} bytes in {:.3} ms ({:.1} fps)",
        frame.len(),
        publication.measurement().elapsed_ms(),
        publication.measurement().fps()
    );

    let consumer = thread::spawn(move || -> Result<(), shmframe::session::SessionError> {
        let reception = Consumer::new(config).receive()?;
        eprintln!(
            "Received sequence {} in {:.3} ms ({:.1} fps)",
            reception.sequence(),
            reception.measurement().elapsed_ms(),
            reception.measurement().fps()
        );
        let stats = process_passes(reception.frame(), 10);
        eprintln!("Average processing FPS: {:.1}", stats.average_fps());
        reception.detach()?;
        Ok(())
    });

    match publication.hold(Some(Duration::from_secs(5)), || true) {
        HoldOutcome::Acknowledged => eprintln!("Consumer acknowledged"),
        other => eprintln!("Consumer did not acknowledge: {other:?}"),
    }

    consumer.join().map_err(|_| "consumer thread panicked")??;
    publication.detach()?;
    Ok(())
}
