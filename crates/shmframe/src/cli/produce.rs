use shmframe_frame::{FrameBuffer, CHANNELS, MARKER_BYTES};
use shmframe_segment::SharedSegment;
use shmframe_session::{HoldOutcome, Producer};
use tracing::{info, warn};

use crate::cli::exit::{frame_error, segment_error, session_error, CliResult, SUCCESS};
use crate::cli::output::{
    print_finished, print_pixels, print_transfer, OutputFormat, TransferReport,
};
use crate::cli::signal::install_stop_handler;
use crate::cli::{CommonArgs, ProduceArgs};

pub fn run(common: &CommonArgs, args: ProduceArgs, format: OutputFormat) -> CliResult<i32> {
    let config = common.session_config();

    let mut frame = FrameBuffer::simulate(config.geometry);
    if args.hex_output {
        print_pixels(&frame, "Original Pixel", format);
    }

    // Second pixel carries the marker too, as an in-flight edit.
    frame
        .patch_pixel(CHANNELS, MARKER_BYTES)
        .map_err(|err| frame_error("patch failed", err))?;
    if args.hex_output {
        print_pixels(&frame, "Updated Pixel", format);
    }

    if args.force {
        SharedSegment::remove(&config.segment_name)
            .map_err(|err| segment_error("remove failed", err))?;
    }

    let running = install_stop_handler()?;

    let publication = Producer::new(config)
        .publish(&frame)
        .map_err(|err| session_error("publish failed", err))?;
    print_transfer(&TransferReport::published(&publication), format);
    print_finished(format);

    info!("holding segment until a consumer reads it; press Ctrl+C to exit");
    match publication.hold(args.hold_timeout, || running.is_running()) {
        HoldOutcome::Acknowledged => info!("consumer acknowledged frame"),
        HoldOutcome::TimedOut => warn!("hold timeout elapsed before any consumer read the frame"),
        HoldOutcome::Interrupted => info!("stop requested; releasing segment"),
    }

    publication
        .detach()
        .map_err(|err| session_error("detach failed", err))?;

    Ok(SUCCESS)
}
