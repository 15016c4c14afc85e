use shmframe_session::{process_passes, Consumer, SessionConfig};

use crate::cli::exit::{session_error, CliResult, SUCCESS};
use crate::cli::output::{
    print_finished, print_pixels, print_processing, print_transfer, OutputFormat, TransferReport,
};
use crate::cli::signal::install_stop_handler;
use crate::cli::{CommonArgs, ConsumeArgs};

pub fn run(common: &CommonArgs, args: ConsumeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SessionConfig {
        ready_timeout: args.timeout,
        poll_interval: args.poll_interval,
        ..common.session_config()
    };

    let running = install_stop_handler()?;

    let reception = Consumer::new(config)
        .receive_while(0, || running.is_running())
        .map_err(|err| session_error("receive failed", err))?;
    print_transfer(&TransferReport::received(&reception), format);

    if args.hex_output {
        print_pixels(reception.frame(), "Received Pixel", format);
    }

    let stats = process_passes(reception.frame(), args.measurement_count as usize);
    print_processing(&stats, format);

    reception
        .detach()
        .map_err(|err| session_error("detach failed", err))?;

    print_finished(format);
    Ok(SUCCESS)
}
