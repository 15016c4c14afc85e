use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cli::exit::{CliError, CliResult, INTERNAL};

/// Cleared by SIGINT, SIGTERM or SIGHUP; wait loops poll it and return so
/// the segment handle is detached before exit.
#[derive(Clone, Debug)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn install_stop_handler() -> CliResult<RunFlag> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))?;
    Ok(RunFlag(running))
}
