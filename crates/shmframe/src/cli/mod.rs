use std::time::Duration;

use clap::Args;
use shmframe_session::{SessionConfig, DEFAULT_SEGMENT_NAME};

use crate::cli::logging::{init_logging, LogFormat, LogLevel};
use crate::cli::output::OutputFormat;

pub mod consume;
pub mod exit;
pub mod logging;
pub mod output;
pub mod produce;
pub mod signal;

/// Options accepted by both executables.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Shared-memory segment name (both sides must use the same one).
    #[arg(long, value_name = "NAME", env = "SHMFRAME_SEGMENT", default_value = DEFAULT_SEGMENT_NAME)]
    pub name: String,

    /// Output format.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LogLevel,
}

impl CommonArgs {
    /// Install logging and resolve the output format.
    pub fn init(&self) -> OutputFormat {
        init_logging(self.log_format, self.log_level);
        self.format.unwrap_or_else(OutputFormat::default_for_stdout)
    }

    /// Session configuration for the selected segment.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(&self.name)
    }
}

#[derive(Args, Debug)]
pub struct ProduceArgs {
    /// Print the first pixels of the frame before and after patching.
    #[arg(long = "hexOutput", visible_alias = "hex-output")]
    pub hex_output: bool,

    /// Unlink an existing segment under the name first, even while another
    /// process is attached to it.
    #[arg(long)]
    pub force: bool,

    /// Stop waiting for a consumer after this long (e.g. 30s, 500ms).
    /// Default: wait until a consumer reads the frame or Ctrl+C.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub hold_timeout: Option<Duration>,
}

#[derive(Args, Debug)]
pub struct ConsumeArgs {
    /// Print the first pixels of the received frame.
    #[arg(long = "hexOutput", visible_alias = "hex-output")]
    pub hex_output: bool,

    /// Number of timed processing passes.
    #[arg(
        long = "measurementCount",
        visible_alias = "measurement-count",
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub measurement_count: u32,

    /// Maximum time to wait for the producer to publish (e.g. 5s, 500ms).
    #[arg(long, value_name = "DURATION", default_value = "5s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Delay between readiness checks while waiting.
    #[arg(long, value_name = "DURATION", default_value = "1ms", value_parser = parse_duration)]
    pub poll_interval: Duration,
}

/// Clap value parser for `500ms`, `5s`, `2m` or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let digits_end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(digits_end);
    if digits.is_empty() {
        return Err(format!("expected a number with an optional unit, got {input:?}"));
    }
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("duration {input:?} is out of range"))?;

    let duration = match unit {
        "ms" => Duration::from_millis(value),
        "" | "s" => Duration::from_secs(value),
        "m" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration {input:?} is out of range"))?,
        other => return Err(format!("unknown duration unit {other:?} (use ms, s or m)")),
    };
    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_accept_each_unit() {
        assert_eq!(parse_duration("150ms"), Ok(Duration::from_millis(150)));
        assert_eq!(parse_duration("2s"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_duration("3m"), Ok(Duration::from_secs(180)));
        assert_eq!(parse_duration(" 4 "), Ok(Duration::from_secs(4)));
    }

    #[test]
    fn durations_reject_zero_signs_and_unknown_units() {
        assert!(parse_duration("0ms").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("1.5s")
            .unwrap_err()
            .contains("unknown duration unit"));
        assert!(parse_duration("5h").unwrap_err().contains("\"h\""));
    }
}
