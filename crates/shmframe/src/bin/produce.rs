use clap::Parser;
use shmframe::cli::{produce, CommonArgs, ProduceArgs};

#[derive(Parser, Debug)]
#[command(
    name = "produce",
    version,
    about = "Publish a synthetic RGBA frame into shared memory"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    args: ProduceArgs,
}

fn main() {
    let cli = Cli::parse();
    let format = cli.common.init();

    match produce::run(&cli.common, cli.args, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn parses_original_flag_spelling() {
        let cli = Cli::try_parse_from(["produce", "--hexOutput"]).expect("flags should parse");
        assert!(cli.args.hex_output);
        assert!(!cli.args.force);
        assert!(cli.args.hold_timeout.is_none());
    }

    #[test]
    fn parses_name_and_hold_timeout() {
        let cli = Cli::try_parse_from([
            "produce",
            "--name",
            "session-a",
            "--hold-timeout",
            "500ms",
            "--force",
        ])
        .expect("flags should parse");
        assert_eq!(cli.common.name, "session-a");
        assert_eq!(cli.args.hold_timeout, Some(Duration::from_millis(500)));
        assert!(cli.args.force);
    }

    #[test]
    fn rejects_hold_timeout_without_known_unit() {
        let err = Cli::try_parse_from(["produce", "--hold-timeout", "5h"])
            .expect_err("unknown unit should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn help_is_reported_as_display_help() {
        let err = Cli::try_parse_from(["produce", "--help"]).expect_err("help short-circuits");
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
