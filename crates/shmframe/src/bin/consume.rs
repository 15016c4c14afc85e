use clap::Parser;
use shmframe::cli::{consume, CommonArgs, ConsumeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "consume",
    version,
    about = "Read a frame from shared memory and report transfer and processing FPS"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    args: ConsumeArgs,
}

fn main() {
    let cli = Cli::parse();
    let format = cli.common.init();

    match consume::run(&cli.common, cli.args, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
