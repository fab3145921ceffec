use clap::Parser;
use rallyscan::cli::{run, Cli};
use rallyscan::logging::{init_logging, DEFAULT_LOG_LEVEL};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(DEFAULT_LOG_LEVEL);
    run(cli)
}
