use clap::Parser;
use tradecouncil::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
