mod app;
mod cli;
mod config;
mod consts;
mod error;
mod portal;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use app::EXIT_CONFIG;
use cli::Cli;
use utils::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match app::run(&cli) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            error!("{err}");
            ExitCode::from(EXIT_CONFIG)
        }
    }
}
