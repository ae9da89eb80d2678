use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt};

/// Install the stdout subscriber; `RUST_LOG` wins over `--verbose`.
pub(crate) fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .with_file(true)
        .with_line_number(true)
        .init();
}
