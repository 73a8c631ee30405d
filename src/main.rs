//! PiBackbone - Main entry point
//!
//! Parses arguments, sets up logging and runs one installer session.

use pibackbone::app::{App, Tone, announce, fatal_message};
use pibackbone::cli::Cli;
use pibackbone::config::{LogLevel, Settings};
use pibackbone::host::SystemHost;
use pibackbone::menu::DialoguerPrompter;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with message-only output.
///
/// `RUST_LOG` wins when set; otherwise the level comes from `LOGLEVEL`.
fn init_logger(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let _cli = Cli::parse_args();

    let settings = Settings::from_env();
    init_logger(settings.log_level);
    debug!("Settings: {:?}", settings);

    let mut prompter = DialoguerPrompter::new();
    let mut app = App::new(settings, &mut prompter, SystemHost::detect());

    match app.run() {
        Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
        Err(e) => {
            announce(Tone::Failure, &fatal_message(&e));
            ExitCode::from(1)
        }
    }
}
