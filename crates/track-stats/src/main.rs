//! Track Stats - command line front end for track-stats-lib

mod logging;
mod report;
mod settings;

use clap::Parser;
use settings::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = Settings::parse();
    logging::setup_logging(settings.log_level.as_deref());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match report::run(&settings, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
