/*!
Logging initialization for the command line front end.

Logs go to stderr so that stdout only carries command output (text or JSON).
The filter comes from, in order: the `--log-level` flag (or `TRACK_STATS_LOG`),
`RUST_LOG`, then a build-dependent default.
*/

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Default filter when nothing else is configured
fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        // Release builds default to WARN to keep output clean.
        "warn"
    }
}

/// Pick the filter, returning a diagnostic for a rejected `--log-level`
fn build_filter(log_level: Option<&str>, rust_log: Option<&str>) -> (EnvFilter, Option<String>) {
    let mut rejected = None;
    if let Some(directives) = log_level {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return (filter, None),
            Err(e) => rejected = Some(format!("Invalid log filter {directives:?}: {e}")),
        }
    }
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter()));
    (filter, rejected)
}

/// Install the global tracing subscriber
pub fn setup_logging(log_level: Option<&str>) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = build_filter(log_level, rust_log.as_deref());
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        tracing::warn!("Logging was already initialized");
        return;
    }

    if let Some(message) = rejected {
        tracing::warn!("{}", message);
    }

    tracing::debug!(
        "Logging initialized ({} {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
}
