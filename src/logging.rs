use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter directives, e.g. `PUFFCHECK_LOG=debug` or
/// `PUFFCHECK_LOG=puffjson=trace`.
pub const LOG_ENV: &str = "PUFFCHECK_LOG";

/// Log to stderr so stdout only ever carries the check summary.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .without_time(),
        )
        .with(filter)
        .init();
}
