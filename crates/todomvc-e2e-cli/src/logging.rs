//! Tracing subscriber setup
//!
//! Log lines go to stderr so stdout stays clean for reports. `RUST_LOG`
//! wins over the `-v` count when set.

use crate::config::{ColorChoice, Verbosity};
use crate::error::{CliError, CliResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
pub fn init(verbosity: Verbosity, color: ColorChoice) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(color.should_color())
                .with_target(verbosity == Verbosity::Debug)
                .compact(),
        )
        .try_init()
        .map_err(|e| CliError::config(format!("failed to initialize logging: {e}")))
}
