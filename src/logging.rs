//! stderr logging for the CLI.

use crate::cli::LogFormat;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level picked by `-v` flags; `None` defers to `RUST_LOG`.
pub fn level_for(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        _ => Some("debug"),
    }
}

/// Install the subscriber and route `log` records from the library crates
/// through it. Defaults to `warn` when neither `-v` nor `RUST_LOG` is set.
pub fn init(verbose: u8, format: LogFormat) -> anyhow::Result<()> {
    let env_filter = match level_for(verbose) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_log::LogTracer::init()?;

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
    }
    Ok(())
}
