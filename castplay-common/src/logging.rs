//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence. Otherwise the configured level applies to
//! everything, including `tower_http` request traces.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directives for a configured level
pub fn default_directives(level: &str) -> String {
    format!("{level},tower_http={level}")
}

/// Install the global tracing subscriber
///
/// Writes to the configured log file (appending, no ANSI colors) when one is
/// set, to stderr otherwise.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let (stderr_layer, file_layer) = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    Error::Config(format!("Failed to open log file {}: {}", path.display(), e))
                })?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => (Some(fmt::layer()), None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
