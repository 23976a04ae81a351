//! Logging bootstrap.
//!
//! Installs a `tracing-subscriber` pipeline for processes embedding the
//! server. Library code only emits through `tracing` macros; embedders
//! that already have a subscriber simply skip this.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::ServerError;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive, e.g. `"info"` or `"trivium=debug"`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json_format: bool,
    /// Enable ANSI colors (human-readable format only).
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            ansi: false,
        }
    }
}

impl LogConfig {
    /// Human-readable output at debug level, for local development.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            ansi: true,
        }
    }
}

/// Installs the global logging subscriber.
///
/// # Errors
///
/// Returns [`ServerError::LoggingInit`] when the filter directive is
/// invalid or a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), ServerError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|error| ServerError::LoggingInit(format!("invalid log level: {error}")))?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_filter(filter);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|error| ServerError::LoggingInit(error.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(config.ansi)
            .with_filter(filter);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|error| ServerError::LoggingInit(error.to_string()))?;
    }

    Ok(())
}
