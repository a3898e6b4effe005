//! Tracing subscriber setup.
//!
//! Logs go to stderr so that stdout stays clean for listings and `--json`
//! output. The filter honours `RUST_LOG`; without it the level is `info`, or
//! `debug` when `--verbose` is passed.

use crate::constants::{DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, VERBOSE_LOG_LEVEL};
use crate::errors::{AppError, AppResult};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Level used when `RUST_LOG` is not set.
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    }
}

/// Installs the global subscriber.
///
/// `format` is `"json"` for one JSON object per event (with span context),
/// anything else for human-readable lines.
///
/// # Errors
///
/// Returns `AppError::Config` if a global subscriber is already installed.
pub fn init(format: &str, verbose: bool) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let result = if format == LOG_FORMAT_JSON {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_timer(ChronoLocal::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoLocal::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to initialize logging: {}", e)))
}
