//! Logging setup for the hostlist tools.
//!
//! Results of the CLI go to stdout, so log output is always written to stderr.

use std::env;
use std::io;
use std::str::FromStr;

use time::{format_description, UtcOffset};
use tracing::Level;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;

/// Filter used when neither an explicit level nor `RUST_LOG` is set.
pub const DEFAULT_LEVEL: &str = "warn";

/// Error type for telemetry initialisation failures.
///
/// Kept independent of `hostlist-core` so this crate can be reused on its
/// own. Callers can map this into their own error types as needed.
#[derive(Debug)]
pub enum TelemetryError {
    /// Provided log level string could not be parsed.
    InvalidLevel(String),

    /// Failed to configure the subscriber (should be rare).
    SubscriberInit(String),
}

impl std::fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelemetryError::InvalidLevel(level) => {
                write!(f, "invalid log level: {}", level)
            }
            TelemetryError::SubscriberInit(msg) => write!(f, "failed to init telemetry: {}", msg),
        }
    }
}

impl std::error::Error for TelemetryError {}

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Initialise the global logging subscriber.
///
/// - `level`: optional level or filter expression. If `Some`, it takes
///   precedence over `RUST_LOG`. If `None`, `RUST_LOG` is used when set,
///   otherwise [`DEFAULT_LEVEL`].
///
/// Calling this twice returns [`TelemetryError::SubscriberInit`].
///
/// ```ignore
/// hostlist_telemetry::init(Some("debug"))?;
/// ```
pub fn init(level: Option<&str>) -> Result<()> {
    let filter = if let Some(level_str) = level {
        parse_level_filter(level_str)?
    } else if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(DEFAULT_LEVEL)
    };

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(OffsetTime::new(
            // Falls back to UTC if the local offset cannot be determined.
            UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
            format_description::parse(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]",
            )
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?,
        ));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    Ok(())
}

/// Parse a level string into an `EnvFilter`.
///
/// Plain levels ("info", "debug", ...) become a global filter; anything else
/// is parsed as a full `EnvFilter` expression such as
/// "warn,hostlist_core=debug".
pub fn parse_level_filter(level_str: &str) -> Result<EnvFilter> {
    if Level::from_str(level_str).is_ok() {
        return Ok(EnvFilter::new(level_str));
    }

    EnvFilter::builder()
        .parse(level_str)
        .map_err(|e| TelemetryError::InvalidLevel(format!("{} ({})", level_str, e)))
}
