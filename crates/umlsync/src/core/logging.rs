//! Logging infrastructure for diagram synchronization
//!
//! Structured logging uses the `tracing` crate. Resolution, extraction and
//! connection building emit spans and events; hosts decide where they go by
//! installing a subscriber, for instance with [`init_logging`].
//!
//! # Usage
//!
//! ```rust
//! use umlsync::core::logging::init_logging;
//!
//! // Initialize with default settings
//! let _ = init_logging(None, None);
//!
//! // Or with custom level and format
//! let _ = init_logging(Some("debug"), Some("pretty"));
//! ```
//!
//! # Log Levels
//!
//! - `trace`: every resolution strategy tried and every step of a command chain
//! - `debug`: builder passes, recovered introspection failures, command execution
//! - `info`: one event per import or resync
//! - `warn`: skipped entities and dropped members
//! - `error`: failures the host should hear about
//!
//! # Log Formats
//!
//! - `compact`: Single-line format, good for production
//! - `pretty`: Multi-line format with colors, good for development
//! - `json`: JSON format, good for log aggregation systems
//!
//! # Environment Variables
//!
//! - `UMLSYNC_LOG_LEVEL`: Set log level (trace|debug|info|warn|error)
//! - `RUST_LOG`: Alternative way to set log level (tracing-subscriber standard)
//! - `UMLSYNC_LOG_FORMAT`: Set log format (compact|pretty|json)
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only resolver decisions at trace level
//! RUST_LOG="umlsync::plugins::java::resolver=trace" umlsync import --facts shop.json
//!
//! # Everything at info, connection passes at debug
//! RUST_LOG="info,umlsync::plugins::java::connections=debug" umlsync import --facts shop.json
//! ```

use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// The filter directive to install
///
/// An explicit `level` always wins. Otherwise `UMLSYNC_LOG_LEVEL`, then
/// `RUST_LOG`, then `info`.
pub fn level_directive(level: Option<&str>) -> String {
    directive_from(level, |name| std::env::var(name).ok())
}

fn directive_from(level: Option<&str>, env: impl Fn(&str) -> Option<String>) -> String {
    level
        .map(str::to_string)
        .or_else(|| env("UMLSYNC_LOG_LEVEL"))
        .or_else(|| env("RUST_LOG"))
        .map(|directive| directive.trim().to_string())
        .filter(|directive| !directive.is_empty())
        .unwrap_or_else(|| "info".to_string())
}

/// Build the filter for a level; unparsable directives fall back to `info`
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    let directive = level_directive(level);
    EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Warning: Invalid log directive '{}': {}", directive, e);
        EnvFilter::new("info")
    })
}

/// Formatting layer writing to stderr
fn format_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer().with_writer(std::io::stderr).with_level(true);
    match format {
        LogFormat::Compact => layer
            .compact()
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .boxed(),
        LogFormat::Pretty => layer
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::ACTIVE)
            .boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_events(FmtSpan::ACTIVE)
            .boxed(),
    }
}

/// Install the global subscriber
///
/// # Arguments
///
/// * `level` - Filter directive (`debug`, `off`, `umlsync::plugins=trace`, ...).
///            When `None`, see [`level_directive`].
/// * `format` - Log format (compact|pretty|json).
///             When `None`, uses `UMLSYNC_LOG_FORMAT`, or defaults to `compact`.
///
/// # Returns
///
/// Returns an error if the format is unknown or a global subscriber is already set.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_format = format
        .map(str::to_string)
        .or_else(|| std::env::var("UMLSYNC_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());
    let format =
        LogFormat::from_str(&log_format).map_err(|e| format!("Invalid log format: {}", e))?;

    Registry::default()
        .with(format_layer(format))
        .with(build_filter(level))
        .try_init()?;
    Ok(())
}
