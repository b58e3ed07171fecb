//! Log output and request observability settings.

use clap::Args;

/// How log lines are rendered.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Single-line text for terminals.
    Compact,

    /// One JSON object per event, with the span list attached.
    Json,
}

/// Log level and format.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Level or full filter directives for storefront targets
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Thresholds applied by the request logging middleware.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Requests slower than this are logged at `warn`.
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000_u64)]
    pub slow_request_threshold_ms: u64,
}
