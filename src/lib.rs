//! Speedtest Exporter
//!
//! A Prometheus metrics exporter that periodically measures network throughput
//! (download/upload bandwidth, latency, jitter, packet loss) by invoking an
//! external speed-measurement tool and republishes the results on a
//! pull-based `/metrics` endpoint.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod output;
pub mod runner;
pub mod scheduler;
pub mod server;

// Re-export commonly used types
pub use error::{AppError, MeasurementError, Result};
pub use metrics::MetricsRegistry;
pub use models::{Config, MeasurementResult};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_PORT: u16 = 8000;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);
    pub const DEFAULT_COMMAND: &str = "speedtest-cli";
    pub const DEFAULT_LOG_FILE: &str = "speedtest.log";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Upper bound on a single measurement's wall-clock time
    pub const MEASUREMENT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Backstop delay after an unexpected error in the scheduler loop body
    pub const ERROR_RETRY_DELAY: Duration = Duration::from_secs(30);

    /// How long the startup `--version` probe may take
    pub const TOOL_PROBE_TIMEOUT: Duration = Duration::from_secs(15);
}
