//! Error handling for the speedtest exporter

use thiserror::Error;

/// Failure kinds the measurement path can produce.
///
/// All of these are non-fatal: the scheduler logs them, bumps the failure
/// counter, and carries on with the next cycle.
#[derive(Error, Debug)]
pub enum MeasurementError {
    /// The tool exceeded its wall-clock bound and was killed
    #[error("measurement timed out after {0} seconds")]
    Timeout(u64),

    /// The tool ran but exited with a non-zero status
    #[error("measurement tool failed: {stderr}")]
    Tool { stderr: String },

    /// The tool's output was not valid measurement JSON
    #[error("failed to parse measurement output: {0}")]
    Parse(String),

    /// Anything else: spawn failure, missing binary, permission problems
    #[error("unexpected measurement failure: {0}")]
    Unknown(String),
}

impl MeasurementError {
    /// Short kind tag for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Tool { .. } => "tool",
            Self::Parse(_) => "parse",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<serde_json::Error> for MeasurementError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The measurement tool is unavailable at startup
    #[error("Startup error: {0}")]
    Startup(String),

    /// The metrics HTTP server could not bind or serve
    #[error("Metrics server error: {0}")]
    ServerBind(String),

    /// I/O errors (log file, stdout, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// A measurement failure surfaced outside the scheduler loop
    #[error("Measurement error: {0}")]
    Measurement(#[from] MeasurementError),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new startup error
    pub fn startup<S: Into<String>>(message: S) -> Self {
        Self::Startup(message.into())
    }

    /// Create a new metrics server error
    pub fn server_bind<S: Into<String>>(message: S) -> Self {
        Self::ServerBind(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Startup(_) => "STARTUP",
            Self::ServerBind(_) => "SERVER",
            Self::Io(_) => "IO",
            Self::Measurement(_) => "MEASUREMENT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if the error is recoverable (the loop can continue past it)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Measurement(_) | Self::Io(_))
    }

    /// Process exit code for this error.
    ///
    /// Every fatal condition terminates with code 1; success paths
    /// (including a failed single-shot measurement) exit 0 elsewhere.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;
