//! Configuration data model and validation

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port for the Prometheus metrics server
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds between measurements in continuous mode
    #[serde(default = "default_interval_secs")]
    pub interval_seconds: u64,

    /// Run exactly one measurement cycle, then exit
    #[serde(default)]
    pub single_shot: bool,

    /// Whether to start the metrics HTTP server at all
    #[serde(default = "default_serve_metrics")]
    pub serve_metrics: bool,

    /// Measurement tool binary (must accept `--json` and `--version`)
    #[serde(default = "default_command")]
    pub command: String,

    /// Wall-clock bound on a single measurement
    #[serde(default = "default_measurement_timeout_secs")]
    pub measurement_timeout_seconds: u64,

    /// Log file path; `None` disables the file sink
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            interval_seconds: default_interval_secs(),
            single_shot: false,
            serve_metrics: default_serve_metrics(),
            command: default_command(),
            measurement_timeout_seconds: default_measurement_timeout_secs(),
            log_file: default_log_file(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the measurement interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Get the measurement timeout as Duration
    pub fn measurement_timeout(&self) -> Duration {
        Duration::from_secs(self.measurement_timeout_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.interval_seconds == 0 {
            return Err(AppError::config(
                "Measurement interval must be greater than 0",
            ));
        }

        if self.measurement_timeout_seconds == 0 {
            return Err(AppError::config(
                "Measurement timeout must be greater than 0",
            ));
        }

        if self.measurement_timeout_seconds > 600 {
            return Err(AppError::config(
                "Measurement timeout cannot exceed 600 seconds",
            ));
        }

        if self.command.trim().is_empty() {
            return Err(AppError::config("Measurement command cannot be empty"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("SPEEDTEST_PORT") {
            self.port = port.parse().map_err(|e| {
                AppError::config(format!("Invalid SPEEDTEST_PORT value '{}': {}", port, e))
            })?;
        }

        if let Ok(interval) = std::env::var("SPEEDTEST_INTERVAL") {
            self.interval_seconds = interval.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid SPEEDTEST_INTERVAL value '{}': {}",
                    interval, e
                ))
            })?;
        }

        if let Ok(command) = std::env::var("SPEEDTEST_COMMAND") {
            if !command.trim().is_empty() {
                self.command = command;
            }
        }

        if let Ok(timeout) = std::env::var("SPEEDTEST_TIMEOUT") {
            self.measurement_timeout_seconds = timeout.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid SPEEDTEST_TIMEOUT value '{}': {}",
                    timeout, e
                ))
            })?;
        }

        if let Ok(log_file) = std::env::var("SPEEDTEST_LOG_FILE") {
            // An empty value disables the file sink entirely.
            if log_file.trim().is_empty() {
                self.log_file = None;
            } else {
                self.log_file = Some(PathBuf::from(log_file));
            }
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_port() -> u16 {
    crate::defaults::DEFAULT_PORT
}

fn default_interval_secs() -> u64 {
    crate::defaults::DEFAULT_INTERVAL.as_secs()
}

fn default_serve_metrics() -> bool {
    true
}

fn default_command() -> String {
    crate::defaults::DEFAULT_COMMAND.to_string()
}

fn default_measurement_timeout_secs() -> u64 {
    crate::defaults::MEASUREMENT_TIMEOUT.as_secs()
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from(crate::defaults::DEFAULT_LOG_FILE))
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
