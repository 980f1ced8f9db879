//! Command-line interface

use clap::Parser;

/// Speedtest Exporter - periodic network throughput measurements as Prometheus metrics
#[derive(Parser, Debug, Clone)]
#[command(name = "speedtest-exporter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Port for the Prometheus metrics server
    #[arg(short, long, default_value_t = crate::defaults::DEFAULT_PORT)]
    pub port: u16,

    /// Seconds between measurements in continuous mode
    #[arg(short, long, value_parser = parse_interval, default_value_t = crate::defaults::DEFAULT_INTERVAL.as_secs())]
    pub interval: u64,

    /// Run a single measurement and exit instead of looping
    #[arg(long)]
    pub single: bool,

    /// Do not start the Prometheus metrics server
    #[arg(long = "no-prometheus")]
    pub no_prometheus: bool,

    /// Measurement tool binary (must accept --json and --version)
    #[arg(long)]
    pub command: Option<String>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(command) = &self.command {
            if command.trim().is_empty() {
                return Err("--command cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Parse interval from seconds string
fn parse_interval(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid interval: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid interval: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Interval must be greater than 0".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
