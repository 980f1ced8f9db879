//! Structured logging for the speedtest exporter
//!
//! Timestamped log lines go to standard output and, when configured, to a log
//! file. The level filter is driven by the `--verbose`/`--debug` flags.

use crate::error::Result;
use crate::models::Config;
use colored::Colorize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn colorize(&self, text: &str) -> String {
        match self {
            LogLevel::Debug => text.cyan().to_string(),
            LogLevel::Info => text.green().to_string(),
            LogLevel::Warn => text.yellow().to_string(),
            LogLevel::Error => text.red().to_string(),
        }
    }
}

/// Logger writing to stdout and an optional log file
#[derive(Debug)]
pub struct Logger {
    name: String,
    min_level: LogLevel,
    use_color: bool,
    file: Option<Mutex<File>>,
}

impl Logger {
    /// Create a logger from the application configuration.
    ///
    /// Opens the configured log file in append mode; a missing parent
    /// directory or permission problem is surfaced as an I/O error.
    pub fn new(name: &str, config: &Config) -> Result<Self> {
        let min_level = if config.debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };

        let file = match &config.log_file {
            Some(path) => {
                let handle = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                Some(Mutex::new(handle))
            }
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            min_level,
            use_color: config.enable_color,
            file,
        })
    }

    /// Logger writing to stdout only, at the given level
    pub fn stdout_only(name: &str, min_level: LogLevel) -> Self {
        Self {
            name: name.to_string(),
            min_level,
            use_color: false,
            file: None,
        }
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn write(&self, level: LogLevel, message: &str) {
        if !self.would_log(level) {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let plain = format!(
            "{} {:>5} [{}] {}",
            timestamp,
            level.as_str(),
            self.name,
            message
        );

        if self.use_color {
            let tag = level.colorize(&format!("{:>5}", level.as_str()));
            println!("{} {} [{}] {}", timestamp, tag, self.name, message);
        } else {
            println!("{}", plain);
        }

        if let Some(file) = &self.file {
            // The file sink never recolors and never takes the process down.
            let mut guard = match file.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let _ = writeln!(guard, "{}", plain);
        }
    }

    pub fn debug(&self, message: &str) {
        self.write(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.write(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.write(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.write(LogLevel::Error, message);
    }
}
