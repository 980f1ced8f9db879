//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                println!("Loaded configuration from .env file");
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Speedtest Exporter Configuration
#
# Values specified here are used as defaults and can be overridden by
# command-line arguments.

# Port for the Prometheus metrics server
# SPEEDTEST_PORT=8000

# Seconds between measurements in continuous mode
# SPEEDTEST_INTERVAL=300

# Measurement tool binary (must accept --json and --version)
# SPEEDTEST_COMMAND=speedtest-cli

# Wall-clock bound on a single measurement, in seconds (1-600)
# SPEEDTEST_TIMEOUT=120

# Log file path; leave empty to log to stdout only
# SPEEDTEST_LOG_FILE=speedtest.log
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content).map_err(|e| {
            AppError::config(format!("Failed to write example .env file: {}", e))
        })?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "SPEEDTEST_PORT" => {
                value.parse::<u16>().map_err(|e| {
                    AppError::config(format!(
                        "Invalid SPEEDTEST_PORT value '{}': {}",
                        value, e
                    ))
                })?;
            }
            "SPEEDTEST_INTERVAL" => {
                let interval: u64 = value.parse().map_err(|e| {
                    AppError::config(format!(
                        "Invalid SPEEDTEST_INTERVAL value '{}': {}",
                        value, e
                    ))
                })?;
                if interval == 0 {
                    return Err(AppError::config(
                        "SPEEDTEST_INTERVAL must be greater than 0",
                    ));
                }
            }
            "SPEEDTEST_COMMAND" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("SPEEDTEST_COMMAND cannot be empty"));
                }
            }
            "SPEEDTEST_TIMEOUT" => {
                let timeout: u64 = value.parse().map_err(|e| {
                    AppError::config(format!(
                        "Invalid SPEEDTEST_TIMEOUT value '{}': {}",
                        value, e
                    ))
                })?;
                if timeout == 0 || timeout > 600 {
                    return Err(AppError::config(format!(
                        "SPEEDTEST_TIMEOUT must be between 1 and 600, got: {}",
                        timeout
                    )));
                }
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (
                "SPEEDTEST_PORT",
                "Port for the Prometheus metrics server",
                "8000",
            ),
            (
                "SPEEDTEST_INTERVAL",
                "Seconds between measurements in continuous mode",
                "300",
            ),
            (
                "SPEEDTEST_COMMAND",
                "Measurement tool binary",
                "speedtest-cli",
            ),
            (
                "SPEEDTEST_TIMEOUT",
                "Measurement timeout in seconds (1-600)",
                "120",
            ),
            (
                "SPEEDTEST_LOG_FILE",
                "Log file path (empty disables the file sink)",
                "speedtest.log",
            ),
        ]
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_create_example_content() {
        let content = EnvManager::create_example_env_content();

        assert!(content.contains("SPEEDTEST_PORT="));
        assert!(content.contains("SPEEDTEST_INTERVAL="));
        assert!(content.contains("SPEEDTEST_COMMAND="));
        assert!(content.contains("SPEEDTEST_TIMEOUT="));
        assert!(content.contains("SPEEDTEST_LOG_FILE="));
    }

    #[test]
    fn test_save_example_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = EnvManager::save_example_env_file(temp_file.path());

        assert!(result.is_ok());

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("Speedtest Exporter Configuration"));
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("SPEEDTEST_PORT", "8000").is_ok());
        assert!(EnvManager::validate_env_var("SPEEDTEST_INTERVAL", "300").is_ok());
        assert!(EnvManager::validate_env_var("SPEEDTEST_COMMAND", "speedtest-cli").is_ok());
        assert!(EnvManager::validate_env_var("SPEEDTEST_TIMEOUT", "120").is_ok());

        assert!(EnvManager::validate_env_var("SPEEDTEST_PORT", "70000").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_PORT", "abc").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_INTERVAL", "0").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_COMMAND", " ").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_TIMEOUT", "0").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_TIMEOUT", "601").is_err());

        // Unknown variables are ignored
        assert!(EnvManager::validate_env_var("PATH", "/usr/bin").is_ok());
    }

    #[test]
    fn test_get_supported_env_vars() {
        let vars = EnvManager::get_supported_env_vars();

        assert_eq!(vars.len(), 5);
        assert!(vars.iter().any(|(name, _, _)| *name == "SPEEDTEST_PORT"));
        assert!(vars.iter().any(|(name, _, _)| *name == "SPEEDTEST_INTERVAL"));
        assert!(vars.iter().any(|(name, _, _)| *name == "SPEEDTEST_COMMAND"));
        assert!(vars.iter().any(|(name, _, _)| *name == "SPEEDTEST_TIMEOUT"));
        assert!(vars.iter().any(|(name, _, _)| *name == "SPEEDTEST_LOG_FILE"));
    }
}
