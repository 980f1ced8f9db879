//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        // Load from environment file if it exists
        EnvManager::load_env_file(self.cli.debug)?;

        // Merge environment variables into config
        config.merge_from_env()?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config);

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if self.cli.port != crate::defaults::DEFAULT_PORT {
            config.port = self.cli.port;
        }

        if self.cli.interval != crate::defaults::DEFAULT_INTERVAL.as_secs() {
            config.interval_seconds = self.cli.interval;
        }

        if let Some(command) = &self.cli.command {
            config.command = command.clone();
        }

        if self.cli.single {
            config.single_shot = true;
        }

        if self.cli.no_prometheus {
            config.serve_metrics = false;
        }

        config.enable_color = self.cli.use_colors();
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Metrics port: {}", config.port));
    summary.push(format!("Metrics server enabled: {}", config.serve_metrics));
    summary.push(format!("Interval: {}s", config.interval_seconds));
    summary.push(format!(
        "Mode: {}",
        if config.single_shot { "single-shot" } else { "continuous" }
    ));
    summary.push(format!("Command: {}", config.command));
    summary.push(format!(
        "Measurement timeout: {}s",
        config.measurement_timeout_seconds
    ));
    summary.push(format!(
        "Log file: {}",
        config
            .log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "disabled".to_string())
    ));
    summary.push(format!("Color output: {}", config.enable_color));

    summary.join("\n")
}
