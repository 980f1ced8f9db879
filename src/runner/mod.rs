//! Measurement execution
//!
//! Shells out to the speed test tool with JSON output, bounds the run with a
//! hard timeout, and parses the result. The child process is killed whenever
//! the wait future is dropped, so a timed-out run never leaves an orphan.

use crate::error::{AppError, MeasurementError};
use crate::logging::Logger;
use crate::models::{Config, MeasurementResult};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

/// Runs one speed test per call; owned by the scheduler
pub struct MeasurementRunner {
    command: String,
    timeout: Duration,
    logger: Arc<Logger>,
}

impl MeasurementRunner {
    pub fn new(config: &Config, logger: Arc<Logger>) -> Self {
        Self {
            command: config.command.clone(),
            timeout: config.measurement_timeout(),
            logger,
        }
    }

    /// Execute a single measurement and parse its JSON output
    pub async fn run(&self) -> Result<MeasurementResult, MeasurementError> {
        self.logger
            .info(&format!("Running speed test via '{} --json'", self.command));

        let child = Command::new(&self.command)
            .arg("--json")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MeasurementError::Unknown(format!("failed to spawn '{}': {e}", self.command)))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                let err = MeasurementError::Unknown(format!("failed to collect output: {e}"));
                self.logger.error(&format!("Speed test failed: {err}"));
                return Err(err);
            }
            Err(_) => {
                // Dropping the wait future above kills the child
                let err = MeasurementError::Timeout(self.timeout.as_secs());
                self.logger.error(&format!("Speed test failed: {err}"));
                return Err(err);
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let err = MeasurementError::Tool { stderr };
            self.logger.error(&format!("Speed test failed: {err}"));
            return Err(err);
        }

        match serde_json::from_slice::<MeasurementResult>(&output.stdout) {
            Ok(result) => {
                self.logger.info(&format!(
                    "Speed test complete - download: {:.2} Mbps, upload: {:.2} Mbps, ping: {:.2} ms",
                    result.download_mbps(),
                    result.upload_mbps(),
                    result.ping
                ));
                Ok(result)
            }
            Err(e) => {
                let err = MeasurementError::from(e);
                self.logger.error(&format!("Speed test failed: {err}"));
                Err(err)
            }
        }
    }

    /// Verify the configured tool is runnable before entering the main loop
    pub async fn check_tool(&self) -> crate::Result<()> {
        let probe = Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match probe {
            Ok(child) => child,
            Err(e) => {
                return Err(AppError::startup(format!(
                    "speed test tool '{}' is not available: {e}",
                    self.command
                )));
            }
        };

        let probe_result = tokio::time::timeout(
            crate::defaults::TOOL_PROBE_TIMEOUT,
            child.wait_with_output(),
        )
        .await;

        match probe_result {
            Ok(Ok(output)) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout);
                self.logger.debug(&format!(
                    "Found speed test tool: {}",
                    version.lines().next().unwrap_or("").trim()
                ));
                Ok(())
            }
            Ok(Ok(output)) => Err(AppError::startup(format!(
                "speed test tool '{}' exited with {} during version check",
                self.command, output.status
            ))),
            Ok(Err(e)) => Err(AppError::startup(format!(
                "speed test tool '{}' version check failed: {e}",
                self.command
            ))),
            Err(_) => Err(AppError::startup(format!(
                "speed test tool '{}' version check timed out",
                self.command
            ))),
        }
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::models::Config;
    use std::io::Write as _;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_stub(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        write!(file, "{body}").unwrap();
        drop(file);
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn runner_for(command: &str, timeout_secs: u64) -> MeasurementRunner {
        let config = Config {
            command: command.to_string(),
            measurement_timeout_seconds: timeout_secs,
            ..Config::default()
        };
        let logger = Arc::new(Logger::stdout_only("test", crate::logging::LogLevel::Error));
        MeasurementRunner::new(&config, logger)
    }

    #[tokio::test]
    async fn test_run_parses_json_output() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(
            &dir,
            "speedtest-ok",
            r#"echo '{"download": 93412345.6, "upload": 18234567.8, "ping": 17.3,
                     "server": {"name": "Paris", "sponsor": "ExampleNet"},
                     "client": {"isp": "Example ISP", "ip": "203.0.113.9"}}'
"#,
        );

        let runner = runner_for(stub.to_str().unwrap(), 30);
        let result = runner.run().await.unwrap();

        assert!((result.download_mbps() - 93.412_345_6).abs() < 1e-9);
        assert!((result.upload_mbps() - 18.234_567_8).abs() < 1e-9);
        assert_eq!(result.ping, 17.3);
        assert_eq!(result.server.unwrap().name.as_deref(), Some("Paris"));
        assert_eq!(result.client.unwrap().isp.as_deref(), Some("Example ISP"));
    }

    #[tokio::test]
    async fn test_run_reports_tool_failure() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(
            &dir,
            "speedtest-fail",
            "echo 'Cannot retrieve speedtest configuration' >&2\nexit 1\n",
        );

        let runner = runner_for(stub.to_str().unwrap(), 30);
        let err = runner.run().await.unwrap_err();

        match err {
            MeasurementError::Tool { stderr } => {
                assert!(stderr.contains("Cannot retrieve"));
            }
            other => panic!("expected Tool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_reports_parse_failure() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(&dir, "speedtest-garbage", "echo 'not json at all'\n");

        let runner = runner_for(stub.to_str().unwrap(), 30);
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, MeasurementError::Parse(_)));
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(&dir, "speedtest-slow", "sleep 30\n");

        let runner = runner_for(stub.to_str().unwrap(), 1);
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, MeasurementError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_run_missing_tool() {
        let runner = runner_for("/nonexistent/speedtest-cli", 30);
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, MeasurementError::Unknown(_)));
    }

    #[tokio::test]
    async fn test_check_tool_succeeds() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(&dir, "speedtest-version", "echo 'speedtest-cli 2.1.3'\n");

        let runner = runner_for(stub.to_str().unwrap(), 30);
        assert!(runner.check_tool().await.is_ok());
    }

    #[tokio::test]
    async fn test_check_tool_missing() {
        let runner = runner_for("/nonexistent/speedtest-cli", 30);
        let err = runner.check_tool().await.unwrap_err();
        assert!(matches!(err, AppError::Startup(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
