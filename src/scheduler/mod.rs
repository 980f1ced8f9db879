//! Measurement scheduling
//!
//! Drives the measure/update/report cycle, either once (`--single`) or in a
//! loop on the configured interval. A failed measurement is a normal cycle
//! outcome: it bumps the failure counter and the loop keeps its cadence.
//! Only unexpected cycle errors trigger the shortened retry delay.

use crate::error::Result;
use crate::logging::Logger;
use crate::metrics::MetricsRegistry;
use crate::output::SummaryFormatter;
use crate::runner::MeasurementRunner;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub struct Scheduler {
    runner: MeasurementRunner,
    registry: Arc<MetricsRegistry>,
    formatter: SummaryFormatter,
    logger: Arc<Logger>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(
        runner: MeasurementRunner,
        registry: Arc<MetricsRegistry>,
        formatter: SummaryFormatter,
        logger: Arc<Logger>,
        interval: Duration,
    ) -> Self {
        Self {
            runner,
            registry,
            formatter,
            logger,
            interval,
        }
    }

    /// Run one full cycle: measure, update the registry, print a summary.
    ///
    /// Measurement failures are absorbed here; an `Err` from this method
    /// means something outside the measurement path broke.
    pub async fn run_cycle(&self) -> Result<()> {
        match self.runner.run().await {
            Ok(result) => {
                self.registry.update_from_measurement(&result);
                self.logger.info(&format!(
                    "Metrics updated - download: {:.2} Mbps, upload: {:.2} Mbps, ping: {:.2} ms",
                    result.download_mbps(),
                    result.upload_mbps(),
                    result.ping
                ));
                self.print(&self.formatter.format_success(&result))?;
            }
            Err(error) => {
                self.registry.record_failure();
                self.logger
                    .warn(&format!("Measurement failed ({}): {error}", error.kind()));
                self.print(&self.formatter.format_failure(&error))?;
            }
        }
        Ok(())
    }

    fn print(&self, summary: &str) -> Result<()> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{summary}")?;
        Ok(())
    }

    /// Single-shot mode: one cycle, then return
    pub async fn run_single(&self) -> Result<()> {
        self.run_cycle().await
    }

    /// Continuous mode: cycle forever until the shutdown signal fires
    pub async fn run_continuous(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        loop {
            let delay = match self.run_cycle().await {
                Ok(()) => {
                    self.logger.info(&format!(
                        "Waiting {} seconds until next test",
                        self.interval.as_secs()
                    ));
                    self.interval
                }
                Err(error) => {
                    self.logger.error(&format!(
                        "Cycle error ({}): {error}; retrying in {} seconds",
                        error.category(),
                        crate::defaults::ERROR_RETRY_DELAY.as_secs()
                    ));
                    crate::defaults::ERROR_RETRY_DELAY
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => {
                    self.logger.info("Shutdown requested, stopping scheduler");
                    return Ok(());
                }
            }
        }
    }
}
