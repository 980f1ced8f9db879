//! Console output formatting
//!
//! Human-readable summaries printed after each measurement cycle, separate
//! from the log stream. Color usage follows the resolved configuration.

use crate::error::MeasurementError;
use crate::models::MeasurementResult;
use colored::Colorize;

/// Formats per-cycle summaries for the console
pub struct SummaryFormatter {
    enable_color: bool,
}

impl SummaryFormatter {
    pub fn new(enable_color: bool) -> Self {
        Self { enable_color }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if !self.enable_color {
            return text.to_string();
        }
        match color {
            "green" => text.green().bold().to_string(),
            "red" => text.red().bold().to_string(),
            "cyan" => text.cyan().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }

    /// Render the boxed summary for a successful measurement
    pub fn format_success(&self, result: &MeasurementResult) -> String {
        let mut lines = Vec::new();
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        lines.push("=".repeat(48));
        lines.push(format!(
            "  {} ({timestamp})",
            self.paint("Speed Test Results", "green")
        ));
        lines.push("=".repeat(48));
        lines.push(format!(
            "  Download:    {}",
            self.paint(&format!("{:.2} Mbps", result.download_mbps()), "cyan")
        ));
        lines.push(format!(
            "  Upload:      {}",
            self.paint(&format!("{:.2} Mbps", result.upload_mbps()), "cyan")
        ));
        lines.push(format!(
            "  Ping:        {}",
            self.paint(&format!("{:.2} ms", result.ping), "cyan")
        ));

        if let Some(jitter) = result.jitter {
            lines.push(format!(
                "  Jitter:      {}",
                self.paint(&format!("{jitter:.2} ms"), "cyan")
            ));
        }
        if let Some(packet_loss) = result.packet_loss {
            lines.push(format!(
                "  Packet loss: {}",
                self.paint(&format!("{packet_loss:.2} %"), "cyan")
            ));
        }

        if let Some(server) = &result.server {
            let mut parts = Vec::new();
            if let Some(name) = &server.name {
                parts.push(name.clone());
            }
            if let Some(sponsor) = &server.sponsor {
                parts.push(format!("({sponsor})"));
            }
            if !parts.is_empty() {
                lines.push(format!("  Server:      {}", parts.join(" ")));
            }
            if let Some(country) = &server.country {
                lines.push(format!("  Location:    {country}"));
            }
        }

        if let Some(client) = &result.client {
            if let Some(isp) = &client.isp {
                lines.push(format!("  ISP:         {isp}"));
            }
            if let Some(ip) = &client.ip {
                lines.push(format!("  IP:          {ip}"));
            }
        }

        lines.push("=".repeat(48));
        lines.join("\n")
    }

    /// Render the summary for a failed measurement
    pub fn format_failure(&self, error: &MeasurementError) -> String {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut lines = Vec::new();

        lines.push("=".repeat(48));
        lines.push(format!(
            "  {} ({timestamp})",
            self.paint("Speed Test Failed", "red")
        ));
        lines.push("=".repeat(48));
        lines.push(format!("  Reason:      {error}"));
        lines.push(format!("  Kind:        {}", error.kind()));
        lines.push("=".repeat(48));
        lines.join("\n")
    }
}
