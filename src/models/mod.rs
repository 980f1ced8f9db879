//! Data models for the speedtest exporter

pub mod config;
pub mod measurement;

pub use config::Config;
pub use measurement::{ClientInfo, MeasurementResult, ServerInfo};
