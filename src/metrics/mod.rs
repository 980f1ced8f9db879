//! Process-wide metrics registry and Prometheus text exposition

pub mod exposition;
pub mod registry;

pub use exposition::render;
pub use registry::{CounterId, GaugeId, InfoId, MetricsRegistry};
