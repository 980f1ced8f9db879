//! Process-wide metrics registry
//!
//! One registry is built at startup and shared by `Arc` between the scheduler
//! (sole writer) and the metrics HTTP server (concurrent reader). Gauges carry
//! `f64` bit patterns in `AtomicU64`s, so every individual read and write is a
//! single atomic operation and a reader can never observe a torn value.
//! Cross-field atomicity is deliberately not provided.

use crate::models::MeasurementResult;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Gauge instruments: numeric last-values, no history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeId {
    DownloadMbps,
    UploadMbps,
    PingMs,
    JitterMs,
    PacketLossPct,
}

/// Counter instruments: monotonically non-decreasing totals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterId {
    TestsAttempted,
    TestsFailed,
}

/// Info instruments: string label sets with no meaningful numeric value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoId {
    Server,
    Isp,
}

/// Label map for an info record
pub type InfoLabels = BTreeMap<String, String>;

/// The registry itself; lives for the whole process
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    download_mbps: AtomicU64,
    upload_mbps: AtomicU64,
    ping_ms: AtomicU64,
    jitter_ms: AtomicU64,
    packet_loss_pct: AtomicU64,
    tests_attempted: AtomicU64,
    tests_failed: AtomicU64,
    server_info: RwLock<Option<InfoLabels>>,
    isp_info: RwLock<Option<InfoLabels>>,
}

impl MetricsRegistry {
    /// Create a registry with all gauges at 0 and no info records set
    pub fn new() -> Self {
        Self::default()
    }

    fn gauge_slot(&self, id: GaugeId) -> &AtomicU64 {
        match id {
            GaugeId::DownloadMbps => &self.download_mbps,
            GaugeId::UploadMbps => &self.upload_mbps,
            GaugeId::PingMs => &self.ping_ms,
            GaugeId::JitterMs => &self.jitter_ms,
            GaugeId::PacketLossPct => &self.packet_loss_pct,
        }
    }

    fn counter_slot(&self, id: CounterId) -> &AtomicU64 {
        match id {
            CounterId::TestsAttempted => &self.tests_attempted,
            CounterId::TestsFailed => &self.tests_failed,
        }
    }

    fn info_slot(&self, id: InfoId) -> &RwLock<Option<InfoLabels>> {
        match id {
            InfoId::Server => &self.server_info,
            InfoId::Isp => &self.isp_info,
        }
    }

    /// Overwrite a gauge's last-value
    pub fn set_gauge(&self, id: GaugeId, value: f64) {
        self.gauge_slot(id).store(value.to_bits(), Ordering::Relaxed);
    }

    /// Read a gauge's current value
    pub fn gauge(&self, id: GaugeId) -> f64 {
        f64::from_bits(self.gauge_slot(id).load(Ordering::Relaxed))
    }

    /// Atomically add 1 to a counter
    pub fn increment_counter(&self, id: CounterId) {
        self.counter_slot(id).fetch_add(1, Ordering::Relaxed);
    }

    /// Read a counter's current value
    pub fn counter(&self, id: CounterId) -> u64 {
        self.counter_slot(id).load(Ordering::Relaxed)
    }

    /// Replace an info record's entire label set (never a merge)
    pub fn set_info(&self, id: InfoId, labels: InfoLabels) {
        let mut slot = lock_write(self.info_slot(id));
        *slot = Some(labels);
    }

    /// Snapshot an info record's current label set
    pub fn info(&self, id: InfoId) -> Option<InfoLabels> {
        lock_read(self.info_slot(id)).clone()
    }

    /// Fold a successful measurement into the registry.
    ///
    /// Gauges take the converted values (Mbps for throughput), optional
    /// fields are skipped when the tool did not report them, info records
    /// are replaced when present, and the attempted counter is bumped last.
    pub fn update_from_measurement(&self, result: &MeasurementResult) {
        self.set_gauge(GaugeId::DownloadMbps, result.download_mbps());
        self.set_gauge(GaugeId::UploadMbps, result.upload_mbps());
        self.set_gauge(GaugeId::PingMs, result.ping);

        if let Some(jitter) = result.jitter {
            self.set_gauge(GaugeId::JitterMs, jitter);
        }
        if let Some(packet_loss) = result.packet_loss {
            self.set_gauge(GaugeId::PacketLossPct, packet_loss);
        }

        if let Some(server) = &result.server {
            let labels: InfoLabels = server
                .labels()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            if !labels.is_empty() {
                self.set_info(InfoId::Server, labels);
            }
        }

        if let Some(client) = &result.client {
            let labels: InfoLabels = client
                .labels()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            if !labels.is_empty() {
                self.set_info(InfoId::Isp, labels);
            }
        }

        self.increment_counter(CounterId::TestsAttempted);
    }

    /// Record a failed measurement attempt.
    ///
    /// The failure path counts toward both totals so that after N attempts
    /// the attempted counter reads exactly N and failed <= N.
    pub fn record_failure(&self) {
        self.increment_counter(CounterId::TestsAttempted);
        self.increment_counter(CounterId::TestsFailed);
    }
}

// A poisoned lock only means a writer panicked mid-replace of an Option;
// the map inside is still a complete value, so recover rather than unwind.
fn lock_read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn lock_write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
