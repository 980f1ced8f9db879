//! Prometheus text exposition (format version 0.0.4)
//!
//! Renders the registry into the plain-text format scraped from `/metrics`.
//! Each render is a fresh snapshot; successive renders with no writes in
//! between produce byte-identical output.

use crate::metrics::registry::{CounterId, GaugeId, InfoId, InfoLabels, MetricsRegistry};
use std::fmt::Write;

struct GaugeDesc {
    id: GaugeId,
    name: &'static str,
    help: &'static str,
}

struct CounterDesc {
    id: CounterId,
    name: &'static str,
    help: &'static str,
}

struct InfoDesc {
    id: InfoId,
    name: &'static str,
    help: &'static str,
}

const GAUGES: &[GaugeDesc] = &[
    GaugeDesc {
        id: GaugeId::DownloadMbps,
        name: "speedtest_download_speed_mbps",
        help: "Download speed from the last successful test in megabits per second",
    },
    GaugeDesc {
        id: GaugeId::UploadMbps,
        name: "speedtest_upload_speed_mbps",
        help: "Upload speed from the last successful test in megabits per second",
    },
    GaugeDesc {
        id: GaugeId::PingMs,
        name: "speedtest_ping_ms",
        help: "Latency to the test server from the last successful test in milliseconds",
    },
    GaugeDesc {
        id: GaugeId::JitterMs,
        name: "speedtest_jitter_ms",
        help: "Latency jitter from the last successful test in milliseconds",
    },
    GaugeDesc {
        id: GaugeId::PacketLossPct,
        name: "speedtest_packet_loss_percent",
        help: "Packet loss from the last successful test as a percentage",
    },
];

const COUNTERS: &[CounterDesc] = &[
    CounterDesc {
        id: CounterId::TestsAttempted,
        name: "speedtest_tests_total",
        help: "Total number of speed tests attempted since startup",
    },
    CounterDesc {
        id: CounterId::TestsFailed,
        name: "speedtest_tests_failed",
        help: "Total number of speed tests that failed since startup",
    },
];

const INFOS: &[InfoDesc] = &[
    InfoDesc {
        id: InfoId::Server,
        name: "speedtest_server_info",
        help: "Details of the server used by the last successful test",
    },
    InfoDesc {
        id: InfoId::Isp,
        name: "speedtest_isp_info",
        help: "Details of the client connection used by the last successful test",
    },
];

/// Render the full registry as a Prometheus text exposition payload
pub fn render(registry: &MetricsRegistry) -> String {
    let mut out = String::with_capacity(1024);

    for desc in GAUGES {
        write_header(&mut out, desc.name, desc.help, "gauge");
        let _ = writeln!(out, "{} {}", desc.name, format_value(registry.gauge(desc.id)));
    }

    for desc in COUNTERS {
        write_header(&mut out, desc.name, desc.help, "counter");
        let _ = writeln!(out, "{} {}", desc.name, registry.counter(desc.id));
    }

    for desc in INFOS {
        // Info records are omitted entirely until a test has populated them
        if let Some(labels) = registry.info(desc.id) {
            write_header(&mut out, desc.name, desc.help, "gauge");
            let _ = writeln!(out, "{}{{{}}} 1", desc.name, format_labels(&labels));
        }
    }

    out
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
}

fn format_value(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn format_labels(labels: &InfoLabels) -> String {
    labels
        .iter()
        .map(|(key, value)| format!("{key}=\"{}\"", escape_label_value(value)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape a label value per the exposition format: backslash, double
/// quote, and line feed are the only characters that need escaping.
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
