//! Measurement result data model
//!
//! Mirrors the JSON document emitted by `speedtest-cli --json`. Throughput is
//! kept in bits per second internally; conversion to Mbps happens only at the
//! point of metric update or display.

use serde::{Deserialize, Deserializer, Serialize};

const BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// A single successful measurement, immutable once parsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Download bandwidth in bits per second
    pub download: f64,

    /// Upload bandwidth in bits per second
    pub upload: f64,

    /// Round-trip latency in milliseconds
    pub ping: f64,

    /// Latency jitter in milliseconds, when the tool reports it
    #[serde(default)]
    pub jitter: Option<f64>,

    /// Packet loss percentage, when the tool reports it
    #[serde(default)]
    pub packet_loss: Option<f64>,

    /// Remote test server metadata
    #[serde(default)]
    pub server: Option<ServerInfo>,

    /// Local client / ISP metadata
    #[serde(default)]
    pub client: Option<ClientInfo>,
}

/// Metadata about the remote measurement server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sponsor: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    /// Server id; some tool versions emit it as a number, others as a string
    #[serde(default, deserialize_with = "de_id")]
    pub id: Option<String>,
}

/// Metadata about the local client and its ISP
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(default)]
    pub isp: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl MeasurementResult {
    /// Download bandwidth in megabits per second
    pub fn download_mbps(&self) -> f64 {
        self.download / BITS_PER_MEGABIT
    }

    /// Upload bandwidth in megabits per second
    pub fn upload_mbps(&self) -> f64 {
        self.upload / BITS_PER_MEGABIT
    }
}

impl ServerInfo {
    /// Label set for the server info record, keeping only fields the tool
    /// actually reported. Absent fields are omitted, never written as
    /// placeholder values.
    pub fn labels(&self) -> Vec<(&'static str, String)> {
        let mut labels = Vec::new();
        if let Some(name) = &self.name {
            labels.push(("name", name.clone()));
        }
        if let Some(sponsor) = &self.sponsor {
            labels.push(("sponsor", sponsor.clone()));
        }
        if let Some(country) = &self.country {
            labels.push(("country", country.clone()));
        }
        if let Some(host) = &self.host {
            labels.push(("host", host.clone()));
        }
        if let Some(id) = &self.id {
            labels.push(("id", id.clone()));
        }
        labels
    }
}

impl ClientInfo {
    /// Label set for the ISP info record, present fields only
    pub fn labels(&self) -> Vec<(&'static str, String)> {
        let mut labels = Vec::new();
        if let Some(isp) = &self.isp {
            labels.push(("isp", isp.clone()));
        }
        if let Some(ip) = &self.ip {
            labels.push(("ip", ip.clone()));
        }
        if let Some(country) = &self.country {
            labels.push(("country", country.clone()));
        }
        labels
    }
}

/// Accept a server id as either a JSON number or a string
fn de_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }))
}
