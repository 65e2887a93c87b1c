//! Entities of the telemetry platform's project/device/message hierarchy.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A top-level project grouping on the telemetry platform.
///
/// Devices are nested under exactly one project; the aggregator only needs
/// the id to fan out the per-project device request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Platform identifier, used in the device-list URL path.
    #[serde(rename = "projectId", deserialize_with = "lenient_id")]
    pub project_id: String,
    /// Upstream fields the aggregator does not model, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A leaf sensor device.
///
/// `lrr_ids` and `created_at` are absent as returned by the platform; the
/// aggregation engine attaches them from the device's latest uplink. The
/// enrichment transform deposits further derived fields into `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// LoRaWAN device EUI, used in the message URL path.
    #[serde(rename = "devEUI")]
    pub dev_eui: String,
    /// Identifiers of the gateways that received the latest uplink.
    #[serde(rename = "lrrIds", default, skip_serializing_if = "Option::is_none")]
    pub lrr_ids: Option<Vec<String>>,
    /// Timestamp of the latest uplink message.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Upstream fields the aggregator does not model, plus any fields the
    /// enrichment transform attaches.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    /// Attach the gateway list and timestamp from this device's latest uplink.
    pub fn attach_latest(&mut self, message: &Message) {
        if let Some(lrrs) = &message.lrrs {
            self.lrr_ids = Some(lrrs.iter().map(|lrr| lrr.lrr_id.clone()).collect());
        }
        self.created_at = message.created_at.clone();
    }
}

/// An uplink telemetry message. Only the single latest message per device is
/// ever requested (limit = 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Gateways that received this uplink, if reported.
    #[serde(default)]
    pub lrrs: Option<Vec<GatewayReception>>,
    /// When the platform recorded the uplink.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One gateway's reception record inside an uplink message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayReception {
    /// Gateway identifier.
    #[serde(rename = "Lrrid")]
    pub lrr_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The assembled aggregation result: every project plus the flattened device
/// list across all projects (one entry per device, not per project).
///
/// The serialized form of this type is also the cache file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub sensors: Vec<Device>,
}

/// Accept either a JSON string or a number for an upstream id field.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    use serde::de::Error as _;
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
