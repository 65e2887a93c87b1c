//! The `_meta` / `records` envelope every platform endpoint returns.

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Response wrapper shared by the project, device, and message endpoints.
///
/// A payload whose `_meta.status` is `"ERROR"` is rejected and yields no
/// records; callers treat that the same as an absent or empty record list.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Envelope<T> {
    #[serde(rename = "_meta")]
    pub meta: Meta,
    #[serde(default)]
    pub records: Option<Vec<T>>,
}

/// Request metadata attached to every platform response.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub status: String,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse a raw response body.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

impl<T> Envelope<T> {
    /// Whether the platform rejected the request in-band.
    pub fn is_rejected(&self) -> bool {
        self.meta.status == "ERROR"
    }

    /// The record list, or `None` for a rejected payload or one with no
    /// `records` field.
    pub fn into_records(self) -> Option<Vec<T>> {
        if self.is_rejected() { None } else { self.records }
    }
}
