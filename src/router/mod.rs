//! Router diagnostic documents
//!
//! The gateway exposes two CGI endpoints returning JSON: radio status
//! (cellular counters plus 5G/LTE signal quality) and interface statistics
//! (WAN Ethernet counters). Both are modelled as serde structures whose
//! fields are all optional; extraction into readings then requires each
//! field and reports the JSON path of the first one that is absent.
//!
//! Leaf values are kept as raw JSON scalars since the router mixes numbers
//! and strings between firmware versions and the log records them verbatim.

pub mod radio;
pub mod statistics;

pub use radio::{CellReadings, CellTechnology, RadioReadings, RadioStatus};
pub use statistics::{StatisticsStatus, WanReadings};

use crate::error::ProbeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Radio status endpoint path on the router
pub const RADIO_STATUS_PATH: &str = "/fastmile_radio_status_web_app.cgi";

/// Interface statistics endpoint path on the router
pub const STATISTICS_PATH: &str = "/statistics_status_web_app.cgi";

/// Keep JSON `null` distinguishable from an absent key
///
/// With `#[serde(default)]` an absent key stays `None`, while a present key
/// (including `null`) becomes `Some`.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Decode a router document
pub(crate) fn decode<T>(url: &str, body: &[u8]) -> Result<T, ProbeError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_slice(body).map_err(|source| ProbeError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Require a scalar field
pub(crate) fn require(
    field: &Option<Value>,
    document: &'static str,
    path: &str,
) -> Result<Value, ProbeError> {
    field.clone().ok_or_else(|| ProbeError::MissingField {
        document,
        path: path.to_string(),
    })
}

/// Require the first element of an array field
pub(crate) fn first<'a, T>(
    items: &'a Option<Vec<T>>,
    document: &'static str,
    path: &str,
) -> Result<&'a T, ProbeError> {
    items
        .as_ref()
        .and_then(|items| items.first())
        .ok_or_else(|| ProbeError::MissingField {
            document,
            path: format!("{}[0]", path),
        })
}

/// Require a nested object field
pub(crate) fn object<'a, T>(
    item: &'a Option<T>,
    document: &'static str,
    path: &str,
) -> Result<&'a T, ProbeError> {
    item.as_ref().ok_or_else(|| ProbeError::MissingField {
        document,
        path: path.to_string(),
    })
}

/// Render a JSON scalar as log text
///
/// Numbers keep their JSON spelling, strings lose their quotes, `null`
/// becomes an empty field. Arrays and objects are written as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
