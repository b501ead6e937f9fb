//! Interface statistics document (`statistics_status_web_app.cgi`)

use super::{decode, first, present, require};
use crate::error::ProbeError;
use serde::Deserialize;
use serde_json::Value;

const DOCUMENT: &str = "statistics status";

/// Statistics response, reduced to the WAN service counters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatisticsStatus {
    #[serde(default, rename = "WAN")]
    pub wan: Option<Vec<WanEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WanEntry {
    #[serde(default, rename = "Service")]
    pub service: Option<Vec<WanService>>,
}

/// Ethernet counters of one WAN service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WanService {
    #[serde(default, rename = "EthernetBytesSent", deserialize_with = "present")]
    pub bytes_sent: Option<Value>,
    #[serde(default, rename = "EthernetBytesReceived", deserialize_with = "present")]
    pub bytes_received: Option<Value>,
    #[serde(default, rename = "EthernetPacketsSent", deserialize_with = "present")]
    pub packets_sent: Option<Value>,
    #[serde(default, rename = "EthernetPacketsReceived", deserialize_with = "present")]
    pub packets_received: Option<Value>,
    #[serde(default, rename = "EthernetErrorsSent", deserialize_with = "present")]
    pub errors_sent: Option<Value>,
    #[serde(default, rename = "EthernetErrorsReceived", deserialize_with = "present")]
    pub errors_received: Option<Value>,
    #[serde(default, rename = "EthernetDiscardPacketsSent", deserialize_with = "present")]
    pub discard_packets_sent: Option<Value>,
    #[serde(default, rename = "EthernetDiscardPacketsReceived", deserialize_with = "present")]
    pub discard_packets_received: Option<Value>,
}

/// Required counters of the first WAN service
#[derive(Debug, Clone, PartialEq)]
pub struct WanReadings {
    pub bytes_sent: Value,
    pub bytes_received: Value,
    pub packets_sent: Value,
    pub packets_received: Value,
    pub errors_sent: Value,
    pub errors_received: Value,
    pub discard_packets_sent: Value,
    pub discard_packets_received: Value,
}

impl StatisticsStatus {
    /// Decode a statistics response body
    pub fn parse(url: &str, body: &[u8]) -> Result<Self, ProbeError> {
        decode(url, body)
    }

    /// Extract the counters of `WAN[0].Service[0]`
    pub fn readings(&self) -> Result<WanReadings, ProbeError> {
        let wan = first(&self.wan, DOCUMENT, "WAN")?;
        let service = first(&wan.service, DOCUMENT, "WAN[0].Service")?;

        let field = |value: &Option<Value>, key: &str| {
            require(value, DOCUMENT, &format!("WAN[0].Service[0].{}", key))
        };

        Ok(WanReadings {
            bytes_sent: field(&service.bytes_sent, "EthernetBytesSent")?,
            bytes_received: field(&service.bytes_received, "EthernetBytesReceived")?,
            packets_sent: field(&service.packets_sent, "EthernetPacketsSent")?,
            packets_received: field(&service.packets_received, "EthernetPacketsReceived")?,
            errors_sent: field(&service.errors_sent, "EthernetErrorsSent")?,
            errors_received: field(&service.errors_received, "EthernetErrorsReceived")?,
            discard_packets_sent: field(&service.discard_packets_sent, "EthernetDiscardPacketsSent")?,
            discard_packets_received: field(
                &service.discard_packets_received,
                "EthernetDiscardPacketsReceived",
            )?,
        })
    }
}
