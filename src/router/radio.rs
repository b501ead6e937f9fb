//! Radio status document (`fastmile_radio_status_web_app.cgi`)

use super::{decode, first, object, present, require};
use crate::error::ProbeError;
use serde::Deserialize;
use serde_json::Value;

const DOCUMENT: &str = "radio status";

/// Radio status response, reduced to the parts the probe records
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RadioStatus {
    #[serde(default)]
    pub cellular_stats: Option<Vec<CellularStats>>,
    #[serde(default, rename = "cell_5G_stats_cfg")]
    pub cell_5g_stats_cfg: Option<Vec<CellStatsCfg>>,
    #[serde(default, rename = "cell_LTE_stats_cfg")]
    pub cell_lte_stats_cfg: Option<Vec<CellStatsCfg>>,
}

/// Cellular byte counters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellularStats {
    #[serde(default, rename = "BytesReceived", deserialize_with = "present")]
    pub bytes_received: Option<Value>,
    #[serde(default, rename = "BytesSent", deserialize_with = "present")]
    pub bytes_sent: Option<Value>,
}

/// Per-technology cell entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellStatsCfg {
    #[serde(default)]
    pub stat: Option<CellStat>,
}

/// Signal-quality figures for the serving cell
///
/// 5G entries carry `Downlink_NR_ARFCN`, LTE entries `DownlinkEarfcn`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellStat {
    #[serde(default, rename = "PhysicalCellID", deserialize_with = "present")]
    pub physical_cell_id: Option<Value>,
    #[serde(default, rename = "SNRCurrent", deserialize_with = "present")]
    pub snr_current: Option<Value>,
    #[serde(default, rename = "RSRPCurrent", deserialize_with = "present")]
    pub rsrp_current: Option<Value>,
    #[serde(default, rename = "RSRQCurrent", deserialize_with = "present")]
    pub rsrq_current: Option<Value>,
    #[serde(default, rename = "RSRPStrengthIndexCurrent", deserialize_with = "present")]
    pub rsrp_strength_index_current: Option<Value>,
    #[serde(default, rename = "Downlink_NR_ARFCN", deserialize_with = "present")]
    pub downlink_nr_arfcn: Option<Value>,
    #[serde(default, rename = "DownlinkEarfcn", deserialize_with = "present")]
    pub downlink_earfcn: Option<Value>,
    #[serde(default, rename = "Band", deserialize_with = "present")]
    pub band: Option<Value>,
}

/// Radio access technology of a cell entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTechnology {
    Nr5g,
    Lte,
}

impl CellTechnology {
    /// JSON array holding this technology's entries
    fn array_key(self) -> &'static str {
        match self {
            CellTechnology::Nr5g => "cell_5G_stats_cfg",
            CellTechnology::Lte => "cell_LTE_stats_cfg",
        }
    }

    /// Key of the downlink channel number inside `stat`
    fn channel_key(self) -> &'static str {
        match self {
            CellTechnology::Nr5g => "Downlink_NR_ARFCN",
            CellTechnology::Lte => "DownlinkEarfcn",
        }
    }
}

/// Required values for one technology's serving cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellReadings {
    pub physical_cell_id: Value,
    pub snr: Value,
    pub rsrp: Value,
    pub rsrq: Value,
    pub rsrp_strength_index: Value,
    /// ARFCN (5G) or EARFCN (LTE)
    pub downlink_channel: Value,
    pub band: Value,
}

/// Required values from the radio status document
#[derive(Debug, Clone, PartialEq)]
pub struct RadioReadings {
    pub bytes_received: Value,
    pub bytes_sent: Value,
    pub nr5g: CellReadings,
    pub lte: CellReadings,
}

impl RadioStatus {
    /// Decode a radio status response body
    pub fn parse(url: &str, body: &[u8]) -> Result<Self, ProbeError> {
        decode(url, body)
    }

    /// Extract every recorded value, failing on the first absent one
    pub fn readings(&self) -> Result<RadioReadings, ProbeError> {
        let cellular = first(&self.cellular_stats, DOCUMENT, "cellular_stats")?;

        Ok(RadioReadings {
            bytes_received: require(
                &cellular.bytes_received,
                DOCUMENT,
                "cellular_stats[0].BytesReceived",
            )?,
            bytes_sent: require(&cellular.bytes_sent, DOCUMENT, "cellular_stats[0].BytesSent")?,
            nr5g: self.cell(CellTechnology::Nr5g)?,
            lte: self.cell(CellTechnology::Lte)?,
        })
    }

    fn cell(&self, technology: CellTechnology) -> Result<CellReadings, ProbeError> {
        let entries = match technology {
            CellTechnology::Nr5g => &self.cell_5g_stats_cfg,
            CellTechnology::Lte => &self.cell_lte_stats_cfg,
        };
        let array = technology.array_key();
        let entry = first(entries, DOCUMENT, array)?;
        let stat_path = format!("{}[0].stat", array);
        let stat = object(&entry.stat, DOCUMENT, &stat_path)?;

        let field = |value: &Option<Value>, key: &str| {
            require(value, DOCUMENT, &format!("{}.{}", stat_path, key))
        };

        let channel = match technology {
            CellTechnology::Nr5g => &stat.downlink_nr_arfcn,
            CellTechnology::Lte => &stat.downlink_earfcn,
        };

        Ok(CellReadings {
            physical_cell_id: field(&stat.physical_cell_id, "PhysicalCellID")?,
            snr: field(&stat.snr_current, "SNRCurrent")?,
            rsrp: field(&stat.rsrp_current, "RSRPCurrent")?,
            rsrq: field(&stat.rsrq_current, "RSRQCurrent")?,
            rsrp_strength_index: field(&stat.rsrp_strength_index_current, "RSRPStrengthIndexCurrent")?,
            downlink_channel: field(channel, technology.channel_key())?,
            band: field(&stat.band, "Band")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    const URL: &str = "http://192.168.12.1/fastmile_radio_status_web_app.cgi";

    fn sample() -> Value {
        json!({
            "cellular_stats": [{"BytesReceived": 123456789, "BytesSent": 98765432}],
            "cell_5G_stats_cfg": [{"stat": {
                "PhysicalCellID": 371, "SNRCurrent": 12, "RSRPCurrent": -89,
                "RSRQCurrent": -11, "RSRPStrengthIndexCurrent": 4,
                "Downlink_NR_ARFCN": 520110, "Band": "n41"
            }}],
            "cell_LTE_stats_cfg": [{"stat": {
                "PhysicalCellID": 105, "SNRCurrent": 7, "RSRPCurrent": -101,
                "RSRQCurrent": -14, "RSRPStrengthIndexCurrent": 3,
                "DownlinkEarfcn": 66786, "Band": "B66"
            }}],
            "apn_cfg": [{"APN": "fbb.home"}]
        })
    }

    fn parse(value: &Value) -> Result<RadioStatus, ProbeError> {
        RadioStatus::parse(URL, value.to_string().as_bytes())
    }

    #[test]
    fn test_readings_from_full_document() {
        let readings = parse(&sample()).unwrap().readings().unwrap();
        assert_eq!(readings.bytes_received, json!(123456789));
        assert_eq!(readings.bytes_sent, json!(98765432));
        assert_eq!(readings.nr5g.downlink_channel, json!(520110));
        assert_eq!(readings.nr5g.band, json!("n41"));
        assert_eq!(readings.lte.downlink_channel, json!(66786));
        assert_eq!(readings.lte.rsrp, json!(-101));
    }

    #[test]
    fn test_missing_key_names_path() {
        let mut doc = sample();
        doc["cell_LTE_stats_cfg"][0]["stat"]
            .as_object_mut()
            .unwrap()
            .remove("DownlinkEarfcn");

        let err = parse(&doc).unwrap().readings().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(err.to_string().contains("cell_LTE_stats_cfg[0].stat.DownlinkEarfcn"));
    }

    #[test]
    fn test_empty_array_is_missing() {
        let mut doc = sample();
        doc["cell_5G_stats_cfg"] = json!([]);

        let err = parse(&doc).unwrap().readings().unwrap_err();
        assert!(err.to_string().contains("cell_5G_stats_cfg[0]"));
    }

    #[test]
    fn test_null_is_present() {
        let mut doc = sample();
        doc["cell_5G_stats_cfg"][0]["stat"]["Band"] = Value::Null;

        let readings = parse(&doc).unwrap().readings().unwrap();
        assert_eq!(readings.nr5g.band, Value::Null);
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = RadioStatus::parse(URL, b"<html>login</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
