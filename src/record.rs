//! Sample record: the flattened per-cycle snapshot
//!
//! Header and data lines are positionally aligned, so [`COLUMNS`] and
//! [`SampleRecord::values`] must list fields in the same order.

use crate::router::{CellReadings, RadioReadings, WanReadings, render_value};
use crate::util::time::{format_decimal, format_row_timestamp};
use chrono::{DateTime, Local};
use std::time::Duration;

/// Column names, in emission order
pub const COLUMNS: [&str; 29] = [
    "datetime",
    "ping_time",
    "web_page_retrieval_seconds",
    "web_page_status",
    "web_page_size",
    "cellular_bytes_received",
    "cellular_bytes_sent",
    "cell_5g_stats_PhysicalCellID",
    "cell_5g_stats_SNRCurrent",
    "cell_5g_stats_RSRPCurrent",
    "cell_5g_stats_RSRQCurrent",
    "cell_5g_stats_RSRPStrengthIndexCurrent",
    "cell_5g_stats_Downlink_NR_ARFCN",
    "cell_5g_stats_Band",
    "cell_lte_stats_PhysicalCellID",
    "cell_lte_stats_SNRCurrent",
    "cell_lte_stats_RSRPCurrent",
    "cell_lte_stats_RSRQCurrent",
    "cell_lte_stats_RSRPStrengthIndexCurrent",
    "cell_lte_stats_DownlinkEarfcn",
    "cell_lte_stats_Band",
    "cellular_stats_bytes_sent",
    "cellular_stats_bytes_received",
    "cellular_stats_packets_sent",
    "cellular_stats_packets_received",
    "cellular_stats_errors_sent",
    "cellular_stats_errors_received",
    "cellular_stats_discard_packets_sent",
    "cellular_stats_discard_packets_received",
];

/// Number of fields in every row
pub const FIELD_COUNT: usize = COLUMNS.len();

/// External page retrieval figures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageReadings {
    /// Time until response headers arrived
    pub elapsed: Duration,
    pub status: u16,
    /// Body length in bytes
    pub size: usize,
}

/// One cycle's snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub timestamp: DateTime<Local>,
    /// Average echo round trip in milliseconds
    pub ping_ms: f64,
    pub page: PageReadings,
    pub radio: RadioReadings,
    pub wan: WanReadings,
}

impl SampleRecord {
    /// Field values rendered as log text, aligned with [`COLUMNS`]
    pub fn values(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(FIELD_COUNT);

        values.push(format_row_timestamp(&self.timestamp));
        values.push(format_decimal(self.ping_ms));
        values.push(format_decimal(self.page.elapsed.as_secs_f64()));
        values.push(self.page.status.to_string());
        values.push(self.page.size.to_string());

        values.push(render_value(&self.radio.bytes_received));
        values.push(render_value(&self.radio.bytes_sent));
        push_cell(&mut values, &self.radio.nr5g);
        push_cell(&mut values, &self.radio.lte);

        let wan = &self.wan;
        for value in [
            &wan.bytes_sent,
            &wan.bytes_received,
            &wan.packets_sent,
            &wan.packets_received,
            &wan.errors_sent,
            &wan.errors_received,
            &wan.discard_packets_sent,
            &wan.discard_packets_received,
        ] {
            values.push(render_value(value));
        }

        debug_assert_eq!(values.len(), FIELD_COUNT);
        values
    }

    /// Column name and value pairs, in emission order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        COLUMNS.iter().copied().zip(self.values()).collect()
    }

    /// Comma-joined data line, without trailing newline
    ///
    /// Values are not quoted or escaped.
    pub fn data_line(&self) -> String {
        self.values().join(",")
    }
}

fn push_cell(values: &mut Vec<String>, cell: &CellReadings) {
    for value in [
        &cell.physical_cell_id,
        &cell.snr,
        &cell.rsrp,
        &cell.rsrq,
        &cell.rsrp_strength_index,
        &cell.downlink_channel,
        &cell.band,
    ] {
        values.push(render_value(value));
    }
}

/// Comma-joined header line, without trailing newline
pub fn header_line() -> String {
    COLUMNS.join(",")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    pub(crate) fn sample_record() -> SampleRecord {
        let cell = |pci: i64, channel: i64, band: &str| CellReadings {
            physical_cell_id: json!(pci),
            snr: json!(12),
            rsrp: json!(-89),
            rsrq: json!(-11),
            rsrp_strength_index: json!(4),
            downlink_channel: json!(channel),
            band: json!(band),
        };

        SampleRecord {
            timestamp: Local.with_ymd_and_hms(2021, 6, 1, 14, 3, 27).unwrap(),
            ping_ms: 23.51,
            page: PageReadings {
                elapsed: Duration::from_millis(420),
                status: 200,
                size: 1234,
            },
            radio: RadioReadings {
                bytes_received: json!(123456789),
                bytes_sent: json!(98765432),
                nr5g: cell(371, 520110, "n41"),
                lte: cell(105, 66786, "B66"),
            },
            wan: WanReadings {
                bytes_sent: json!(1000),
                bytes_received: json!(2000),
                packets_sent: json!(30),
                packets_received: json!(40),
                errors_sent: json!(0),
                errors_received: json!(1),
                discard_packets_sent: json!(2),
                discard_packets_received: json!(3),
            },
        }
    }

    #[test]
    fn test_header_matches_columns() {
        let header = header_line();
        assert!(header.starts_with("datetime,ping_time,web_page_retrieval_seconds,"));
        assert!(header.ends_with(",cellular_stats_discard_packets_received"));
        assert_eq!(header.split(',').count(), FIELD_COUNT);
    }

    #[test]
    fn test_data_line_field_count() {
        let line = sample_record().data_line();
        assert_eq!(line.split(',').count(), header_line().split(',').count());
    }

    #[test]
    fn test_values_in_column_order() {
        let fields = sample_record().fields();
        let get = |name: &str| {
            fields
                .iter()
                .find(|(column, _)| *column == name)
                .map(|(_, value)| value.clone())
                .unwrap()
        };

        assert_eq!(get("datetime"), "2021-06-01 14:03:27.000000");
        assert_eq!(get("ping_time"), "23.51");
        assert_eq!(get("web_page_retrieval_seconds"), "0.42");
        assert_eq!(get("web_page_status"), "200");
        assert_eq!(get("web_page_size"), "1234");
        assert_eq!(get("cellular_bytes_received"), "123456789");
        assert_eq!(get("cell_5g_stats_Downlink_NR_ARFCN"), "520110");
        assert_eq!(get("cell_5g_stats_Band"), "n41");
        assert_eq!(get("cell_lte_stats_PhysicalCellID"), "105");
        assert_eq!(get("cell_lte_stats_DownlinkEarfcn"), "66786");
        assert_eq!(get("cellular_stats_bytes_sent"), "1000");
        assert_eq!(get("cellular_stats_discard_packets_received"), "3");
    }

    #[test]
    fn test_null_renders_empty_but_keeps_alignment() {
        let mut record = sample_record();
        record.radio.lte.band = serde_json::Value::Null;
        let line = record.data_line();
        assert_eq!(line.split(',').count(), FIELD_COUNT);
        assert!(line.contains(",66786,,1000,"));
    }
}
