//! Cycle collector
//!
//! One cycle performs, strictly in order: the external page GET, the radio
//! status GET, the statistics GET and the echo sequence. The first failure
//! aborts the cycle; no partial record is produced.

use crate::config::Config;
use crate::error::ProbeError;
use crate::probe::{HttpFetcher, Pinger, ACCEPT_HTML, ACCEPT_JSON};
use crate::record::{PageReadings, SampleRecord};
use crate::router::{RadioStatus, StatisticsStatus};
use crate::util::time;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

/// URLs requested each cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub target_url: String,
    pub radio_status_url: String,
    pub statistics_url: String,
}

impl Endpoints {
    /// Derive the cycle's URLs from configuration
    pub fn from_config(config: &Config) -> Self {
        let router = &config.router;
        Self {
            target_url: config.target.url.clone(),
            radio_status_url: router_url(&router.host, &router.radio_status_path),
            statistics_url: router_url(&router.host, &router.statistics_path),
        }
    }
}

fn router_url(host: &str, path: &str) -> String {
    let host = host.trim_end_matches('/');
    if path.starts_with('/') {
        format!("http://{}{}", host, path)
    } else {
        format!("http://{}/{}", host, path)
    }
}

/// Echo parameters for the cycle's ping step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingTarget {
    pub addr: IpAddr,
    pub timeout: Duration,
    pub count: u32,
}

/// Collects one [`SampleRecord`] per call
pub struct CycleCollector<F, P> {
    fetcher: F,
    pinger: P,
    endpoints: Endpoints,
    ping: PingTarget,
}

impl<F: HttpFetcher, P: Pinger> CycleCollector<F, P> {
    pub fn new(fetcher: F, pinger: P, endpoints: Endpoints, ping: PingTarget) -> Self {
        Self {
            fetcher,
            pinger,
            endpoints,
            ping,
        }
    }

    /// Run one cycle's four probes and flatten the results
    pub fn collect(&self) -> Result<SampleRecord, ProbeError> {
        let endpoints = &self.endpoints;

        let page = self.fetcher.get(&endpoints.target_url, ACCEPT_HTML)?;
        debug!(status = page.status, bytes = page.body_len(), "target page fetched");

        let radio_response = self.fetcher.get(&endpoints.radio_status_url, ACCEPT_JSON)?;
        let radio = RadioStatus::parse(&endpoints.radio_status_url, &radio_response.body)?;

        let statistics_response = self.fetcher.get(&endpoints.statistics_url, ACCEPT_JSON)?;
        let statistics = StatisticsStatus::parse(&endpoints.statistics_url, &statistics_response.body)?;

        let summary = self
            .pinger
            .ping(self.ping.addr, self.ping.timeout, self.ping.count)?;
        debug!(
            addr = %self.ping.addr,
            sent = summary.sent,
            timed_out = summary.timed_out,
            avg_ms = summary.avg_rtt_ms(),
            "echo sequence complete"
        );

        Ok(SampleRecord {
            timestamp: time::now(),
            ping_ms: summary.avg_rtt_ms(),
            page: PageReadings {
                elapsed: page.elapsed,
                status: page.status,
                size: page.body_len(),
            },
            radio: radio.readings()?,
            wan: statistics.readings()?,
        })
    }
}
