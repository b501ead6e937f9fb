//! Blocking HTTP client for page retrieval and router diagnostics

use super::{error_chain, HttpFetcher, HttpResponse};
use crate::error::ProbeError;
use crate::util::time::Stopwatch;
use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONNECTION, USER_AGENT};
use std::time::Duration;
use tracing::debug;

/// HTTP fetcher built on a reused blocking `reqwest` client
pub struct ReqwestFetcher {
    client: Client,
    user_agent: String,
}

impl ReqwestFetcher {
    /// Build a fetcher identifying itself as `user_agent`
    ///
    /// `timeout` bounds each request end to end and `connect_timeout` the TCP
    /// handshake alone; `None` leaves either unbounded.
    pub fn new(
        user_agent: &str,
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
    ) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }
}

impl HttpFetcher for ReqwestFetcher {
    fn get(&self, url: &str, accept: &str) -> Result<HttpResponse, ProbeError> {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .header(CACHE_CONTROL, "no-cache")
            .header(CONNECTION, "close")
            .header(USER_AGENT, self.user_agent.as_str());

        let watch = Stopwatch::start();
        let response = request.send().map_err(|e| classify_error(url, e))?;
        let elapsed = watch.elapsed();

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| classify_error(url, e))?;

        debug!(url, status, bytes = body.len(), elapsed_ms = elapsed.as_millis() as u64, "GET complete");

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
            elapsed,
        })
    }
}

/// Map a client error onto the probe taxonomy
///
/// Anything that failed to establish the connection is a connection error,
/// including a handshake that hit the connect timeout. Only a timeout once
/// connected is [`ProbeError::Timeout`]. Other failures while sending or
/// reading (reset, truncated body) are connection errors too.
fn classify_error(url: &str, err: reqwest::Error) -> ProbeError {
    let message = error_chain(&err);
    let url = url.to_string();

    if err.is_connect() {
        ProbeError::Connection { url, message }
    } else if err.is_timeout() {
        ProbeError::Timeout { url, message }
    } else if err.is_request() || err.is_body() {
        ProbeError::Connection { url, message }
    } else {
        ProbeError::Http { url, message }
    }
}
