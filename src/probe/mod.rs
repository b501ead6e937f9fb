//! Network probe abstraction
//!
//! A sampling cycle talks to three external collaborators: a DNS resolver
//! (once, at startup), an HTTP client (three requests per cycle) and an ICMP
//! pinger (one echo sequence per cycle). Each sits behind a small trait so
//! the collector and sampler loop can run against the real network or
//! against the deterministic implementations in [`mock`].
//!
//! # Implementations
//!
//! - **Resolver**: [`resolver::SystemResolver`] (OS resolver via `getaddrinfo`)
//! - **HTTP**: [`http::ReqwestFetcher`] (blocking `reqwest` client)
//! - **ICMP**: [`icmp::IcmpPinger`] (echo requests via the `ping` crate)
//!
//! # Example
//!
//! ```
//! use linkpulse::probe::{HttpFetcher, Pinger, Resolver};
//! use linkpulse::probe::mock::{MockFetcher, MockPinger, MockResolver};
//! use std::time::Duration;
//!
//! let resolver = MockResolver::with_addr("203.0.113.5".parse().unwrap());
//! let addr = resolver.resolve_ipv4("example.com").unwrap();
//!
//! let pinger = MockPinger::with_rtt(Duration::from_millis(25));
//! let summary = pinger.ping(addr.into(), Duration::from_secs(10), 1).unwrap();
//! assert_eq!(summary.avg_rtt_ms(), 25.0);
//!
//! let fetcher = MockFetcher::new();
//! fetcher.respond("https://www.example.com/", 200, b"<html></html>", Duration::from_millis(420));
//! let page = fetcher.get("https://www.example.com/", "text/html").unwrap();
//! assert_eq!(page.status, 200);
//! ```

pub mod http;
pub mod icmp;
pub mod mock;
pub mod resolver;

use crate::error::ProbeError;
use crate::util::time::round_centis;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// `Accept` header for the external page request
pub const ACCEPT_HTML: &str = "text/html";

/// `Accept` header for router diagnostic requests
pub const ACCEPT_JSON: &str = "application/json";

/// Resolves the ping target once at startup
pub trait Resolver {
    /// Return the first IPv4 address published for `domain`
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Resolve`] if the lookup fails or yields no
    /// IPv4 address.
    fn resolve_ipv4(&self, domain: &str) -> Result<Ipv4Addr, ProbeError>;
}

/// Performs the cycle's HTTP GET requests
///
/// Implementations send `Accept: <accept>`, `Cache-Control: no-cache`,
/// `Connection: close` and the configured `User-Agent`. Non-2xx statuses
/// are not errors; they are returned in [`HttpResponse::status`].
pub trait HttpFetcher {
    /// GET `url` and read the full body
    fn get(&self, url: &str, accept: &str) -> Result<HttpResponse, ProbeError>;
}

/// Performs the cycle's ICMP echo sequence
pub trait Pinger {
    /// Send `count` echo requests to `addr`, each waiting at most `timeout`
    ///
    /// An echo that times out contributes `timeout` to the average; any
    /// other failure is returned as [`ProbeError::Ping`].
    fn ping(&self, addr: IpAddr, timeout: Duration, count: u32) -> Result<PingSummary, ProbeError>;
}

/// Result of one HTTP GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
    /// Time from sending the request until the response headers arrived
    pub elapsed: Duration,
}

impl HttpResponse {
    /// Body length in bytes
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

/// Outcome of an echo sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingSummary {
    /// Echo requests sent
    pub sent: u32,
    /// Echo requests that timed out
    pub timed_out: u32,
    /// Sum of round-trip times, timeouts counted at the full timeout
    pub total_rtt: Duration,
}

impl PingSummary {
    /// Average round trip across all echoes
    pub fn avg_rtt(&self) -> Duration {
        if self.sent == 0 {
            Duration::ZERO
        } else {
            self.total_rtt / self.sent
        }
    }

    /// Average round trip in milliseconds, rounded to two decimals
    pub fn avg_rtt_ms(&self) -> f64 {
        round_centis(self.avg_rtt().as_secs_f64() * 1000.0)
    }
}

/// Render an error and its source chain as one line
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_summary_average() {
        let summary = PingSummary {
            sent: 4,
            timed_out: 0,
            total_rtt: Duration::from_micros(94_040),
        };
        assert_eq!(summary.avg_rtt(), Duration::from_micros(23_510));
        assert_eq!(summary.avg_rtt_ms(), 23.51);
    }

    #[test]
    fn test_ping_summary_empty() {
        let summary = PingSummary {
            sent: 0,
            timed_out: 0,
            total_rtt: Duration::ZERO,
        };
        assert_eq!(summary.avg_rtt_ms(), 0.0);
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outer = ProbeError::Io(inner);
        assert_eq!(error_chain(&outer), "IO error: refused");
    }
}
