//! Mock probes for testing
//!
//! Deterministic stand-ins for the resolver, HTTP client and pinger. They
//! never touch the network, record every call for verification, and can be
//! told to fail. Clones share state, so a test can keep one handle while the
//! collector owns another.
//!
//! # Example
//!
//! ```
//! use linkpulse::error::ErrorKind;
//! use linkpulse::probe::HttpFetcher;
//! use linkpulse::probe::mock::{MockFailure, MockFetcher};
//! use std::time::Duration;
//!
//! let fetcher = MockFetcher::new();
//! fetcher.respond("http://router/a.cgi", 200, b"{}", Duration::from_millis(5));
//! fetcher.fail_next("http://router/a.cgi", MockFailure::Connection);
//!
//! let err = fetcher.get("http://router/a.cgi", "application/json").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Connection);
//! assert!(fetcher.get("http://router/a.cgi", "application/json").is_ok());
//! assert_eq!(fetcher.requests().len(), 2);
//! ```

use super::{HttpFetcher, HttpResponse, PingSummary, Pinger, Resolver};
use crate::error::ProbeError;
use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Failure a mock probe can be scripted to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Transport failure (refused, unreachable)
    Connection,
    /// Request timeout
    Timeout,
    /// ICMP socket fault
    Ping,
}

impl MockFailure {
    fn into_error(self, target: &str) -> ProbeError {
        match self {
            MockFailure::Connection => ProbeError::Connection {
                url: target.to_string(),
                message: "Max retries exceeded (connection refused)".to_string(),
            },
            MockFailure::Timeout => ProbeError::Timeout {
                url: target.to_string(),
                message: "operation timed out".to_string(),
            },
            MockFailure::Ping => ProbeError::Ping {
                addr: target.to_string(),
                message: "operation not permitted".to_string(),
            },
        }
    }
}

/// Resolver returning a fixed address list
#[derive(Debug, Clone, Default)]
pub struct MockResolver {
    addrs: Vec<IpAddr>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockResolver {
    /// Resolver that answers every lookup with `addrs`
    pub fn new(addrs: Vec<IpAddr>) -> Self {
        Self {
            addrs,
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Resolver that answers with a single address
    pub fn with_addr(addr: IpAddr) -> Self {
        Self::new(vec![addr])
    }

    /// Resolver that finds no records
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Domains looked up so far
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Resolver for MockResolver {
    fn resolve_ipv4(&self, domain: &str) -> Result<Ipv4Addr, ProbeError> {
        self.lookups.lock().unwrap().push(domain.to_string());
        super::resolver::first_ipv4(self.addrs.iter().copied()).ok_or_else(|| ProbeError::Resolve {
            domain: domain.to_string(),
            message: "no IPv4 (A) records".to_string(),
        })
    }
}

/// Record of a request made against [`MockFetcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub url: String,
    pub accept: String,
}

/// HTTP fetcher serving canned responses keyed by URL
///
/// Scripted failures for a URL are consumed first, in order; after that the
/// URL's canned response is returned every time. Unknown URLs fail with an
/// HTTP error.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
    failures: Arc<Mutex<HashMap<String, VecDeque<MockFailure>>>>,
    requests: Arc<Mutex<Vec<RequestRecord>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with `status` for `url`, reporting `elapsed`
    pub fn respond(&self, url: &str, status: u16, body: &[u8], elapsed: Duration) {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            HttpResponse {
                status,
                body: body.to_vec(),
                elapsed,
            },
        );
    }

    /// Make the next request to `url` fail
    pub fn fail_next(&self, url: &str, failure: MockFailure) {
        self.failures
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(failure);
    }

    /// All requests made so far, in order
    pub fn requests(&self) -> Vec<RequestRecord> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpFetcher for MockFetcher {
    fn get(&self, url: &str, accept: &str) -> Result<HttpResponse, ProbeError> {
        self.requests.lock().unwrap().push(RequestRecord {
            url: url.to_string(),
            accept: accept.to_string(),
        });

        if let Some(failure) = self
            .failures
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(|queue| queue.pop_front())
        {
            return Err(failure.into_error(url));
        }

        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ProbeError::Http {
                url: url.to_string(),
                message: "no mock response registered".to_string(),
            })
    }
}

/// Record of an echo sequence requested from [`MockPinger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingRecord {
    pub addr: IpAddr,
    pub timeout: Duration,
    pub count: u32,
}

/// Pinger answering every echo with a fixed round trip
#[derive(Debug, Clone)]
pub struct MockPinger {
    rtt: Duration,
    failures: Arc<Mutex<VecDeque<MockFailure>>>,
    calls: Arc<Mutex<Vec<PingRecord>>>,
}

impl MockPinger {
    /// Pinger whose echoes all take `rtt`
    pub fn with_rtt(rtt: Duration) -> Self {
        Self {
            rtt,
            failures: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make the next echo sequence fail
    pub fn fail_next(&self, failure: MockFailure) {
        self.failures.lock().unwrap().push_back(failure);
    }

    /// Echo sequences requested so far
    pub fn calls(&self) -> Vec<PingRecord> {
        self.calls.lock().unwrap().clone()
    }
}

impl Pinger for MockPinger {
    fn ping(&self, addr: IpAddr, timeout: Duration, count: u32) -> Result<PingSummary, ProbeError> {
        self.calls.lock().unwrap().push(PingRecord { addr, timeout, count });

        if let Some(failure) = self.failures.lock().unwrap().pop_front() {
            return Err(failure.into_error(&addr.to_string()));
        }

        Ok(PingSummary {
            sent: count,
            timed_out: 0,
            total_rtt: self.rtt * count,
        })
    }
}
