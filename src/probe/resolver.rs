//! Startup DNS resolution of the ping target

use super::Resolver;
use crate::error::ProbeError;
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;

/// Resolver backed by the operating system (`getaddrinfo`)
///
/// Timeouts and retries are whatever the host resolver is configured for.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for SystemResolver {
    fn resolve_ipv4(&self, domain: &str) -> Result<Ipv4Addr, ProbeError> {
        let addrs = dns_lookup::lookup_host(domain).map_err(|e| ProbeError::Resolve {
            domain: domain.to_string(),
            message: e.to_string(),
        })?;

        let addrs: Vec<IpAddr> = addrs.into_iter().collect();
        debug!(domain, count = addrs.len(), "lookup returned addresses");

        first_ipv4(addrs).ok_or_else(|| ProbeError::Resolve {
            domain: domain.to_string(),
            message: "no IPv4 (A) records".to_string(),
        })
    }
}

/// First IPv4 address in lookup order
pub fn first_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(_) => None,
    })
}
