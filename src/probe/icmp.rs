//! ICMP echo round-trip measurement

use super::{error_chain, PingSummary, Pinger};
use crate::error::ProbeError;
use crate::util::time::Stopwatch;
use std::io;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, warn};

/// Pinger sending real ICMP echo requests
///
/// Echoes go out on a raw ICMP socket, so the process needs `CAP_NET_RAW`
/// (or root) on Linux. The unprivileged datagram socket is not used: it is
/// refused outside `net.ipv4.ping_group_range`, and its replies carry no IP
/// header for the decoder to strip.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcmpPinger;

impl IcmpPinger {
    pub fn new() -> Self {
        Self
    }
}

impl Pinger for IcmpPinger {
    fn ping(&self, addr: IpAddr, timeout: Duration, count: u32) -> Result<PingSummary, ProbeError> {
        let mut summary = PingSummary {
            sent: 0,
            timed_out: 0,
            total_rtt: Duration::ZERO,
        };

        for seq in 0..count {
            let mut echo = ping::new(addr);
            echo.timeout(timeout)
                .ttl(128)
                .socket_type(ping::SocketType::RAW);

            let watch = Stopwatch::start();
            let outcome = echo.send().map(|_| ());
            let rtt = watch.elapsed();

            tally_echo(&mut summary, outcome, rtt, timeout).map_err(|err| ProbeError::Ping {
                addr: addr.to_string(),
                message: error_chain(&err),
            })?;
            debug!(%addr, seq, rtt_us = rtt.as_micros() as u64, "echo complete");
        }

        Ok(summary)
    }
}

/// Fold one echo into `summary`
///
/// A reply adds its measured round trip and a timeout adds the full
/// `timeout`. Any other failure is handed back untouched, leaving the
/// summary as it was.
fn tally_echo<E>(
    summary: &mut PingSummary,
    outcome: Result<(), E>,
    rtt: Duration,
    timeout: Duration,
) -> Result<(), E>
where
    E: std::error::Error + 'static,
{
    match outcome {
        Ok(()) => {
            summary.sent += 1;
            summary.total_rtt += rtt;
            Ok(())
        }
        Err(err) if is_timeout(&err) => {
            warn!(seq = summary.sent, "echo timed out");
            summary.sent += 1;
            summary.timed_out += 1;
            summary.total_rtt += timeout;
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Whether an echo failure is a receive timeout rather than a socket fault
///
/// Not every error wrapper exposes its `io::Error` as a source, so the
/// rendered message is checked as well.
fn is_timeout(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if matches!(io_err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) {
                return true;
            }
        }
        current = e.source();
    }

    let message = error_chain(err).to_lowercase();
    TIMEOUT_MESSAGES.iter().any(|needle| message.contains(needle))
}

// EAGAIN and ETIMEDOUT as rendered by the OS
const TIMEOUT_MESSAGES: [&str; 3] = ["timed out", "temporarily unavailable", "would block"];
