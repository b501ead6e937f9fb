//! linkpulse - cellular link health sampler
//!
//! Every interval linkpulse pings a reachability target, times a page fetch
//! from it, and reads the radio and WAN counters from a 5G gateway's JSON
//! endpoints. Each cycle becomes one CSV row.
//!
//! # Architecture
//!
//! - **Probes**: resolver, HTTP client and pinger behind traits, with mocks
//! - **Router documents**: typed radio status and statistics payloads
//! - **Collector**: one ordered cycle producing a flat [`record::SampleRecord`]
//! - **Sampler**: the loop, the CSV log and the recovery policy

pub mod collector;
pub mod config;
pub mod error;
pub mod output;
pub mod probe;
pub mod record;
pub mod router;
pub mod sampler;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorKind, ProbeError, RecoveryPolicy};
pub use probe::{HttpFetcher, Pinger, Resolver};

/// Result type used throughout linkpulse
pub type Result<T> = anyhow::Result<T>;
