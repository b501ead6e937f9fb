//! Probe errors and their recovery classification
//!
//! Every failure a sampling cycle can hit is a [`ProbeError`]. Each error
//! reports an [`ErrorKind`], and the sampler loop consults a
//! [`RecoveryPolicy`] to decide whether the kind is logged and survived or
//! propagated as fatal.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a probe failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Transport could not establish or complete a request (refused, unreachable, reset)
    Connection,
    /// Request exceeded the configured HTTP timeout
    Timeout,
    /// Any other HTTP client failure (bad URL, redirect loop, TLS setup)
    Http,
    /// Response body was not valid JSON for the expected document
    Decode,
    /// JSON parsed but a required key or array element was absent
    MissingField,
    /// ICMP echo could not be performed
    Ping,
    /// DNS lookup failed or returned no IPv4 address
    Resolve,
    /// Local IO failure (output file, console)
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Http => "http",
            ErrorKind::Decode => "decode",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::Ping => "ping",
            ErrorKind::Resolve => "resolve",
            ErrorKind::Io => "io",
        };
        f.write_str(name)
    }
}

/// Errors raised while collecting or emitting a sample
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Transport-level failure reaching `url`
    #[error("connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    /// HTTP request to `url` timed out
    #[error("request to {url} timed out: {message}")]
    Timeout { url: String, message: String },

    /// Other HTTP client error
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// Router document could not be decoded
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Required field missing from a router document
    #[error("missing field {path} in {document}")]
    MissingField {
        document: &'static str,
        path: String,
    },

    /// ICMP echo failure other than a timeout
    #[error("ping to {addr} failed: {message}")]
    Ping { addr: String, message: String },

    /// Target could not be resolved to an IPv4 address
    #[error("could not resolve {domain}: {message}")]
    Resolve { domain: String, message: String },

    /// Output or console write failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Classification used by the recovery policy
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProbeError::Connection { .. } => ErrorKind::Connection,
            ProbeError::Timeout { .. } => ErrorKind::Timeout,
            ProbeError::Http { .. } => ErrorKind::Http,
            ProbeError::Decode { .. } => ErrorKind::Decode,
            ProbeError::MissingField { .. } => ErrorKind::MissingField,
            ProbeError::Ping { .. } => ErrorKind::Ping,
            ProbeError::Resolve { .. } => ErrorKind::Resolve,
            ProbeError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Set of error kinds the sampler loop logs and survives
///
/// Anything outside the set terminates the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecoveryPolicy {
    recoverable: Vec<ErrorKind>,
}

impl RecoveryPolicy {
    /// Policy tolerating exactly the given kinds
    pub fn new(kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        let mut recoverable: Vec<ErrorKind> = Vec::new();
        for kind in kinds {
            if !recoverable.contains(&kind) {
                recoverable.push(kind);
            }
        }
        Self { recoverable }
    }

    /// Policy that treats every error as fatal
    pub fn fail_fast() -> Self {
        Self { recoverable: Vec::new() }
    }

    /// Whether `error` should be logged and the loop continued
    pub fn is_recoverable(&self, error: &ProbeError) -> bool {
        self.recoverable.contains(&error.kind())
    }

    /// Kinds covered by this policy
    pub fn kinds(&self) -> &[ErrorKind] {
        &self.recoverable
    }
}

impl Default for RecoveryPolicy {
    /// Only connection failures are survived
    fn default() -> Self {
        Self::new([ErrorKind::Connection])
    }
}
