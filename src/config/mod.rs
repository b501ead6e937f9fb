//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//! Every setting has a default matching the probe's historical behavior, so
//! the two positional CLI arguments alone give a complete configuration.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::error::RecoveryPolicy;
use crate::router::{RADIO_STATUS_PATH, STATISTICS_PATH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Complete probe configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub ping: PingConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Loop cadence and output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Seconds to sleep after each cycle
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// CSV log file
    #[serde(default)]
    pub output_path: PathBuf,
    /// Append to an existing log instead of truncating it
    #[serde(default)]
    pub append: bool,
    /// Stop after this many cycles (unset: run forever)
    pub max_cycles: Option<u64>,
}

fn default_interval_secs() -> u64 {
    60
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            output_path: PathBuf::new(),
            append: false,
            max_cycles: None,
        }
    }
}

impl SamplingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// External reachability target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Domain resolved once at startup; its first IPv4 address is pinged
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Page fetched each cycle
    #[serde(default = "default_url")]
    pub url: String,
    /// `User-Agent` sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_domain() -> String {
    "example.com".to_string()
}

fn default_url() -> String {
    "https://www.example.com/".to_string()
}

fn default_user_agent() -> String {
    "linkpulse".to_string()
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            url: default_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Cellular gateway diagnostics API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Router address (host or host:port), reached over plain HTTP
    #[serde(default = "default_router_host")]
    pub host: String,
    #[serde(default = "default_radio_status_path")]
    pub radio_status_path: String,
    #[serde(default = "default_statistics_path")]
    pub statistics_path: String,
}

fn default_router_host() -> String {
    "192.168.12.1".to_string()
}

fn default_radio_status_path() -> String {
    RADIO_STATUS_PATH.to_string()
}

fn default_statistics_path() -> String {
    STATISTICS_PATH.to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: default_router_host(),
            radio_status_path: default_radio_status_path(),
            statistics_path: default_statistics_path(),
        }
    }
}

/// ICMP echo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingConfig {
    /// Per-echo timeout in seconds
    #[serde(default = "default_ping_timeout_secs")]
    pub timeout_secs: u64,
    /// Echoes per cycle; the row records their average
    #[serde(default = "default_ping_count")]
    pub count: u32,
}

fn default_ping_timeout_secs() -> u64 {
    10
}

fn default_ping_count() -> u32 {
    1
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_ping_timeout_secs(),
            count: default_ping_count(),
        }
    }
}

impl PingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds; 0 disables it
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds; 0 leaves it to the OS
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        optional_secs(self.timeout_secs)
    }

    /// Connect phase bound; a connect that expires is a connection error
    pub fn connect_timeout(&self) -> Option<Duration> {
        optional_secs(self.connect_timeout_secs)
    }
}

fn optional_secs(secs: u64) -> Option<Duration> {
    match secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

/// Loop behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Error kinds logged and survived; everything else is fatal
    #[serde(default)]
    pub recover: RecoveryPolicy,
    /// Mirror every log line to stdout
    #[serde(default = "default_console")]
    pub console: bool,
}

fn default_console() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            recover: RecoveryPolicy::default(),
            console: default_console(),
        }
    }
}

/// How the log file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Truncate,
    Append,
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenMode::Truncate => write!(f, "truncate"),
            OpenMode::Append => write!(f, "append"),
        }
    }
}

impl SamplingConfig {
    pub fn open_mode(&self) -> OpenMode {
        if self.append {
            OpenMode::Append
        } else {
            OpenMode::Truncate
        }
    }
}
