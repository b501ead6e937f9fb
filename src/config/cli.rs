//! CLI argument parsing using clap

use super::cli_convert::parse_interval;
use crate::error::ErrorKind;
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use std::path::PathBuf;

/// One-line usage shown on argument errors
pub const USAGE: &str =
    "usage: linkpulse {seconds between samples: e.g. 60} {log file path: e.g. /var/log/linkpulse.csv}";

/// Exit status for usage errors
pub const USAGE_EXIT_CODE: i32 = 1;

/// linkpulse - sample link latency, page retrieval and router modem stats into a CSV log
#[derive(Parser, Debug)]
#[command(name = "linkpulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Time between samples (e.g., 60, 60s, 5m)
    #[arg(value_name = "SECONDS", value_parser = parse_interval)]
    pub interval: u64,

    /// CSV log file path
    #[arg(value_name = "LOG_FILE")]
    pub output: PathBuf,

    /// TOML configuration file (CLI options take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // === Targets ===
    /// Router address (host or host:port) serving the diagnostics API
    #[arg(long)]
    pub router_host: Option<String>,

    /// Domain resolved once at startup and pinged every cycle
    #[arg(long)]
    pub target_domain: Option<String>,

    /// Page fetched every cycle
    #[arg(long)]
    pub target_url: Option<String>,

    /// User-Agent header for all requests
    #[arg(long)]
    pub user_agent: Option<String>,

    // === Probe Options ===
    /// Per-echo ping timeout (e.g., 10, 10s)
    #[arg(long)]
    pub ping_timeout: Option<String>,

    /// Echo requests per cycle
    #[arg(long)]
    pub ping_count: Option<u32>,

    /// HTTP request timeout (e.g., 30s, 2m; 0 disables)
    #[arg(long)]
    pub http_timeout: Option<String>,

    /// HTTP connect timeout (e.g., 10s; 0 leaves it to the OS)
    #[arg(long)]
    pub connect_timeout: Option<String>,

    // === Output Options ===
    /// Append to an existing log instead of truncating it
    #[arg(long)]
    pub append: bool,

    /// Do not mirror log lines to stdout
    #[arg(short = 'q', long)]
    pub quiet: bool,

    // === Runtime Options ===
    /// Error kinds to log and survive (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub recover: Option<Vec<ErrorKind>>,

    /// Stop after this many cycles instead of running forever
    #[arg(long)]
    pub max_cycles: Option<u64>,
}

impl Cli {
    /// Parse CLI arguments, exiting with status 1 on a usage error
    ///
    /// `--help` and `--version` still exit 0.
    pub fn parse_args() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err) => match err.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => err.exit(),
                _ => {
                    eprintln!("{}", err);
                    println!("{}", USAGE);
                    std::process::exit(USAGE_EXIT_CODE);
                }
            },
        }
    }
}
