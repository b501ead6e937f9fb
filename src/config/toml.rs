//! TOML configuration file parsing

use super::cli::Cli;
use super::cli_convert::parse_duration;
use super::Config;
use crate::error::RecoveryPolicy;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Build the effective configuration: defaults, then the config file if
/// given, then CLI arguments
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };

    merge_cli_with_config(cli, config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Positionals are always present
    config.sampling.interval_secs = cli.interval;
    config.sampling.output_path = cli.output.clone();

    if cli.append {
        config.sampling.append = true;
    }
    if let Some(max) = cli.max_cycles {
        config.sampling.max_cycles = Some(max);
    }

    // Override targets
    if let Some(ref host) = cli.router_host {
        config.router.host = host.clone();
    }
    if let Some(ref domain) = cli.target_domain {
        config.target.domain = domain.clone();
    }
    if let Some(ref url) = cli.target_url {
        config.target.url = url.clone();
    }
    if let Some(ref agent) = cli.user_agent {
        config.target.user_agent = agent.clone();
    }

    // Override probe settings
    if let Some(ref timeout) = cli.ping_timeout {
        config.ping.timeout_secs = parse_duration(timeout).context("Invalid ping timeout")?;
    }
    if let Some(count) = cli.ping_count {
        config.ping.count = count;
    }
    if let Some(ref timeout) = cli.http_timeout {
        config.http.timeout_secs = parse_duration(timeout).context("Invalid HTTP timeout")?;
    }
    if let Some(ref timeout) = cli.connect_timeout {
        config.http.connect_timeout_secs =
            parse_duration(timeout).context("Invalid HTTP connect timeout")?;
    }

    // Override runtime settings
    if let Some(ref kinds) = cli.recover {
        config.runtime.recover = RecoveryPolicy::new(kinds.iter().copied());
    }
    if cli.quiet {
        config.runtime.console = false;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use clap::Parser;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_parse_toml_full() {
        let toml = r#"
[sampling]
interval_secs = 30
output_path = "/var/log/linkpulse.csv"
append = true

[target]
domain = "example.net"
url = "https://www.example.net/"

[router]
host = "192.168.1.254"

[ping]
timeout_secs = 2
count = 5

[http]
timeout_secs = 0
connect_timeout_secs = 3

[runtime]
recover = ["connection", "timeout"]
console = false
"#;

        let config = parse_toml_string(toml).unwrap();
        assert_eq!(config.sampling.interval_secs, 30);
        assert!(config.sampling.append);
        assert_eq!(config.target.domain, "example.net");
        assert_eq!(config.target.user_agent, "linkpulse");
        assert_eq!(config.router.host, "192.168.1.254");
        assert_eq!(config.router.statistics_path, "/statistics_status_web_app.cgi");
        assert_eq!(config.ping.count, 5);
        assert_eq!(config.http.timeout(), None);
        assert_eq!(config.http.connect_timeout(), Some(std::time::Duration::from_secs(3)));
        assert_eq!(
            config.runtime.recover.kinds(),
            &[ErrorKind::Connection, ErrorKind::Timeout]
        );
        assert!(!config.runtime.console);
    }

    #[test]
    fn test_parse_toml_empty_is_default() {
        assert_eq!(parse_toml_string("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_toml_unknown_kind_fails() {
        let toml = "[runtime]\nrecover = [\"everything\"]\n";
        assert!(parse_toml_string(toml).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ping]\ncount = 5\ntimeout_secs = 2\n\n[router]\nhost = \"10.0.0.1\"").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "linkpulse",
            "2m",
            "out.csv",
            "--config",
            path.as_str(),
            "--ping-count",
            "3",
            "--recover",
            "connection,ping",
            "--quiet",
            "--connect-timeout",
            "5s",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.sampling.interval_secs, 120);
        assert_eq!(config.sampling.output_path, PathBuf::from("out.csv"));
        assert_eq!(config.ping.count, 3);
        assert_eq!(config.ping.timeout_secs, 2);
        assert_eq!(config.router.host, "10.0.0.1");
        assert_eq!(config.runtime.recover.kinds(), &[ErrorKind::Connection, ErrorKind::Ping]);
        assert!(!config.runtime.console);
        assert_eq!(config.http.connect_timeout_secs, 5);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from([
            "linkpulse",
            "60",
            "out.csv",
            "--config",
            "/nonexistent/linkpulse.toml",
        ])
        .unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
