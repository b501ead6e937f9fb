//! Startup summary output

use crate::collector::Endpoints;
use crate::config::Config;
use crate::util::time::format_duration;
use std::io::{self, Write};
use std::net::Ipv4Addr;

/// Write the startup summary: interval, log path and probe targets
pub fn write_summary<W: Write>(
    out: &mut W,
    config: &Config,
    endpoints: &Endpoints,
    ping_addr: Ipv4Addr,
) -> io::Result<()> {
    let recover: Vec<String> = config
        .runtime
        .recover
        .kinds()
        .iter()
        .map(|kind| kind.to_string())
        .collect();

    writeln!(out)?;
    writeln!(out, "wait_seconds:     {}", config.sampling.interval_secs)?;
    writeln!(out, "output_file_path: {}", config.sampling.output_path.display())?;
    writeln!(out, "open_mode:        {}", config.sampling.open_mode())?;
    writeln!(out, "ping_target:      {} ({})", config.target.domain, ping_addr)?;
    writeln!(
        out,
        "ping:             {} echo(es), {} timeout",
        config.ping.count,
        format_duration(config.ping.timeout())
    )?;
    writeln!(out, "target_url:       {}", endpoints.target_url)?;
    writeln!(out, "radio_status_url: {}", endpoints.radio_status_url)?;
    writeln!(out, "statistics_url:   {}", endpoints.statistics_url)?;
    match config.http.timeout() {
        Some(timeout) => writeln!(out, "http_timeout:     {}", format_duration(timeout))?,
        None => writeln!(out, "http_timeout:     none")?,
    }
    match config.http.connect_timeout() {
        Some(timeout) => writeln!(out, "connect_timeout:  {}", format_duration(timeout))?,
        None => writeln!(out, "connect_timeout:  system")?,
    }
    if recover.is_empty() {
        writeln!(out, "recover:          none")?;
    } else {
        writeln!(out, "recover:          {}", recover.join(","))?;
    }
    if let Some(max) = config.sampling.max_cycles {
        writeln!(out, "max_cycles:       {}", max)?;
    }
    writeln!(out)?;

    Ok(())
}

/// Print the startup summary to stdout
pub fn print_configuration(config: &Config, endpoints: &Endpoints, ping_addr: Ipv4Addr) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_summary(&mut out, config, endpoints, ping_addr)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_summary_lists_settings() {
        let mut config = Config::default();
        config.sampling.output_path = PathBuf::from("/tmp/stats.csv");
        let endpoints = Endpoints::from_config(&config);

        let mut out = Vec::new();
        write_summary(&mut out, &config, &endpoints, Ipv4Addr::new(93, 184, 216, 34)).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("wait_seconds:     60\n"));
        assert!(text.contains("output_file_path: /tmp/stats.csv\n"));
        assert!(text.contains("ping_target:      example.com (93.184.216.34)\n"));
        assert!(text.contains("ping:             1 echo(es), 10.00s timeout\n"));
        assert!(text.contains("http_timeout:     30.00s\n"));
        assert!(text.contains("connect_timeout:  10.00s\n"));
        assert!(text.contains("recover:          connection\n"));
        assert!(!text.contains("max_cycles"));
    }
}
