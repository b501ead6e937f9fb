//! linkpulse CLI entry point

use anyhow::{Context, Result};
use linkpulse::collector::{CycleCollector, Endpoints, PingTarget};
use linkpulse::config::cli::Cli;
use linkpulse::config::toml::load_config;
use linkpulse::config::validator::validate_config;
use linkpulse::config::Config;
use linkpulse::output::text::print_configuration;
use linkpulse::output::{open_log_file, CsvEmitter};
use linkpulse::probe::http::ReqwestFetcher;
use linkpulse::probe::icmp::IcmpPinger;
use linkpulse::probe::resolver::SystemResolver;
use linkpulse::probe::Resolver;
use linkpulse::sampler::Sampler;
use std::io;
use std::net::IpAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries the CSV mirror
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("linkpulse=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse_args();

    let config = load_config(&cli)?;
    validate_config(&config).context("Configuration validation failed")?;

    if let Err(err) = run(config) {
        let message = format!("{:#}", err);
        error!(error = %message, "linkpulse stopped");
        return Err(err);
    }

    Ok(())
}

fn run(config: Config) -> Result<()> {
    // Resolution failure is fatal before the first cycle
    let addr = SystemResolver::new()
        .resolve_ipv4(&config.target.domain)
        .context("Failed to resolve ping target")?;
    info!(domain = %config.target.domain, %addr, "ping target resolved");

    let endpoints = Endpoints::from_config(&config);
    if config.runtime.console {
        print_configuration(&config, &endpoints, addr)?;
    }

    let (file, has_content) = open_log_file(&config.sampling.output_path, config.sampling.open_mode())?;
    let console = config.runtime.console.then(io::stdout);
    let emitter = CsvEmitter::new(file, console).with_header_written(has_content);

    let fetcher = ReqwestFetcher::new(
        &config.target.user_agent,
        config.http.timeout(),
        config.http.connect_timeout(),
    )?;
    let ping = PingTarget {
        addr: IpAddr::V4(addr),
        timeout: config.ping.timeout(),
        count: config.ping.count,
    };
    let collector = CycleCollector::new(fetcher, IcmpPinger::new(), endpoints, ping);

    info!(
        interval_secs = config.sampling.interval_secs,
        output = %config.sampling.output_path.display(),
        mode = %config.sampling.open_mode(),
        "sampling started"
    );

    let mut sampler = Sampler::new(
        collector,
        emitter,
        config.runtime.recover.clone(),
        config.sampling.interval(),
    )
    .with_max_cycles(config.sampling.max_cycles);

    sampler.run().context("Sampling stopped")?;

    Ok(())
}
