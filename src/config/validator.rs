//! Configuration validation

use super::*;
use anyhow::Result;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_sampling(&config.sampling)?;
    validate_target(&config.target)?;
    validate_router(&config.router)?;
    validate_ping(&config.ping)?;

    Ok(())
}

/// Validate loop cadence and output
pub fn validate_sampling(sampling: &SamplingConfig) -> Result<()> {
    if sampling.output_path.as_os_str().is_empty() {
        anyhow::bail!("output path must not be empty");
    }

    if sampling.output_path.is_dir() {
        anyhow::bail!(
            "output path {} is a directory",
            sampling.output_path.display()
        );
    }

    if sampling.max_cycles == Some(0) {
        anyhow::bail!("max_cycles must be at least 1 when set");
    }

    Ok(())
}

/// Validate reachability target
pub fn validate_target(target: &TargetConfig) -> Result<()> {
    if target.domain.trim().is_empty() {
        anyhow::bail!("target domain must not be empty");
    }

    let url = reqwest::Url::parse(&target.url)
        .map_err(|e| anyhow::anyhow!("target url {:?} is invalid: {}", target.url, e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("target url must be http or https, got {}", url.scheme());
    }

    if target.user_agent.trim().is_empty() {
        anyhow::bail!("user agent must not be empty");
    }

    Ok(())
}

/// Validate router endpoint settings
pub fn validate_router(router: &RouterConfig) -> Result<()> {
    let host = router.host.trim();
    if host.is_empty() {
        anyhow::bail!("router host must not be empty");
    }
    if host.contains("://") {
        anyhow::bail!(
            "router host must be a bare host or host:port, got {:?}",
            router.host
        );
    }

    for (name, path) in [
        ("radio_status_path", &router.radio_status_path),
        ("statistics_path", &router.statistics_path),
    ] {
        if path.trim().is_empty() {
            anyhow::bail!("router {} must not be empty", name);
        }
    }

    Ok(())
}

/// Validate echo settings
pub fn validate_ping(ping: &PingConfig) -> Result<()> {
    if ping.count == 0 {
        anyhow::bail!("ping count must be at least 1");
    }

    if ping.timeout_secs == 0 {
        anyhow::bail!("ping timeout must be at least 1 second");
    }

    Ok(())
}
