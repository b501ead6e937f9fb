//! CLI string to config value conversion

use anyhow::{Context, Result};

/// Parse a duration string (e.g., "60", "60s", "5m", "1h") to whole seconds
///
/// A bare number is seconds.
pub fn parse_duration(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if let Some(num) = s.strip_suffix("sec") {
        (num, 1u64)
    } else if let Some(num) = s.strip_suffix("min") {
        (num, 60)
    } else if let Some(num) = s.strip_suffix("hr") {
        (num, 3600)
    } else if let Some(num) = s.strip_suffix('s') {
        (num, 1)
    } else if let Some(num) = s.strip_suffix('m') {
        (num, 60)
    } else if let Some(num) = s.strip_suffix('h') {
        (num, 3600)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Duration too large: {}", s))
}

/// clap value parser for the sampling interval positional
pub fn parse_interval(s: &str) -> std::result::Result<u64, String> {
    parse_duration(s).map_err(|e| format!("{:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval_message() {
        assert_eq!(parse_interval("2m"), Ok(120));
        let err = parse_interval("soon").unwrap_err();
        assert!(err.contains("Invalid duration format: soon"));
    }

    #[test]
    fn test_parse_duration_seconds() {
        assert_eq!(parse_duration("60").unwrap(), 60);
        assert_eq!(parse_duration("60s").unwrap(), 60);
        assert_eq!(parse_duration("60sec").unwrap(), 60);
        assert_eq!(parse_duration(" 0 ").unwrap(), 0);
    }

    #[test]
    fn test_parse_duration_minutes_hours() {
        assert_eq!(parse_duration("5m").unwrap(), 300);
        assert_eq!(parse_duration("5min").unwrap(), 300);
        assert_eq!(parse_duration("2h").unwrap(), 7200);
        assert_eq!(parse_duration("1hr").unwrap(), 3600);
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("-5").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("1.5m").is_err());
    }
}
