//! Timing and timestamp helpers
//!
//! Wall-clock timestamps label rows and error lines; monotonic stopwatches
//! measure request and echo round trips.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Row timestamp layout, e.g. `2021-06-01 14:03:27.512344`
pub const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Monotonic stopwatch for round-trip measurements
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    instant: Instant,
}

impl Stopwatch {
    /// Start a stopwatch at the current instant
    #[inline]
    pub fn start() -> Self {
        Self {
            instant: Instant::now(),
        }
    }

    /// Time elapsed since the stopwatch was started
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }
}

/// Current local wall-clock time
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Format a wall-clock time the way rows and error lines carry it
pub fn format_row_timestamp(time: &DateTime<Local>) -> String {
    time.format(ROW_TIMESTAMP_FORMAT).to_string()
}

/// Render a float the way the log has always shown it: shortest
/// round-trip text, always with a fractional part (`1.0`, `0.42`)
pub fn format_decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// Round to two decimal places, as ping averages are reported
pub fn round_centis(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use linkpulse::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_micros(500)), "500us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// assert_eq!(format_duration(Duration::from_secs(150)), "2m30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros < 1_000 {
        format!("{}us", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1_000.0)
    } else if duration.as_secs() < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m{}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::thread;

    #[test]
    fn test_stopwatch_elapsed() {
        let watch = Stopwatch::start();
        thread::sleep(Duration::from_millis(10));
        assert!(watch.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_row_timestamp_layout() {
        let time = Local
            .with_ymd_and_hms(2021, 6, 1, 14, 3, 27)
            .unwrap();
        assert_eq!(format_row_timestamp(&time), "2021-06-01 14:03:27.000000");
    }

    #[test]
    fn test_format_decimal_keeps_fraction() {
        assert_eq!(format_decimal(0.42), "0.42");
        assert_eq!(format_decimal(1.0), "1.0");
        assert_eq!(format_decimal(Duration::from_millis(420).as_secs_f64()), "0.42");
    }

    #[test]
    fn test_round_centis() {
        assert_eq!(round_centis(23.456), 23.46);
        assert_eq!(round_centis(10.0), 10.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(999)), "999us");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.50ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m0s");
    }
}
