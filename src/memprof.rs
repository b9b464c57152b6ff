//! Memory and timing profiling utilities
//!
//! - Memory: Reads RSS (Resident Set Size) from /proc/self/status (0 elsewhere)
//! - Timing: Uses std::time::Instant
//!
//! Measurements are emitted as `debug` events.

use std::fs;
use std::time::Instant;

/// Current RSS in bytes, or 0 if /proc is unavailable
pub fn get_rss_bytes() -> u64 {
    let Ok(status) = fs::read_to_string("/proc/self/status") else {
        return 0;
    };
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        // Format: "VmRSS:    123456 kB"
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
        .unwrap_or(0)
}

pub fn get_rss_mb() -> f64 {
    get_rss_bytes() as f64 / (1024.0 * 1024.0)
}

/// Log the current RSS and return it for a later [`delta`]
pub fn checkpoint(label: &str) -> f64 {
    let rss = get_rss_mb();
    tracing::debug!(rss_mb = rss, "MEMPROF {}", label);
    rss
}

/// Log RSS change since `previous`, returns the current RSS
pub fn delta(label: &str, previous: f64) -> f64 {
    let current = get_rss_mb();
    tracing::debug!(
        rss_mb = current,
        delta_mb = current - previous,
        "MEMPROF {}",
        label
    );
    current
}

/// Log elapsed time of a section and since `start`; returns a new section start
pub fn time_delta(label: &str, start: Instant, section_start: Instant) -> Instant {
    tracing::debug!(
        section_s = section_start.elapsed().as_secs_f64(),
        total_s = start.elapsed().as_secs_f64(),
        "TIMEPROF {}",
        label
    );
    Instant::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rss_is_non_negative() {
        assert!(get_rss_mb() >= 0.0);
        let before = checkpoint("test");
        assert!(delta("test", before) >= 0.0);
    }

    #[test]
    fn test_time_delta_returns_new_instant() {
        let start = Instant::now();
        let next = time_delta("test", start, start);
        assert!(next >= start);
    }
}
