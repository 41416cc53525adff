// Shared test helpers

use hostmon::models::MetricSnapshot;

/// Healthy 10 GB host; nothing breaches the thresholds used in tests.
pub fn quiet_snapshot() -> MetricSnapshot {
    MetricSnapshot {
        cpu_percent: 10.0,
        ram_used_bytes: 4_000_000_000,
        ram_total_bytes: 10_000_000_000,
        disk_used_bytes: 5_000_000_000,
        disk_total_bytes: 10_000_000_000,
        uptime_seconds: 7_200.0,
        temperature_celsius: Some(40.0),
    }
}
