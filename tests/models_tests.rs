// Snapshot math tests: percent helpers, GB conversion, alert kind labels

use hostmon::models::*;

fn snapshot() -> MetricSnapshot {
    MetricSnapshot {
        cpu_percent: 0.0,
        ram_used_bytes: 2_500_000_000,
        ram_total_bytes: 10_000_000_000,
        disk_used_bytes: 7_500_000_000,
        disk_total_bytes: 10_000_000_000,
        uptime_seconds: 0.0,
        temperature_celsius: None,
    }
}

#[test]
fn test_used_percent_helpers() {
    let s = snapshot();
    assert_eq!(s.ram_used_percent(), Some(25.0));
    assert_eq!(s.disk_used_percent(), Some(75.0));
}

#[test]
fn test_used_percent_is_none_for_zero_total() {
    let mut s = snapshot();
    s.ram_used_bytes = 0;
    s.ram_total_bytes = 0;
    s.disk_used_bytes = 0;
    s.disk_total_bytes = 0;
    assert_eq!(s.ram_used_percent(), None);
    assert_eq!(s.disk_used_percent(), None);
}

#[test]
fn test_bytes_to_gb_is_decimal() {
    assert_eq!(bytes_to_gb(1_000_000_000), 1.0);
    assert_eq!(bytes_to_gb(500_000_000), 0.5);
    assert_eq!(bytes_to_gb(0), 0.0);
}

#[test]
fn test_disk_free_bytes() {
    let mut s = snapshot();
    s.disk_used_bytes = 9_500_000_000;
    assert_eq!(s.disk_free_bytes(), 500_000_000);
}

#[test]
fn test_disk_free_bytes_saturates_on_overreported_usage() {
    let mut s = snapshot();
    s.disk_used_bytes = 11_000_000_000;
    assert_eq!(s.disk_free_bytes(), 0);
}

#[test]
fn test_alert_kind_labels_and_descriptions() {
    assert_eq!(AlertKind::HighCpu.label(), "cpu");
    assert_eq!(AlertKind::HighRam.label(), "ram");
    assert_eq!(AlertKind::LowDisk.label(), "disk");
    assert_eq!(AlertKind::HighTemperature.label(), "temperature");
    assert_eq!(AlertKind::HighCpu.describe(), "high CPU usage");
    assert_eq!(AlertKind::HighRam.describe(), "high RAM usage");
    assert_eq!(AlertKind::LowDisk.describe(), "low disk space");
    assert_eq!(AlertKind::HighTemperature.describe(), "high temperature");
}
