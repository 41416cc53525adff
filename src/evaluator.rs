// Threshold evaluation over one snapshot.

use crate::config::Thresholds;
use crate::models::{AlertCondition, AlertKind, MetricSnapshot, bytes_to_gb};
use tracing::warn;

/// Compares a snapshot against the configured thresholds and returns every
/// breached condition in a stable order: CPU, RAM, disk, temperature.
///
/// All predicates are strict, so a reading exactly at its threshold does not
/// alert. A zero reported capacity is logged and skipped, never alerted on.
pub fn evaluate(snapshot: &MetricSnapshot, thresholds: &Thresholds) -> Vec<AlertCondition> {
    let mut conditions = Vec::new();

    if snapshot.cpu_percent > thresholds.cpu_percent {
        conditions.push(AlertCondition {
            kind: AlertKind::HighCpu,
            message: format!("High CPU usage: {}%", snapshot.cpu_percent),
            measured_value: snapshot.cpu_percent,
        });
    }

    match snapshot.ram_used_percent() {
        Some(used_percent) if used_percent > thresholds.ram_used_percent => {
            conditions.push(AlertCondition {
                kind: AlertKind::HighRam,
                message: format!(
                    "High RAM usage: {:.2}GB",
                    bytes_to_gb(snapshot.ram_used_bytes)
                ),
                measured_value: used_percent,
            });
        }
        Some(_) => {}
        None => warn!(
            metric = "ram",
            total_bytes = snapshot.ram_total_bytes,
            "zero reported capacity, skipping threshold check"
        ),
    }

    match snapshot.disk_used_percent() {
        Some(used_percent) if used_percent > thresholds.disk_used_percent => {
            conditions.push(AlertCondition {
                kind: AlertKind::LowDisk,
                message: format!(
                    "Low disk space: {:.2}GB free",
                    bytes_to_gb(snapshot.disk_free_bytes())
                ),
                measured_value: used_percent,
            });
        }
        Some(_) => {}
        None => warn!(
            metric = "disk",
            total_bytes = snapshot.disk_total_bytes,
            "zero reported capacity, skipping threshold check"
        ),
    }

    if let Some(t) = snapshot.temperature_celsius
        && t > thresholds.temperature_celsius
    {
        conditions.push(AlertCondition {
            kind: AlertKind::HighTemperature,
            message: format!("High temperature: {}°C", t),
            measured_value: t,
        });
    }

    conditions
}
