// Prometheus registry for the exported system gauges.

use crate::models::{MetricSnapshot, bytes_to_gb};
use prometheus::{Encoder, Gauge, Registry, TextEncoder};
use std::sync::RwLock;

/// State guarded by one lock so a render never observes a half-applied
/// snapshot. The temperature gauge lives here because it is registered on
/// first reading; sensorless hosts never export the series.
struct RegistryState {
    latest: Option<MetricSnapshot>,
    temperature: Option<Gauge>,
}

/// Owns the Prometheus registry and the gauges derived from each snapshot.
///
/// Byte quantities are exported in decimal gigabytes and uptime in hours,
/// matching the gauge help strings.
pub struct MetricsRegistry {
    registry: Registry,
    cpu_usage: Gauge,
    ram_used: Gauge,
    ram_total: Gauge,
    disk_used: Gauge,
    disk_total: Gauge,
    uptime_hours: Gauge,
    state: RwLock<RegistryState>,
}

impl MetricsRegistry {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();
        let cpu_usage = Gauge::new("system_cpu_usage", "CPU usage percentage")?;
        let ram_used = Gauge::new("system_ram_used", "Used RAM in GB")?;
        let ram_total = Gauge::new("system_ram_total", "Total RAM in GB")?;
        let disk_used = Gauge::new("system_disk_used", "Used disk space in GB")?;
        let disk_total = Gauge::new("system_disk_total", "Total disk space in GB")?;
        let uptime_hours = Gauge::new("system_uptime_hours", "System uptime in hours")?;
        for gauge in [
            &cpu_usage,
            &ram_used,
            &ram_total,
            &disk_used,
            &disk_total,
            &uptime_hours,
        ] {
            registry.register(Box::new(gauge.clone()))?;
        }
        Ok(Self {
            registry,
            cpu_usage,
            ram_used,
            ram_total,
            disk_used,
            disk_total,
            uptime_hours,
            state: RwLock::new(RegistryState {
                latest: None,
                temperature: None,
            }),
        })
    }

    /// Applies one snapshot to every gauge atomically with respect to
    /// [`render`](Self::render).
    pub fn update(&self, snapshot: &MetricSnapshot) -> anyhow::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| anyhow::anyhow!("registry lock poisoned: {}", e))?;
        self.cpu_usage.set(snapshot.cpu_percent);
        self.ram_used.set(bytes_to_gb(snapshot.ram_used_bytes));
        self.ram_total.set(bytes_to_gb(snapshot.ram_total_bytes));
        self.disk_used.set(bytes_to_gb(snapshot.disk_used_bytes));
        self.disk_total.set(bytes_to_gb(snapshot.disk_total_bytes));
        self.uptime_hours.set(snapshot.uptime_seconds / 3600.0);
        if let Some(t) = snapshot.temperature_celsius {
            if state.temperature.is_none() {
                let gauge = Gauge::new("system_temperature_celsius", "CPU temperature in Celsius")?;
                self.registry.register(Box::new(gauge.clone()))?;
                state.temperature = Some(gauge);
            }
            if let Some(gauge) = &state.temperature {
                gauge.set(t);
            }
        }
        state.latest = Some(*snapshot);
        Ok(())
    }

    /// Renders the Prometheus text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let families = {
            let _guard = self
                .state
                .read()
                .map_err(|e| anyhow::anyhow!("registry lock poisoned: {}", e))?;
            self.registry.gather()
        };
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Most recently applied snapshot, if any tick has completed yet.
    pub fn latest(&self) -> anyhow::Result<Option<MetricSnapshot>> {
        let state = self
            .state
            .read()
            .map_err(|e| anyhow::anyhow!("registry lock poisoned: {}", e))?;
        Ok(state.latest)
    }
}
