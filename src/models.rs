// Domain values: one sampled snapshot and the alert conditions derived from it

/// Decimal gigabyte, the unit every byte-valued gauge is exported in.
pub const BYTES_PER_GB: f64 = 1_000_000_000.0;

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// One consistent point-in-time read of all sampled metrics.
/// Produced fresh each scheduler tick and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSnapshot {
    /// Global CPU utilization in [0, 100].
    pub cpu_percent: f64,
    pub ram_used_bytes: u64,
    pub ram_total_bytes: u64,
    pub disk_used_bytes: u64,
    pub disk_total_bytes: u64,
    pub uptime_seconds: f64,
    /// Best-effort sensor reading; `None` when the host has no usable sensor.
    pub temperature_celsius: Option<f64>,
}

impl MetricSnapshot {
    /// RAM usage as a percentage, or `None` when the reported total is zero.
    pub fn ram_used_percent(&self) -> Option<f64> {
        percent(self.ram_used_bytes, self.ram_total_bytes)
    }

    /// Disk usage as a percentage, or `None` when the reported total is zero.
    pub fn disk_used_percent(&self) -> Option<f64> {
        percent(self.disk_used_bytes, self.disk_total_bytes)
    }

    pub fn disk_free_bytes(&self) -> u64 {
        self.disk_total_bytes.saturating_sub(self.disk_used_bytes)
    }
}

fn percent(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some((used as f64 / total as f64) * 100.0)
}

/// The four alert categories, in their fixed evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    HighCpu,
    HighRam,
    LowDisk,
    HighTemperature,
}

impl AlertKind {
    /// Short form used in log fields.
    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::HighCpu => "cpu",
            AlertKind::HighRam => "ram",
            AlertKind::LowDisk => "disk",
            AlertKind::HighTemperature => "temperature",
        }
    }

    /// Human phrase used in cleared notices.
    pub fn describe(&self) -> &'static str {
        match self {
            AlertKind::HighCpu => "high CPU usage",
            AlertKind::HighRam => "high RAM usage",
            AlertKind::LowDisk => "low disk space",
            AlertKind::HighTemperature => "high temperature",
        }
    }
}

/// One triggered threshold, produced per tick and consumed immediately.
/// `measured_value` is the quantity that was compared against the threshold
/// (CPU %, RAM used %, disk used %, degrees Celsius).
#[derive(Debug, Clone, PartialEq)]
pub struct AlertCondition {
    pub kind: AlertKind,
    pub message: String,
    pub measured_value: f64,
}
