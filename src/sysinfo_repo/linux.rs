// Linux-specific helpers: sysfs thermal zones.

use super::TemperatureProbe;

/// Read a CPU temperature from /sys/class/thermal/thermal_zone*/temp (Linux,
/// millidegrees). Fallback for hosts where sysinfo lists no component sensors.
pub(super) fn read_thermal_zone() -> TemperatureProbe {
    #[cfg(target_os = "linux")]
    {
        let entries = match std::fs::read_dir("/sys/class/thermal") {
            Ok(entries) => entries,
            Err(_) => return TemperatureProbe::Unsupported,
        };
        let mut zones: Vec<std::path::PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("thermal_zone"))
            })
            .collect();
        if zones.is_empty() {
            return TemperatureProbe::Unsupported;
        }
        zones.sort();
        for zone in &zones {
            if let Ok(content) = std::fs::read_to_string(zone.join("temp"))
                && let Ok(millidegrees) = content.trim().parse::<i64>()
            {
                return TemperatureProbe::Sample(millidegrees as f64 / 1000.0);
            }
        }
        TemperatureProbe::Unavailable("thermal zones present but unreadable".to_string())
    }
    #[cfg(not(target_os = "linux"))]
    TemperatureProbe::Unsupported
}
