// System sampling via sysinfo

mod linux;

use crate::config::MonitoringConfig;
use crate::error::SamplingError;
use crate::models::MetricSnapshot;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sysinfo::{Components, Disks, System};
use tracing::instrument;

pub struct SysinfoRepo {
    sys: Arc<Mutex<System>>,
    disks: Arc<Mutex<Disks>>,
    components: Arc<Mutex<Components>>,
    disk_mount: PathBuf,
    cpu_sample: Duration,
}

impl SysinfoRepo {
    pub fn new(config: &MonitoringConfig) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let disks = Disks::new_with_refreshed_list();
        let components = Components::new_with_refreshed_list();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            disks: Arc::new(Mutex::new(disks)),
            components: Arc::new(Mutex::new(components)),
            disk_mount: PathBuf::from(&config.disk_mount),
            cpu_sample: Duration::from_millis(config.cpu_sample_ms),
        }
    }

    /// Collects one consistent snapshot of all watched metrics.
    ///
    /// CPU utilization is delta-based: refresh, hold the measurement window,
    /// refresh again. That blocks the worker thread for `cpu_sample_ms`; the
    /// scheduler's absolute-deadline ticking absorbs it.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "sample"))]
    pub async fn sample(&self) -> Result<MetricSnapshot, SamplingError> {
        let sys = self.sys.clone();
        let disks = self.disks.clone();
        let components = self.components.clone();
        let disk_mount = self.disk_mount.clone();
        let cpu_sample = self.cpu_sample;
        tokio::task::spawn_blocking(move || {
            let (cpu_percent, ram_used_bytes, ram_total_bytes, uptime_seconds) = {
                let mut sys = sys
                    .lock()
                    .map_err(|e| SamplingError::Platform(format!("sysinfo lock poisoned: {}", e)))?;
                sys.refresh_cpu_all();
                std::thread::sleep(cpu_sample.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
                sys.refresh_cpu_all();
                let cpu = (sys.global_cpu_usage() as f64).clamp(0.0, 100.0);

                sys.refresh_memory();
                let total = sys.total_memory();
                let used = total.saturating_sub(sys.available_memory());
                (cpu, used, total, System::uptime() as f64)
            };

            let (disk_used_bytes, disk_total_bytes) = {
                let mut disks = disks.lock().map_err(|e| {
                    SamplingError::Platform(format!("sysinfo disks lock poisoned: {}", e))
                })?;
                disks.refresh(false);
                let list = disks.list();
                let mounts: Vec<&Path> = list.iter().map(|d| d.mount_point()).collect();
                let idx = disk_index_for_mount(&mounts, &disk_mount)
                    .ok_or_else(|| SamplingError::DiskNotFound(disk_mount.display().to_string()))?;
                let total = list[idx].total_space();
                (total.saturating_sub(list[idx].available_space()), total)
            };

            let temperature_celsius = {
                let mut components = components.lock().map_err(|e| {
                    SamplingError::Platform(format!("sysinfo components lock poisoned: {}", e))
                })?;
                match probe_temperature(&mut components) {
                    TemperatureProbe::Sample(t) => Some(t),
                    TemperatureProbe::Unsupported => {
                        tracing::debug!(operation = "sample", "no temperature sensor on this host");
                        None
                    }
                    TemperatureProbe::Unavailable(reason) => {
                        tracing::warn!(
                            operation = "sample",
                            reason = %reason,
                            "temperature read failed for this tick"
                        );
                        None
                    }
                }
            };

            Ok(MetricSnapshot {
                cpu_percent,
                ram_used_bytes,
                ram_total_bytes,
                disk_used_bytes,
                disk_total_bytes,
                uptime_seconds,
                temperature_celsius,
            })
        })
        .await
        .map_err(|e| SamplingError::Platform(format!("sampler task join: {}", e)))?
    }
}

/// Outcome of one temperature probe. A host with no sensor source at all is
/// `Unsupported`; a source that exists but failed this read is `Unavailable`.
pub(crate) enum TemperatureProbe {
    Sample(f64),
    Unsupported,
    Unavailable(String),
}

fn probe_temperature(components: &mut Components) -> TemperatureProbe {
    components.refresh(true);
    let list = components.list();
    // Prefer the coretemp driver; fall back to any sensor that reports.
    let preferred = list
        .iter()
        .find(|c| c.label().to_ascii_lowercase().contains("coretemp"))
        .and_then(|c| c.temperature());
    if let Some(t) = preferred {
        return TemperatureProbe::Sample(t as f64);
    }
    if let Some(t) = list.iter().find_map(|c| c.temperature()) {
        return TemperatureProbe::Sample(t as f64);
    }
    linux::read_thermal_zone()
}

/// Index of the disk whose mount point serves `target`: an exact match wins,
/// else the deepest mount that is a prefix of the path.
pub fn disk_index_for_mount(mounts: &[&Path], target: &Path) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, mount) in mounts.iter().enumerate() {
        if *mount == target {
            return Some(i);
        }
        if target.starts_with(mount) {
            let depth = mount.components().count();
            if best.is_none_or(|(_, d)| depth > d) {
                best = Some((i, depth));
            }
        }
    }
    best.map(|(i, _)| i)
}
