// Sampler tests: mount resolution and a live snapshot smoke check

use hostmon::config::MonitoringConfig;
use hostmon::error::SamplingError;
use hostmon::sysinfo_repo::{SysinfoRepo, disk_index_for_mount};
use std::path::Path;

#[test]
fn disk_index_exact_mount_wins() {
    let mounts = [Path::new("/"), Path::new("/home")];
    assert_eq!(disk_index_for_mount(&mounts, Path::new("/home")), Some(1));
    assert_eq!(disk_index_for_mount(&mounts, Path::new("/")), Some(0));
}

#[test]
fn disk_index_falls_back_to_deepest_prefix() {
    let mounts = [Path::new("/"), Path::new("/home")];
    assert_eq!(
        disk_index_for_mount(&mounts, Path::new("/home/user/data")),
        Some(1)
    );
    assert_eq!(disk_index_for_mount(&mounts, Path::new("/var/log")), Some(0));
}

#[test]
fn disk_index_none_without_covering_mount() {
    let mounts = [Path::new("/mnt/a")];
    assert_eq!(disk_index_for_mount(&mounts, Path::new("/data")), None);
    let no_mounts: [&Path; 0] = [];
    assert_eq!(disk_index_for_mount(&no_mounts, Path::new("/")), None);
}

#[tokio::test]
async fn sysinfo_repo_snapshot_is_internally_consistent() {
    let repo = SysinfoRepo::new(&MonitoringConfig {
        cpu_sample_ms: 20,
        ..Default::default()
    });
    match repo.sample().await {
        Ok(s) => {
            assert!((0.0..=100.0).contains(&s.cpu_percent));
            assert!(s.ram_total_bytes > 0);
            assert!(s.ram_used_bytes <= s.ram_total_bytes);
            assert!(s.disk_used_bytes <= s.disk_total_bytes);
            assert!(s.uptime_seconds >= 0.0);
        }
        // Bare containers may expose no mounted disks at all.
        Err(SamplingError::DiskNotFound(_)) => {}
        Err(e) => panic!("sample failed: {e}"),
    }
}
