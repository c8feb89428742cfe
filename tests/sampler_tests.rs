//! Integration tests for the disk transfer rate sampler facade.
//!
//! These tests drive `DiskTransferRateSampler` and `SharedSampler` against a
//! diskstats file that is rewritten between samples.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use herakles_perf_sampler::{
    Backend, DiskTransferRateSampler, PerformanceStatistic, SamplerError, SharedSampler,
};
use tempfile::tempdir;

fn write_stats(path: &Path, reads: i64, writes: i64) {
    let content = format!(
        "   8       0 sda {reads} 0 0 0 {writes} 0 0 0 0 0 0\n   8       1 sda1 {reads} 0 0 0 {writes} 0 0 0 0 0 0\n"
    );
    fs::write(path, content).expect("Failed to write diskstats");
}

#[test]
fn test_sampler_reports_rate_from_file_growth() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("diskstats");
    write_stats(&path, 1000, 1000);

    let mut sampler = DiskTransferRateSampler::with_diskstats_path(&path).unwrap();
    assert_eq!(sampler.backend(), Backend::DiskStats);
    assert_eq!(sampler.next_value().unwrap(), 0.0);

    thread::sleep(Duration::from_millis(100));
    write_stats(&path, 1500, 1500);

    let rate = sampler.next_value().unwrap();
    // 1000 transfers over >= 100ms, partition row ignored
    assert!(rate > 0.0 && rate <= 10_000.0, "rate {rate}");
}

#[test]
fn test_sampler_surfaces_counter_reset() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("diskstats");
    write_stats(&path, 5000, 5000);

    let mut sampler = DiskTransferRateSampler::with_diskstats_path(&path).unwrap();
    sampler.next_value().unwrap();

    thread::sleep(Duration::from_millis(20));
    write_stats(&path, 10, 10);

    assert!(sampler.next_value().unwrap() < 0.0);
}

#[test]
fn test_malformed_source_yields_zero_not_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("diskstats");
    fs::write(&path, "not a diskstats file\n1 2 3\n").unwrap();

    let mut sampler = DiskTransferRateSampler::with_diskstats_path(&path).unwrap();
    assert_eq!(sampler.next_value().unwrap(), 0.0);
    thread::sleep(Duration::from_millis(10));
    assert_eq!(sampler.next_value().unwrap(), 0.0);
}

#[test]
fn test_unreadable_source_fails_construction() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = DiskTransferRateSampler::with_diskstats_path(dir.path().join("missing"));
    assert!(matches!(result, Err(SamplerError::SourceUnavailable { .. })));
}

#[test]
fn test_source_removed_after_construction_errors() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("diskstats");
    write_stats(&path, 1, 1);

    let mut sampler = DiskTransferRateSampler::with_diskstats_path(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(matches!(
        sampler.next_value(),
        Err(SamplerError::SourceUnavailable { .. })
    ));
}

#[test]
fn test_independent_samplers_do_not_share_state() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("diskstats");
    write_stats(&path, 100, 100);

    let mut first = DiskTransferRateSampler::with_diskstats_path(&path).unwrap();
    first.next_value().unwrap();

    // A fresh sampler still bootstraps, regardless of the other one's history
    let mut second = DiskTransferRateSampler::with_diskstats_path(&path).unwrap();
    assert_eq!(second.next_value().unwrap(), 0.0);
}

#[test]
fn test_shared_sampler_across_threads() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("diskstats");
    write_stats(&path, 100, 100);

    let shared = SharedSampler::new(DiskTransferRateSampler::with_diskstats_path(&path).unwrap());
    assert_eq!(shared.backend().unwrap(), Backend::DiskStats);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                (0..25)
                    .map(|_| shared.next_value().expect("sample should succeed"))
                    .collect::<Vec<f32>>()
            })
        })
        .collect();

    let values: Vec<f32> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("sampler thread panicked"))
        .collect();

    assert_eq!(values.len(), 100);
    // The file never changes, so every rate is 0 (bootstrap or zero delta)
    assert!(values.iter().all(|v| *v == 0.0));
}

#[cfg(target_os = "linux")]
#[test]
fn test_host_default_sampler_on_linux() {
    if !Path::new("/proc/diskstats").exists() {
        return;
    }
    let mut sampler = DiskTransferRateSampler::new().expect("host sampler should bind");
    assert_eq!(sampler.backend(), Backend::DiskStats);
    assert_eq!(sampler.next_value().unwrap(), 0.0);
    thread::sleep(Duration::from_millis(20));
    assert!(sampler.next_value().unwrap().is_finite());
}

#[cfg(windows)]
#[test]
fn test_missing_native_counter_fails_construction() {
    use herakles_perf_sampler::{CounterPath, WindowsCounter};

    let result = WindowsCounter::new(CounterPath::new(
        "PhysicalDisk",
        "No Such Counter/sec",
        Some("_Total"),
    ));
    assert!(matches!(
        result,
        Err(SamplerError::CounterNotFound { .. }) | Err(SamplerError::Native { .. })
    ));
}
