//! Disk transfer statistics collector.
//!
//! This module reads /proc/diskstats and sums completed transfers
//! (reads + writes + discards) across physical block devices.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SamplerError};
use crate::statistic::{CumulativeCounter, PerformanceStatistic};

/// Kernel-provided block device statistics file.
pub const DEFAULT_DISKSTATS_PATH: &str = "/proc/diskstats";

/// Minimum column count of a usable record (kernels before 4.18).
const MIN_COLUMNS: usize = 14;
/// Column count from which discard counters are present (kernel 4.18+).
const DISCARD_COLUMNS: usize = 18;

const COL_DEVICE: usize = 2;
const COL_READS_COMPLETED: usize = 3;
const COL_WRITES_COMPLETED: usize = 7;
const COL_DISCARDS_COMPLETED: usize = 14;

/// Completed transfer counters for a single device row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatsLine {
    pub device: String,
    pub reads_completed: i64,
    pub writes_completed: i64,
    /// Absent on kernels that do not report discards.
    pub discards_completed: Option<i64>,
}

impl DeviceStatsLine {
    /// Total completed transfers on this row.
    pub fn transfers(&self) -> i64 {
        self.reads_completed
            .wrapping_add(self.writes_completed)
            .wrapping_add(self.discards_completed.unwrap_or(0))
    }

    /// Partitions (sda1, nvme0n1p2, ...) end in a digit; their I/O is already
    /// counted on the parent device.
    pub fn is_partition(&self) -> bool {
        is_partition_name(&self.device)
    }
}

fn is_partition_name(device: &str) -> bool {
    device
        .chars()
        .last()
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
}

/// Parses one /proc/diskstats row.
///
/// Format: major minor name reads_completed reads_merged sectors_read ms_reading
/// writes_completed writes_merged sectors_written ms_writing ios_in_progress
/// ms_io weighted_ms_io [discards_completed discards_merged sectors_discarded
/// ms_discarding [flushes_completed ms_flushing]]
///
/// Returns `None` for short records or records with non-numeric counters.
pub fn parse_line(line: &str) -> Option<DeviceStatsLine> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_COLUMNS {
        return None;
    }

    let reads_completed = parts[COL_READS_COMPLETED].parse::<i64>().ok()?;
    let writes_completed = parts[COL_WRITES_COMPLETED].parse::<i64>().ok()?;
    let discards_completed = if parts.len() >= DISCARD_COLUMNS {
        Some(parts[COL_DISCARDS_COMPLETED].parse::<i64>().ok()?)
    } else {
        None
    };

    Some(DeviceStatsLine {
        device: parts[COL_DEVICE].to_string(),
        reads_completed,
        writes_completed,
        discards_completed,
    })
}

/// Parses every usable row that belongs to a physical device.
pub fn physical_devices(content: &str) -> Vec<DeviceStatsLine> {
    content
        .lines()
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() && !line.trim().is_empty() {
                debug!("Skipping malformed diskstats line: {:?}", line);
            }
            parsed
        })
        .filter(|stats| !stats.is_partition())
        .collect()
}

/// Sums reads + writes + discards across physical devices only.
pub fn sum_physical_transfers(content: &str) -> i64 {
    physical_devices(content)
        .iter()
        .fold(0i64, |total, stats| total.wrapping_add(stats.transfers()))
}

/// Cumulative disk transfer counter backed by a diskstats file.
#[derive(Debug, Clone)]
pub struct DiskStatsReader {
    path: PathBuf,
}

impl DiskStatsReader {
    /// Binds to `path`, failing if it cannot be opened for reading.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        File::open(&path).map_err(|e| SamplerError::source_unavailable(&path, e))?;
        debug!("Disk statistics source bound to {}", path.display());
        Ok(Self { path })
    }

    /// Binds to the kernel's /proc/diskstats.
    pub fn system() -> Result<Self> {
        Self::open(DEFAULT_DISKSTATS_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_content(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| SamplerError::source_unavailable(&self.path, e))
    }

    /// Reads the source and returns completed transfers since boot.
    pub fn read_cumulative_transfers(&self) -> Result<i64> {
        Ok(sum_physical_transfers(&self.read_content()?))
    }

    /// Reads the source and returns the per-device breakdown.
    pub fn read_devices(&self) -> Result<Vec<DeviceStatsLine>> {
        Ok(physical_devices(&self.read_content()?))
    }
}

impl CumulativeCounter for DiskStatsReader {
    fn read_cumulative(&mut self) -> Result<i64> {
        self.read_cumulative_transfers()
    }
}

/// The raw cumulative total as a statistic of its own.
impl PerformanceStatistic for DiskStatsReader {
    fn next_value(&mut self) -> Result<f32> {
        Ok(self.read_cumulative_transfers()? as f32)
    }
}
