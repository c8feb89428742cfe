//! Disk transfer rate sampling facade.
//!
//! [`DiskTransferRateSampler`] is the one place that inspects the host
//! platform. It binds a backend once at construction and forwards every
//! sample request to it:
//!
//! - Windows: the native `\PhysicalDisk(_Total)\Disk Transfers/sec` counter
//! - everything else: /proc/diskstats totals differenced by a rate counter
//!
//! # Thread safety
//!
//! `next_value` takes `&mut self`, so a single sampler cannot be raced.
//! Use [`SharedSampler`] when several threads sample the same stream.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::info;

use crate::collectors::diskstats::DiskStatsReader;
use crate::error::{Result, SamplerError};
#[cfg(windows)]
use crate::platform::windows::{CounterPath, WindowsCounter};
use crate::statistic::{PerSecondStatistic, PerformanceStatistic};

/// Which measurement mechanism a sampler was bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    NativeCounter,
    DiskStats,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::NativeCounter => write!(f, "native-counter"),
            Backend::DiskStats => write!(f, "diskstats"),
        }
    }
}

enum Source {
    #[cfg(windows)]
    Native(WindowsCounter),
    DiskStats(PerSecondStatistic<DiskStatsReader>),
}

/// Disk transfers per second, measured the host's native way.
pub struct DiskTransferRateSampler {
    source: Source,
}

impl DiskTransferRateSampler {
    /// Binds the host's default disk transfer source.
    #[cfg(windows)]
    pub fn new() -> Result<Self> {
        let counter = WindowsCounter::new(CounterPath::disk_transfers_per_second())?;
        Ok(Self::bound(Source::Native(counter)))
    }

    /// Binds the host's default disk transfer source.
    #[cfg(not(windows))]
    pub fn new() -> Result<Self> {
        Ok(Self::bound(Source::DiskStats(PerSecondStatistic::new(
            DiskStatsReader::system()?,
        ))))
    }

    /// Binds the diskstats pipeline to an explicit statistics file.
    pub fn with_diskstats_path(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::bound(Source::DiskStats(PerSecondStatistic::new(
            DiskStatsReader::open(path)?,
        ))))
    }

    fn bound(source: Source) -> Self {
        let sampler = Self { source };
        match &sampler.source {
            #[cfg(windows)]
            Source::Native(counter) => {
                info!("Disk transfer sampler bound to native counter {}", counter.path())
            }
            Source::DiskStats(stat) => info!(
                "Disk transfer sampler bound to {}",
                stat.counter().path().display()
            ),
        }
        sampler
    }

    pub fn backend(&self) -> Backend {
        match &self.source {
            #[cfg(windows)]
            Source::Native(_) => Backend::NativeCounter,
            Source::DiskStats(_) => Backend::DiskStats,
        }
    }

    /// Description of the bound source (counter path or file path).
    pub fn source_name(&self) -> String {
        match &self.source {
            #[cfg(windows)]
            Source::Native(counter) => counter.path().to_string(),
            Source::DiskStats(stat) => stat.counter().path().display().to_string(),
        }
    }
}

impl PerformanceStatistic for DiskTransferRateSampler {
    fn next_value(&mut self) -> Result<f32> {
        match &mut self.source {
            #[cfg(windows)]
            Source::Native(counter) => counter.next_value(),
            Source::DiskStats(stat) => stat.next_value(),
        }
    }
}

impl fmt::Debug for DiskTransferRateSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiskTransferRateSampler")
            .field("backend", &self.backend())
            .field("source", &self.source_name())
            .finish()
    }
}

/// Cloneable, lock-guarded handle to one sampler for multi-threaded callers.
///
/// The read-modify-store of the stored sample happens under the lock, so
/// concurrent callers see a consistent sequence of rates.
#[derive(Debug, Clone)]
pub struct SharedSampler {
    inner: Arc<Mutex<DiskTransferRateSampler>>,
}

impl SharedSampler {
    pub fn new(sampler: DiskTransferRateSampler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sampler)),
        }
    }

    pub fn next_value(&self) -> Result<f32> {
        let mut sampler = self.inner.lock().map_err(|_| SamplerError::LockPoisoned)?;
        sampler.next_value()
    }

    pub fn backend(&self) -> Result<Backend> {
        let sampler = self.inner.lock().map_err(|_| SamplerError::LockPoisoned)?;
        Ok(sampler.backend())
    }
}

impl From<DiskTransferRateSampler> for SharedSampler {
    fn from(sampler: DiskTransferRateSampler) -> Self {
        Self::new(sampler)
    }
}
