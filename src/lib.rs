//! Herakles Performance Sampler Library
//!
//! This library provides a uniform way to obtain a single scalar "current
//! value" for an operating system performance counter, regardless of which
//! OS the process runs on. The counter in scope is disk transfer throughput
//! (completed reads + writes + discards per second).
//!
//! # Features
//!
//! - **One Sampling Contract**: [`PerformanceStatistic::next_value`] for every backend
//! - **Linux**: /proc/diskstats parsing across kernel column layouts, physical devices only
//! - **Windows**: the native `\PhysicalDisk(_Total)\Disk Transfers/sec` counter
//! - **Rate Derivation**: [`RateCounter`] turns cumulative totals into per-second rates
//!
//! # Usage
//!
//! ```no_run
//! use herakles_perf_sampler::{DiskTransferRateSampler, PerformanceStatistic};
//!
//! let mut sampler = DiskTransferRateSampler::new()?;
//!
//! // The first Linux sample only seeds the rate counter and reports 0
//! let _ = sampler.next_value()?;
//! std::thread::sleep(std::time::Duration::from_secs(1));
//! println!("Disk transfers/sec: {:.1}", sampler.next_value()?);
//! # Ok::<(), herakles_perf_sampler::SamplerError>(())
//! ```
//!
//! # Rate semantics
//!
//! - First sample on a fresh counter: `0.0`
//! - Clock did not advance: `0.0`
//! - Cumulative counter went backwards: negative rate, reported as-is

pub mod collectors;
pub mod error;
pub mod platform;
pub mod rate;
pub mod sampler;
pub mod statistic;

// Re-export main types for convenience
pub use collectors::diskstats::{DeviceStatsLine, DiskStatsReader, DEFAULT_DISKSTATS_PATH};
pub use error::{Result, SamplerError};
#[cfg(windows)]
pub use platform::windows::{CounterPath, WindowsCounter};
pub use rate::{RateCounter, Sample};
pub use sampler::{Backend, DiskTransferRateSampler, SharedSampler};
pub use statistic::{CumulativeCounter, PerSecondStatistic, PerformanceStatistic};
