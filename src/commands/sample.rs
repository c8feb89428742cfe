//! Sample command implementation.
//!
//! Samples the disk transfer rate at a fixed interval and prints one record
//! per sample.

use std::time::Duration;

use chrono::{DateTime, Utc};
use herakles_perf_sampler::{Backend, DiskTransferRateSampler, PerformanceStatistic};
use serde::Serialize;
use tokio::{signal, time};
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::config::{Config, DEFAULT_INTERVAL_MS, DEFAULT_SAMPLES};

/// One printed sample.
#[derive(Debug, Serialize)]
pub struct SampleRecord {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub backend: Backend,
    pub transfers_per_sec: f32,
}

impl SampleRecord {
    fn render(&self, format: OutputFormat) -> Result<String, Box<dyn std::error::Error>> {
        Ok(match format {
            OutputFormat::Text => format!(
                "{}  #{:<5} {:<14} {:>12.2} transfers/s",
                self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                self.index,
                self.backend.to_string(),
                self.transfers_per_sec
            ),
            OutputFormat::Json => serde_json::to_string(self)?,
            OutputFormat::Yaml => format!("---\n{}", serde_yaml::to_string(self)?.trim_end()),
        })
    }
}

/// Binds the sampler the configuration asks for.
pub fn open_sampler(
    config: &Config,
) -> Result<DiskTransferRateSampler, herakles_perf_sampler::SamplerError> {
    match &config.diskstats_path {
        Some(path) => DiskTransferRateSampler::with_diskstats_path(path),
        None => DiskTransferRateSampler::new(),
    }
}

/// Samples until the configured count is reached or Ctrl+C is received.
pub async fn command_sample(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let interval_ms = config.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS);
    let limit = config.samples.unwrap_or(DEFAULT_SAMPLES);
    let format = config.output_format.unwrap_or(OutputFormat::Text);

    let mut sampler = open_sampler(config)?;
    info!(
        "Sampling {} every {}ms ({})",
        sampler.source_name(),
        interval_ms,
        if limit == 0 {
            "until interrupted".to_string()
        } else {
            format!("{} samples", limit)
        }
    );

    let mut ticker = time::interval(Duration::from_millis(interval_ms));
    let mut index = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = signal::ctrl_c() => {
                info!("Received SIGINT (Ctrl+C), stopping after {} samples", index);
                break;
            }
        }

        index += 1;
        let record = SampleRecord {
            index,
            timestamp: Utc::now(),
            backend: sampler.backend(),
            transfers_per_sec: sampler.next_value()?,
        };
        debug!("Sample {}: {}", index, record.transfers_per_sec);
        println!("{}", record.render(format)?);

        if limit != 0 && index >= limit {
            break;
        }
    }

    Ok(())
}
