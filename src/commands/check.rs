//! Check command implementation.
//!
//! Validates that the statistics source can be bound and read.

use herakles_perf_sampler::{Backend, DiskStatsReader, DEFAULT_DISKSTATS_PATH};

use crate::commands::sample::open_sampler;
use crate::config::{validate_effective_config, Config};

/// Validates the sampling source and configuration.
pub fn command_check(verbose: bool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Herakles Performance Sampler - System Check");
    println!("==============================================");

    let mut all_ok = true;

    println!("\n💽 Checking disk transfer source...");
    match open_sampler(config) {
        Ok(sampler) => {
            println!(
                "   ✅ Bound {} backend: {}",
                sampler.backend(),
                sampler.source_name()
            );

            if sampler.backend() == Backend::DiskStats {
                let path = config
                    .diskstats_path
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DISKSTATS_PATH.into());
                all_ok &= check_diskstats(&DiskStatsReader::open(path)?, verbose);
            }
        }
        Err(e) => {
            println!("   ❌ Cannot bind sampler: {}", e);
            all_ok = false;
        }
    }

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - sampler is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}

/// Reads the diskstats source once and reports what it contains.
fn check_diskstats(reader: &DiskStatsReader, verbose: bool) -> bool {
    match reader.read_devices() {
        Ok(devices) => {
            if devices.is_empty() {
                println!("   ⚠️  No physical devices found (rates will be 0)");
            } else {
                println!("   ✅ {} physical devices", devices.len());
            }

            if verbose {
                for device in &devices {
                    println!(
                        "   ├─ {:<12} reads={} writes={} discards={}",
                        device.device,
                        device.reads_completed,
                        device.writes_completed,
                        device
                            .discards_completed
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "n/a".to_string())
                    );
                }
            }

            let total: i64 = devices.iter().map(|d| d.transfers()).sum();
            println!("   📊 Cumulative transfers since boot: {}", total);
            true
        }
        Err(e) => {
            println!("   ❌ Failed to read {}: {}", reader.path().display(), e);
            false
        }
    }
}
