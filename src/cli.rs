//! CLI arguments and subcommands for herakles-perf-sampler.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Output format for sample records
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "herakles-perf-sampler",
    about = "Cross-platform disk transfer rate sampler",
    long_about = "Cross-platform disk transfer rate sampler.\n\n\
                  Samples completed disk transfers per second from /proc/diskstats on Linux \
                  or the native PhysicalDisk performance counter on Windows.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (overrides config file)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Read disk statistics from this file instead of the host default
    #[arg(long)]
    pub diskstats_path: Option<PathBuf>,

    /// Interval between samples in milliseconds
    #[arg(short = 'i', long)]
    pub interval_ms: Option<u64>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample the disk transfer rate repeatedly
    Sample {
        /// Number of samples to take (0 = until Ctrl+C)
        #[arg(short = 'n', long)]
        samples: Option<u64>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Validate that the statistics source is readable and list devices
    Check {
        /// Show per-device transfer counters
        #[arg(long)]
        verbose: bool,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_subcommand() {
        let args = Args::parse_from([
            "herakles-perf-sampler",
            "--interval-ms",
            "250",
            "sample",
            "-n",
            "3",
            "--format",
            "json",
        ]);
        assert_eq!(args.interval_ms, Some(250));
        match args.command {
            Some(Commands::Sample { samples, format }) => {
                assert_eq!(samples, Some(3));
                assert_eq!(format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_defaults() {
        let args = Args::parse_from(["herakles-perf-sampler"]);
        assert!(args.command.is_none());
        assert!(args.log_level.is_none());
        assert!(!args.no_config);
    }
}
