//! Configuration management for herakles-perf-sampler.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, Commands, ConfigFormat, LogLevel, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_SAMPLES: u64 = 0;

/// Effective sampler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Statistics file for the diskstats backend (None = host default)
    #[serde(alias = "diskstats-path")]
    pub diskstats_path: Option<PathBuf>,

    /// Milliseconds between samples
    #[serde(alias = "interval-ms")]
    pub interval_ms: Option<u64>,

    /// Number of samples to take (0 = until interrupted)
    pub samples: Option<u64>,

    #[serde(alias = "output-format")]
    pub output_format: Option<OutputFormat>,

    #[serde(alias = "log-level")]
    pub log_level: Option<LogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diskstats_path: None,
            interval_ms: Some(DEFAULT_INTERVAL_MS),
            samples: Some(DEFAULT_SAMPLES),
            output_format: Some(OutputFormat::Text),
            log_level: Some(LogLevel::Info),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.interval_ms == Some(0) {
        return Err("interval_ms must be greater than 0".into());
    }

    if let Some(path) = cfg.diskstats_path.as_deref() {
        if path.as_os_str().is_empty() {
            return Err("diskstats_path is set but empty".into());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(path) = &args.diskstats_path {
        config.diskstats_path = Some(path.clone());
    }
    if let Some(interval_ms) = args.interval_ms {
        config.interval_ms = Some(interval_ms);
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(level);
    }

    if let Some(Commands::Sample { samples, format }) = &args.command {
        if samples.is_some() {
            config.samples = *samples;
        }
        if format.is_some() {
            config.output_format = *format;
        }
    }

    Ok(config)
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        p.to_path_buf()
    } else {
        // Try default locations
        let defaults = [
            "/etc/herakles/perf-sampler.yaml",
            "/etc/herakles/perf-sampler.yml",
            "/etc/herakles/perf-sampler.json",
            "/etc/herakles/perf-sampler.toml",
            "./herakles-perf-sampler.yaml",
            "./herakles-perf-sampler.yml",
            "./herakles-perf-sampler.json",
            "./herakles-perf-sampler.toml",
        ];

        match defaults.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        }
    };

    // An explicitly requested file must exist
    let content = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        // Default to YAML
        _ => serde_yaml::from_str(&content)?,
    };
    info!("Loaded configuration from: {}", path.display());

    Ok(merge_defaults(config))
}

/// Fills fields the file left out with defaults.
fn merge_defaults(cfg: Config) -> Config {
    let defaults = Config::default();
    Config {
        diskstats_path: cfg.diskstats_path.or(defaults.diskstats_path),
        interval_ms: cfg.interval_ms.or(defaults.interval_ms),
        samples: cfg.samples.or(defaults.samples),
        output_format: cfg.output_format.or(defaults.output_format),
        log_level: cfg.log_level.or(defaults.log_level),
    }
}

/// Renders configuration in the requested format
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_effective_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let cfg = Config {
            interval_ms: Some(0),
            ..Config::default()
        };
        assert!(validate_effective_config(&cfg).is_err());
    }

    #[test]
    fn test_load_yaml_with_partial_fields() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("sampler.yaml");
        fs::write(&path, "interval-ms: 250\ndiskstats_path: /tmp/diskstats\n")
            .expect("Failed to write config");

        let cfg = load_config(Some(path.as_path())).expect("config should load");
        assert_eq!(cfg.interval_ms, Some(250));
        assert_eq!(cfg.diskstats_path, Some(PathBuf::from("/tmp/diskstats")));
        assert_eq!(cfg.samples, Some(DEFAULT_SAMPLES));
        assert_eq!(cfg.output_format, Some(OutputFormat::Text));
    }

    #[test]
    fn test_load_json_and_toml() {
        let dir = tempdir().expect("Failed to create temp dir");

        let json = dir.path().join("sampler.json");
        fs::write(&json, r#"{"samples": 5, "output_format": "json"}"#).unwrap();
        let cfg = load_config(Some(json.as_path())).unwrap();
        assert_eq!(cfg.samples, Some(5));
        assert_eq!(cfg.output_format, Some(OutputFormat::Json));

        let toml_path = dir.path().join("sampler.toml");
        fs::write(&toml_path, "log_level = \"debug\"\n").unwrap();
        let cfg = load_config(Some(toml_path.as_path())).unwrap();
        assert_eq!(cfg.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(load_config(Some(dir.path().join("absent.yaml").as_path())).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("sampler.yaml");
        fs::write(&path, "interval_ms: 5000\nsamples: 2\n").unwrap();

        let args = Args::parse_from([
            "herakles-perf-sampler",
            "-c",
            path.to_str().unwrap(),
            "--interval-ms",
            "100",
            "sample",
            "-n",
            "7",
        ]);
        let cfg = resolve_config(&args).unwrap();
        assert_eq!(cfg.interval_ms, Some(100));
        assert_eq!(cfg.samples, Some(7));
    }

    #[test]
    fn test_render_round_trips_through_yaml() {
        let rendered = render_config(&Config::default(), &ConfigFormat::Yaml).unwrap();
        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed.interval_ms, Some(DEFAULT_INTERVAL_MS));
    }
}
