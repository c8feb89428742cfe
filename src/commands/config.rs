//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("herakles-perf-sampler.yaml"),
    };

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Herakles Performance Sampler Configuration
# ==========================================
#
# Source
# ------
# diskstats_path: null         # Statistics file (null = /proc/diskstats on Linux,
#                              # native PhysicalDisk counter on Windows)
#
# Sampling
# --------
# interval_ms: 1000            # Milliseconds between samples
# samples: 0                   # Samples to take (0 = until Ctrl+C)
# output_format: "text"        # text, json, yaml
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_commented_yaml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("out.yaml");

        command_config(Some(path.clone()), ConfigFormat::Yaml, true).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Herakles Performance Sampler Configuration"));
        let parsed: Config = serde_yaml::from_str(&written).unwrap();
        assert_eq!(parsed.interval_ms, Some(1000));
    }
}
