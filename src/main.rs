//! herakles-perf-sampler - version 0.1.0
//!
//! Cross-platform disk transfer rate sampler with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_config, command_sample};
use config::{resolve_config, show_config, validate_effective_config, Config};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config) {
    let level = config.log_level.unwrap_or(LogLevel::Info);
    let max_level = match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    // Logs go to stderr so sample records on stdout stay machine-readable
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", level);
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    if args.check_config {
        if let Err(e) = validate_effective_config(&config) {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        return Ok(());
    }

    if args.show_config {
        return show_config(&config, args.config_format);
    }

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&config);

    match &args.command {
        Some(Commands::Check { verbose }) => command_check(*verbose, &config),
        Some(Commands::Config {
            output,
            format,
            commented,
        }) => command_config(output.clone(), format.clone(), *commented),
        Some(Commands::Sample { .. }) | None => {
            info!("Starting herakles-perf-sampler");
            command_sample(&config).await
        }
    }
}
