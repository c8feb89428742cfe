//! CLI command implementations for herakles-perf-sampler.
//!
//! This module provides implementations for all CLI subcommands:
//! - `sample`: Periodic disk transfer rate sampling
//! - `check`: Statistics source validation
//! - `config`: Configuration file generation

pub mod check;
pub mod config;
pub mod sample;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use sample::command_sample;
