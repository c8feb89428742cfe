//! Error taxonomy for performance statistic sampling.
//!
//! Only construction-time and source-level failures are represented here.
//! Per-line parsing anomalies and degenerate rate inputs are absorbed by the
//! collectors and never surface as errors.

use std::path::PathBuf;

/// Errors raised while binding to or reading a performance statistic source.
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("Statistics source {} is unavailable: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Performance counter {path} does not exist on this host (status {status:#010x})")]
    CounterNotFound { path: String, status: u32 },

    #[error("Native counter call {operation} failed with status {status:#010x}")]
    Native {
        operation: &'static str,
        status: u32,
    },

    #[error("Sampler lock poisoned by a panicking caller")]
    LockPoisoned,
}

impl SamplerError {
    pub(crate) fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SamplerError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, SamplerError>;
