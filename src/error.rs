//! Error types for portprobe.
//!
//! Uses `thiserror` for ergonomic error definitions. Individual probe
//! failures are not errors here: they are captured as
//! [`ProbeOutcome`](crate::scanner::ProbeOutcome) values.

use std::path::PathBuf;
use thiserror::Error;

/// Scan-level failure. Configuration is validated before a
/// [`Scanner`](crate::scanner::Scanner) exists, so only resolution remains.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Host could not be mapped to an address.
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("no host given")]
    EmptyHost,

    #[error("failed to resolve hostname '{host}': {reason}")]
    LookupFailed { host: String, reason: String },

    #[error("no IP addresses found for hostname '{0}'")]
    NoAddresses(String),
}

/// Invalid configuration or unreadable settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("concurrency {requested} exceeds the maximum of {max}")]
    ConcurrencyTooHigh { requested: usize, max: usize },

    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),

    #[error("max port must be in 1-65535, got {0}")]
    InvalidMaxPort(u32),

    #[error("could not determine the configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Failure while persisting a finished scan.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type OutputResult<T> = Result<T, OutputError>;
