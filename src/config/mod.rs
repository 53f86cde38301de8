//! Configuration management for portprobe.
//!
//! `ScanConfig` is the validated, explicit configuration of one scan.
//! `AppSettings` supplies optional defaults from an XDG-located file.

mod scan;
mod settings;

pub use scan::{ScanConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_PORT, DEFAULT_TIMEOUT_SECS};
pub use settings::{AppSettings, Paths};
