//! Validated per-scan configuration.
//!
//! Built once from CLI flags and settings, then handed to the
//! [`Scanner`](crate::scanner::Scanner) by value.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Port, PortRange};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Default number of probes allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 300;
/// Default per-probe connect timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 0.35;
/// Default highest port probed.
pub const DEFAULT_MAX_PORT: u16 = 4999;

const DEFAULT_MAX: Port = match Port::new(DEFAULT_MAX_PORT) {
    Some(port) => port,
    None => panic!("default max port must be non-zero"),
};

/// Configuration for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    concurrency: usize,
    timeout: Duration,
    max_port: Port,
}

impl ScanConfig {
    /// Validate raw values into a configuration.
    ///
    /// `timeout_secs` must be finite and strictly positive, `concurrency`
    /// within 1 and [`Semaphore::MAX_PERMITS`], and `max_port` within
    /// 1-65535.
    pub fn new(concurrency: usize, timeout_secs: f64, max_port: u32) -> ConfigResult<Self> {
        if concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if concurrency > Semaphore::MAX_PERMITS {
            return Err(ConfigError::ConcurrencyTooHigh {
                requested: concurrency,
                max: Semaphore::MAX_PERMITS,
            });
        }
        let timeout = Duration::try_from_secs_f64(timeout_secs)
            .ok()
            .filter(|t| !t.is_zero())
            .ok_or(ConfigError::InvalidTimeout(timeout_secs))?;
        let max_port = Port::try_from(max_port).map_err(|_| ConfigError::InvalidMaxPort(max_port))?;

        Ok(Self {
            concurrency,
            timeout,
            max_port,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_port(&self) -> Port {
        self.max_port
    }

    /// The ports this configuration scans: always `1..=max_port`.
    pub fn ports(&self) -> PortRange {
        PortRange::up_to(self.max_port)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_millis(350),
            max_port: DEFAULT_MAX,
        }
    }
}
