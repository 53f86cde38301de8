//! TCP connect probe.
//!
//! Performs one connection attempt per port using the operating system's
//! socket API. The handshake is the whole exchange: no data is sent or
//! read, and the socket is released as soon as the outcome is known.

use super::result::ProbeOutcome;
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Executes one bounded connection attempt and classifies it.
///
/// This is the seam the orchestrator schedules; tests substitute their own
/// implementations to control timing.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, addr: SocketAddr) -> ProbeOutcome;
}

/// TCP connect prober. Does not require elevated privileges.
#[derive(Debug, Clone)]
pub struct TcpConnectProber {
    timeout: Duration,
}

impl TcpConnectProber {
    /// Create a prober whose attempts are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, addr: SocketAddr) -> ProbeOutcome {
        probe(addr, self.timeout).await
    }
}

/// Attempt a single TCP handshake with `addr`, giving up after `limit`.
///
/// Never retries and never blocks past `limit`.
pub async fn probe(addr: SocketAddr, limit: Duration) -> ProbeOutcome {
    let outcome = match timeout(limit, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            ProbeOutcome::Open
        }
        Ok(Err(e)) => classify_connect_error(&e),
        Err(_) => ProbeOutcome::Timeout,
    };

    if let ProbeOutcome::Error(ref reason) = outcome {
        debug!(%addr, reason, "probe failed");
    } else {
        trace!(%addr, %outcome, "probe finished");
    }
    outcome
}

/// Map a connect error onto a probe outcome.
fn classify_connect_error(err: &io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ProbeOutcome::Closed,
        io::ErrorKind::TimedOut => ProbeOutcome::Timeout,
        _ if is_unreachable(err) => ProbeOutcome::Closed,
        _ => ProbeOutcome::Error(err.to_string()),
    }
}

#[cfg(unix)]
fn is_unreachable(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::EHOSTUNREACH) | Some(libc::ENETUNREACH)
    )
}

#[cfg(windows)]
fn is_unreachable(err: &io::Error) -> bool {
    // WSAENETUNREACH, WSAEHOSTUNREACH
    matches!(err.raw_os_error(), Some(10051) | Some(10065))
}

#[cfg(not(any(unix, windows)))]
fn is_unreachable(_err: &io::Error) -> bool {
    false
}
