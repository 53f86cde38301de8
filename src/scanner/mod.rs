//! Scan orchestration.
//!
//! Schedules one probe per port, admits them through a
//! [`ConcurrencyLimiter`], and collects outcomes in completion order into a
//! [`ScanResult`]. Every probe is individually time-bounded, so a scan
//! always terminates without a global deadline.

mod limiter;
mod probe;
mod result;

pub use limiter::{ConcurrencyLimiter, LimiterStats, Slot};
pub use probe::{probe, Prober, TcpConnectProber};
pub use result::{OpenPort, PortOutcome, ProbeOutcome, ScanResult, ScanStatus, Tally};

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::report::Reporter;
use crate::resolver::Resolve;
use crate::types::{Port, PortRange, ScanId, Target};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

/// Concurrent port scanner.
///
/// Owns the configuration, the prober and the admission gate. The gate is
/// shared by every scan run through this scanner.
pub struct Scanner<P = TcpConnectProber> {
    config: ScanConfig,
    prober: Arc<P>,
    limiter: ConcurrencyLimiter,
}

impl Scanner<TcpConnectProber> {
    /// Scanner using real TCP connect probes with the configured timeout.
    pub fn new(config: ScanConfig) -> Self {
        let prober = TcpConnectProber::new(config.timeout());
        Self::with_prober(config, prober)
    }
}

impl<P: Prober> Scanner<P> {
    pub fn with_prober(config: ScanConfig, prober: P) -> Self {
        let limiter = ConcurrencyLimiter::new(config.concurrency());
        Self {
            config,
            prober: Arc::new(prober),
            limiter,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Resolve `host`, then scan `1..=max_port` on it.
    ///
    /// Resolution failure is the only error: it is returned before any
    /// probe is scheduled.
    pub async fn scan_host<R>(
        &self,
        resolver: &R,
        host: &str,
        reporter: &mut dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<ScanResult, ScanError>
    where
        R: Resolve + ?Sized,
    {
        let target = resolver.resolve(host).await?;
        let ports = self.config.ports();
        Ok(self.scan(target, &ports, reporter, cancel).await)
    }

    /// Probe every port in `ports` on `target`.
    ///
    /// All probes are submitted up front and throttled by the limiter.
    /// Returns once every probe has produced an outcome. If `cancel` fires,
    /// probes not yet admitted are skipped, admitted ones run to their own
    /// timeout, and the result is marked partial.
    pub async fn scan(
        &self,
        target: Target,
        ports: &PortRange,
        reporter: &mut dyn Reporter,
        cancel: &CancellationToken,
    ) -> ScanResult {
        let id = ScanId::new();
        let span = info_span!("scan", %id, target = %target.addr());
        self.run(id, target, ports, reporter, cancel)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        id: ScanId,
        target: Target,
        ports: &PortRange,
        reporter: &mut dyn Reporter,
        cancel: &CancellationToken,
    ) -> ScanResult {
        info!(
            ports = ports.len(),
            concurrency = self.limiter.max(),
            timeout_ms = self.config.timeout().as_millis() as u64,
            "starting scan"
        );
        reporter.on_start(&target, ports);

        let started = Instant::now();
        let mut result = ScanResult::begin(id, target.clone(), ports.len());
        let mut tasks = JoinSet::new();
        let mut task_ports = HashMap::with_capacity(ports.len());

        for port in ports.iter() {
            let handle = tasks.spawn(
                admit_and_probe(
                    Arc::clone(&self.prober),
                    self.limiter.clone(),
                    cancel.clone(),
                    target.socket_addr(port),
                )
                .in_current_span(),
            );
            task_ports.insert(handle.id(), port);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (port, outcome) = match joined {
                Ok((task, outcome)) => (task_ports.remove(&task), outcome),
                Err(e) => {
                    warn!(error = %e, "probe task failed");
                    let reason = if e.is_panic() {
                        "probe panicked"
                    } else {
                        "probe cancelled"
                    };
                    (
                        task_ports.remove(&e.id()),
                        Some(ProbeOutcome::Error(reason.to_string())),
                    )
                }
            };
            let (Some(port), Some(outcome)) = (port, outcome) else {
                continue;
            };
            reporter.on_outcome(port, &outcome);
            result.record(port, outcome);
        }

        let result = result.finish(started.elapsed());
        let tally = result.tally();
        let stats = self.limiter.stats();
        if result.is_partial() {
            warn!(
                probed = result.probed(),
                requested = result.requested(),
                "scan interrupted, result is partial"
            );
        }
        info!(
            open = tally.open,
            closed = tally.closed,
            timeout = tally.timeout,
            error = tally.error,
            elapsed_ms = result.elapsed().as_millis() as u64,
            "scan finished"
        );
        debug!(peak_in_flight = stats.peak_in_flight, "limiter usage");

        reporter.on_finish(&result);
        result
    }
}

/// Wait for a slot, then probe. Returns `None` if cancelled before
/// admission, in which case no connection is attempted. A limiter that
/// refuses admission yields an `Error` outcome for the port.
async fn admit_and_probe<P: Prober>(
    prober: Arc<P>,
    limiter: ConcurrencyLimiter,
    cancel: CancellationToken,
    addr: std::net::SocketAddr,
) -> Option<ProbeOutcome> {
    let slot = tokio::select! {
        biased;
        _ = cancel.cancelled() => return None,
        slot = limiter.acquire() => match slot {
            Ok(slot) => slot,
            Err(e) => {
                warn!(%addr, error = %e, "limiter refused admission");
                return Some(ProbeOutcome::Error("limiter closed".to_string()));
            }
        },
    };
    let outcome = prober.probe(addr).await;
    drop(slot);
    Some(outcome)
}

/// Ports in `ports` that did not produce an outcome in `result`.
pub fn unprobed_ports(result: &ScanResult, ports: &PortRange) -> Vec<Port> {
    let done: std::collections::HashSet<Port> =
        result.outcomes().iter().map(|o| o.port).collect();
    ports.iter().filter(|p| !done.contains(p)).collect()
}
