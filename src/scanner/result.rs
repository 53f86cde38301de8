//! Probe outcomes and the accumulated result of a scan.

use crate::services::{service_name, Protocol};
use crate::types::{Port, ScanId, Target};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Classification of a single connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Handshake completed before the timeout.
    Open,
    /// Actively refused, or the host/network was reported unreachable.
    Closed,
    /// No answer before the timeout.
    Timeout,
    /// Any other failure, e.g. descriptor exhaustion or permission denied.
    Error(String),
}

impl ProbeOutcome {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Timeout => write!(f, "timeout"),
            Self::Error(reason) => write!(f, "error: {}", reason),
        }
    }
}

/// One port paired with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortOutcome {
    pub port: Port,
    pub outcome: ProbeOutcome,
}

/// An open port with its service label. This is the persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpenPort {
    pub port: u16,
    pub service: String,
}

impl OpenPort {
    pub fn new(port: Port) -> Self {
        Self {
            port: port.as_u16(),
            service: service_name(port.as_u16(), Protocol::Tcp),
        }
    }
}

impl fmt::Display for OpenPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.service)
    }
}

/// Whether every requested port produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Complete,
    /// The scan was interrupted; some ports were never probed.
    Partial,
}

/// Per-classification counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub open: usize,
    pub closed: usize,
    pub timeout: usize,
    pub error: usize,
}

/// Outcomes of every completed probe in one scan, plus timing.
///
/// Outcomes are kept in completion order, which has no relation to port
/// order. Use [`ScanResult::open_ports`] for the port-ordered view.
#[derive(Debug, Clone)]
pub struct ScanResult {
    id: ScanId,
    target: Target,
    requested: usize,
    outcomes: Vec<PortOutcome>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    elapsed: Duration,
    status: ScanStatus,
}

impl ScanResult {
    pub(crate) fn begin(id: ScanId, target: Target, requested: usize) -> Self {
        let now = Utc::now();
        Self {
            id,
            target,
            requested,
            outcomes: Vec::with_capacity(requested),
            started_at: now,
            finished_at: now,
            elapsed: Duration::ZERO,
            status: ScanStatus::Complete,
        }
    }

    pub(crate) fn record(&mut self, port: Port, outcome: ProbeOutcome) {
        self.outcomes.push(PortOutcome { port, outcome });
    }

    pub(crate) fn finish(mut self, elapsed: Duration) -> Self {
        self.finished_at = Utc::now();
        self.elapsed = elapsed;
        self.status = if self.outcomes.len() < self.requested {
            ScanStatus::Partial
        } else {
            ScanStatus::Complete
        };
        self
    }

    pub fn id(&self) -> ScanId {
        self.id
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Outcomes in the order the probes completed.
    pub fn outcomes(&self) -> &[PortOutcome] {
        &self.outcomes
    }

    /// Outcome for a single port, if it was probed.
    pub fn outcome(&self, port: Port) -> Option<&ProbeOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.port == port)
            .map(|o| &o.outcome)
    }

    /// Number of ports the scan was asked to probe.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Number of ports that produced an outcome.
    pub fn probed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn is_partial(&self) -> bool {
        self.status == ScanStatus::Partial
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Wall-clock duration of the scan, measured on a monotonic clock.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Open ports with service labels, ordered by port.
    pub fn open_ports(&self) -> Vec<OpenPort> {
        let mut ports: Vec<Port> = self
            .outcomes
            .iter()
            .filter(|o| o.outcome.is_open())
            .map(|o| o.port)
            .collect();
        ports.sort_unstable();
        ports.into_iter().map(OpenPort::new).collect()
    }

    pub fn tally(&self) -> Tally {
        self.outcomes
            .iter()
            .fold(Tally::default(), |mut tally, o| {
                match o.outcome {
                    ProbeOutcome::Open => tally.open += 1,
                    ProbeOutcome::Closed => tally.closed += 1,
                    ProbeOutcome::Timeout => tally.timeout += 1,
                    ProbeOutcome::Error(_) => tally.error += 1,
                }
                tally
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn port(p: u16) -> Port {
        Port::new(p).unwrap()
    }

    fn result_with(outcomes: &[(u16, ProbeOutcome)], requested: usize) -> ScanResult {
        let target = Target::from(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let mut result = ScanResult::begin(ScanId::new(), target, requested);
        for (p, outcome) in outcomes {
            result.record(port(*p), outcome.clone());
        }
        result.finish(Duration::from_millis(5))
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ProbeOutcome::Open.to_string(), "open");
        assert_eq!(ProbeOutcome::Timeout.to_string(), "timeout");
        assert_eq!(
            ProbeOutcome::Error("too many open files".into()).to_string(),
            "error: too many open files"
        );
    }

    #[test]
    fn test_open_ports_sorted_by_port() {
        let result = result_with(
            &[
                (443, ProbeOutcome::Open),
                (23, ProbeOutcome::Closed),
                (22, ProbeOutcome::Open),
                (80, ProbeOutcome::Timeout),
            ],
            4,
        );
        let open: Vec<u16> = result.open_ports().iter().map(|o| o.port).collect();
        assert_eq!(open, vec![22, 443]);
        assert_eq!(result.open_ports()[0].to_string(), "22/ssh");
        // completion order is preserved in the raw view
        assert_eq!(result.outcomes()[0].port, port(443));
    }

    #[test]
    fn test_tally_and_status() {
        let result = result_with(
            &[
                (1, ProbeOutcome::Open),
                (2, ProbeOutcome::Closed),
                (3, ProbeOutcome::Timeout),
                (4, ProbeOutcome::Error("boom".into())),
            ],
            4,
        );
        assert_eq!(
            result.tally(),
            Tally {
                open: 1,
                closed: 1,
                timeout: 1,
                error: 1
            }
        );
        assert_eq!(result.status(), ScanStatus::Complete);
        assert_eq!(result.outcome(port(3)), Some(&ProbeOutcome::Timeout));
        assert_eq!(result.outcome(port(5)), None);
    }

    #[test]
    fn test_missing_outcomes_mark_partial() {
        let result = result_with(&[(1, ProbeOutcome::Closed)], 10);
        assert!(result.is_partial());
        assert_eq!(result.probed(), 1);
        assert_eq!(result.requested(), 10);
    }
}
