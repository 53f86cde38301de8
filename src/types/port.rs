//! Port types with validation.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortRange` is the ordered, deduplicated set of ports a scan probes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(u32::from(value)))
    }
}

impl TryFrom<u32> for Port {
    type Error = PortError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("empty port range")]
    Empty,
}

/// The set of ports probed by one scan.
///
/// Always non-empty, sorted ascending and free of duplicates. Immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRange {
    ports: Vec<Port>,
}

impl PortRange {
    /// All ports from 1 up to and including `max`.
    pub fn up_to(max: Port) -> Self {
        Self {
            ports: (Port::MIN..=max.as_u16()).map(Port).collect(),
        }
    }

    /// Build a range from arbitrary raw values, validating each one.
    pub fn from_ports<I>(ports: I) -> Result<Self, PortError>
    where
        I: IntoIterator,
        I::Item: Into<u32>,
    {
        let mut ports = ports
            .into_iter()
            .map(|p| Port::try_from(p.into()))
            .collect::<Result<Vec<_>, _>>()?;
        if ports.is_empty() {
            return Err(PortError::Empty);
        }
        ports.sort_unstable();
        ports.dedup();
        Ok(Self { ports })
    }

    /// Number of distinct ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Always false: a `PortRange` cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Iterate over the ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    pub fn contains(&self, port: Port) -> bool {
        self.ports.binary_search(&port).is_ok()
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ports.first(), self.ports.last()) {
            (Some(first), Some(last)) if first == last => write!(f, "{}", first),
            (Some(first), Some(last)) => write!(f, "{}-{} ({} ports)", first, last, self.len()),
            _ => Ok(()),
        }
    }
}
