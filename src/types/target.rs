//! Resolved scan target.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use super::Port;

/// A host that has been resolved to a single routable address.
///
/// Immutable for the lifetime of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    host: String,
    addr: IpAddr,
}

impl Target {
    /// Pair the user-supplied host string with its resolved address.
    pub fn new(host: impl Into<String>, addr: IpAddr) -> Self {
        Self {
            host: host.into(),
            addr,
        }
    }

    /// The host as given by the user.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Socket address for one probe.
    pub fn socket_addr(&self, port: Port) -> SocketAddr {
        SocketAddr::new(self.addr, port.as_u16())
    }
}

impl From<IpAddr> for Target {
    fn from(addr: IpAddr) -> Self {
        Self::new(addr.to_string(), addr)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == self.addr.to_string() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{} ({})", self.host, self.addr)
        }
    }
}
