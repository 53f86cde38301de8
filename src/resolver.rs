//! Host resolution.
//!
//! Turns the user's host string into a single [`Target`] address. Literal
//! IPv4/IPv6 addresses never touch DNS.

use crate::error::ResolveError;
use crate::types::Target;
use async_trait::async_trait;
use std::net::IpAddr;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Maps a host string to one routable address.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, host: &str) -> Result<Target, ResolveError>;
}

/// DNS-backed resolver using the system configuration when available.
pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    pub fn new() -> Self {
        let inner = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            debug!(error = %e, "system resolver config unavailable, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { inner }
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Resolve for DnsResolver {
    async fn resolve(&self, host: &str) -> Result<Target, ResolveError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ResolveError::EmptyHost);
        }
        if let Some(target) = parse_literal(host) {
            return Ok(target);
        }

        let response = self
            .inner
            .lookup_ip(host)
            .await
            .map_err(|e| ResolveError::LookupFailed {
                host: host.to_string(),
                reason: e.to_string(),
            })?;

        let addr = response
            .iter()
            .next()
            .ok_or_else(|| ResolveError::NoAddresses(host.to_string()))?;
        debug!(host, %addr, "resolved host");
        Ok(Target::new(host, addr))
    }
}

/// Accepts bare addresses and bracketed IPv6 (`[::1]`).
fn parse_literal(host: &str) -> Option<Target> {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    bare.parse::<IpAddr>().ok().map(|ip| Target::new(host, ip))
}
