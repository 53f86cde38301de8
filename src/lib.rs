//! # portprobe - A Concurrent TCP Port Scanner
//!
//! portprobe determines which TCP ports on a host accept connections. It
//! makes one bounded connect attempt per port and caps how many attempts
//! are in flight at once.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portprobe::config::ScanConfig;
//! use portprobe::report::ConsoleReporter;
//! use portprobe::resolver::DnsResolver;
//! use portprobe::scanner::Scanner;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let scanner = Scanner::new(ScanConfig::new(300, 0.35, 1024)?);
//!     let mut reporter = ConsoleReporter::stdout();
//!     let result = scanner
//!         .scan_host(&DnsResolver::new(), "127.0.0.1", &mut reporter, &CancellationToken::new())
//!         .await?;
//!
//!     for open in result.open_ports() {
//!         println!("{}", open);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`scanner`] - probe, concurrency limiter and scan orchestrator
//! - [`report`] - live reporting of outcomes as they complete
//! - [`resolver`] - host name resolution
//! - [`services`] - port to service-name lookup
//! - [`output`] - JSON/CSV persistence and console formatting
//! - [`config`] - validated scan configuration and settings file
//! - [`types`] - newtypes for ports, port ranges and targets
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, OutputError, ResolveError, ScanError};
pub use scanner::{ProbeOutcome, ScanResult, Scanner};
pub use types::{Port, PortRange, Target};
