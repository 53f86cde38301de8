//! Command-line interface for portprobe.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to the settings file, then to built-in defaults.

mod host;

pub use host::{acquire_host, read_host};

use crate::config::{
    AppSettings, ScanConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_PORT, DEFAULT_TIMEOUT_SECS,
};
use crate::error::ConfigResult;
use crate::output::{self, save_results, OutputFormat};
use crate::report::ConsoleReporter;
use crate::resolver::DnsResolver;
use crate::scanner::Scanner;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A concurrent TCP connect port scanner.
///
/// Probes ports 1 through --max-port on one host, printing each open port
/// as it is found.
#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP port scanner", long_about = None)]
pub struct Args {
    /// Hostname or IP address to scan (read from stdin or prompted if omitted)
    #[arg(value_name = "HOST")]
    pub host: Option<String>,

    /// Hostname or IP address to scan
    #[arg(short = 'H', long = "host", value_name = "HOST", conflicts_with = "host")]
    pub host_flag: Option<String>,

    /// Highest port to probe; ports 1 through this value are scanned [default: 4999]
    #[arg(short = 'm', long)]
    pub max_port: Option<u32>,

    /// Maximum number of connection attempts in flight [default: 300]
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Per-port connect timeout in seconds [default: 0.35]
    #[arg(short = 't', long)]
    pub timeout: Option<f64>,

    /// Save open ports to this file after the scan
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Format of the --output file (inferred from its extension if omitted)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Show a progress bar while scanning
    #[arg(long)]
    pub progress: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "PORTPROBE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Merge flags over settings over built-in defaults and validate.
    pub fn scan_config(&self, settings: &AppSettings) -> ConfigResult<ScanConfig> {
        ScanConfig::new(
            self.concurrency
                .or(settings.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
            self.timeout
                .or(settings.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            self.max_port
                .or(settings.max_port)
                .unwrap_or(u32::from(DEFAULT_MAX_PORT)),
        )
    }

    /// The host given on the command line, positional or flag.
    pub fn host(&self) -> Option<String> {
        self.host.clone().or_else(|| self.host_flag.clone())
    }
}

/// How a run ended, for the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every port produced an outcome.
    Completed,
    /// Interrupted by the user; the result was partial.
    Interrupted,
}

impl RunOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Completed => ExitCode::SUCCESS,
            Self::Interrupted => ExitCode::from(130),
        }
    }
}

/// Run one scan from parsed arguments.
pub async fn run(args: Args) -> anyhow::Result<RunOutcome> {
    let settings = AppSettings::load(args.config.as_deref()).context("failed to load settings")?;
    let config = args.scan_config(&settings)?;

    let explicit = args.host();
    let host = tokio::task::spawn_blocking(move || acquire_host(explicit))
        .await?
        .context("failed to read host")?;

    let cancel = CancellationToken::new();
    watch_for_interrupt(cancel.clone());

    let mut reporter = ConsoleReporter::stdout();
    if args.progress {
        reporter = reporter.with_progress();
    }

    let scanner = Scanner::new(config);
    let result = scanner
        .scan_host(&DnsResolver::new(), &host, &mut reporter, &cancel)
        .await
        .context("could not resolve host")?;

    if let Some(path) = &args.output {
        let format = OutputFormat::infer(
            args.format,
            path,
            settings.format.unwrap_or_default(),
        );
        match save_results(&result, path, format) {
            Ok(()) => output::print_success(&format!(
                "Results saved to {} (format: {})",
                path.display(),
                format
            )),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save results");
                output::print_error(&format!(
                    "Failed to save results to {}: {}",
                    path.display(),
                    e
                ));
            }
        }
    }

    Ok(if result.is_partial() {
        RunOutcome::Interrupted
    } else {
        RunOutcome::Completed
    })
}

/// Cancel `token` on Ctrl-C. In-flight probes still finish.
fn watch_for_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            output::print_warning("Interrupted, waiting for in-flight probes to finish...");
            token.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("portprobe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["example.com"]);
        let config = args.scan_config(&AppSettings::default()).unwrap();
        assert_eq!(args.host().as_deref(), Some("example.com"));
        assert_eq!(config.concurrency(), 300);
        assert_eq!(config.max_port().as_u16(), 4999);
        assert!(args.output.is_none());
        assert!(args.format.is_none());
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&[
            "-m", "1024", "-c", "50", "-t", "1.5", "-o", "out.csv", "-f", "json", "10.0.0.1",
        ]);
        let config = args.scan_config(&AppSettings::default()).unwrap();
        assert_eq!(config.max_port().as_u16(), 1024);
        assert_eq!(config.concurrency(), 50);
        assert_eq!(config.timeout(), Duration::from_millis(1500));
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_host_flag() {
        let args = parse(&["-H", "scanme.example"]);
        assert_eq!(args.host().as_deref(), Some("scanme.example"));
        assert!(parse(&[]).host().is_none());
    }

    #[test]
    fn test_positional_and_flag_conflict() {
        assert!(Args::try_parse_from(["portprobe", "a.example", "-H", "b.example"]).is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = AppSettings {
            concurrency: Some(10),
            timeout_secs: Some(2.0),
            max_port: Some(100),
            format: None,
        };
        let config = parse(&["-c", "20", "h"]).scan_config(&settings).unwrap();
        assert_eq!(config.concurrency(), 20);
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert_eq!(config.max_port().as_u16(), 100);
    }

    #[tokio::test]
    async fn test_unresolvable_host_fails_with_context() {
        let mut settings = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut settings, b"{}").unwrap();
        let config = settings.path().to_str().unwrap().to_string();

        let err = run(parse(&["--config", config.as_str(), "-H", "  "]))
            .await
            .unwrap_err();
        assert_eq!(format!("{:#}", err), "could not resolve host: no host given");
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        assert!(parse(&["-m", "0", "h"])
            .scan_config(&AppSettings::default())
            .is_err());
        assert!(parse(&["-t", "0", "h"])
            .scan_config(&AppSettings::default())
            .is_err());
        assert!(parse(&["-c", "0", "h"])
            .scan_config(&AppSettings::default())
            .is_err());
        let huge = usize::MAX.to_string();
        assert!(parse(&["-c", huge.as_str(), "h"])
            .scan_config(&AppSettings::default())
            .is_err());
    }
}
