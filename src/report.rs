//! Live reporting of scan progress.
//!
//! The orchestrator is the only caller: it forwards each outcome as it
//! arrives (completion order) and the finished result once at the end.

use crate::output::{open_port_line, print_scan_header, summary_line};
use crate::scanner::{ProbeOutcome, ScanResult};
use crate::services::{service_name, Protocol};
use crate::types::{Port, PortRange, Target};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use tracing::debug;

/// Consumer of scan events.
pub trait Reporter {
    /// Called once before any probe is scheduled.
    fn on_start(&mut self, _target: &Target, _ports: &PortRange) {}

    /// Called for every completed probe, in completion order.
    fn on_outcome(&mut self, port: Port, outcome: &ProbeOutcome);

    /// Called once with the finished (or interrupted) result.
    fn on_finish(&mut self, _result: &ScanResult) {}
}

/// Prints open ports as they are found and a summary at the end.
pub struct ConsoleReporter<W: Write> {
    out: W,
    progress: Option<ProgressBar>,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            progress: None,
        }
    }

    /// Show a header and progress bar on stderr while scanning.
    pub fn with_progress(mut self) -> Self {
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        ) {
            pb.set_style(style.progress_chars("=>-"));
        }
        self.progress = Some(pb);
        self
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        let out = &mut self.out;
        let written = match &self.progress {
            Some(pb) => pb.suspend(|| writeln!(out, "{}", line)),
            None => writeln!(out, "{}", line),
        };
        if let Err(e) = written.and_then(|_| self.out.flush()) {
            debug!(error = %e, "failed to write report line");
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_start(&mut self, target: &Target, ports: &PortRange) {
        if let Some(pb) = &self.progress {
            print_scan_header(&target.to_string(), &ports.to_string());
            pb.set_length(ports.len() as u64);
            pb.set_message(target.to_string());
        }
    }

    fn on_outcome(&mut self, port: Port, outcome: &ProbeOutcome) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
        if outcome.is_open() {
            let service = service_name(port.as_u16(), Protocol::Tcp);
            self.emit(&open_port_line(port, &service));
        }
    }

    fn on_finish(&mut self, result: &ScanResult) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
        self.emit("");
        self.emit(&summary_line(result));
    }
}
