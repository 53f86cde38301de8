//! Plain text console output.
//!
//! The live and summary lines are plain so stdout stays greppable;
//! status messages on stderr use `console` styling.

use crate::scanner::{OpenPort, ScanResult};
use crate::types::Port;
use console::style;
use std::io::{self, Write};

/// Line printed the moment a port is found open.
pub fn open_port_line(port: Port, service: &str) -> String {
    format!("Port {:5}    OPEN    {}", port.as_u16(), service)
}

/// Final line: elapsed time and the port-ordered open list.
pub fn summary_line(result: &ScanResult) -> String {
    let open = format_open_list(&result.open_ports());
    let secs = result.elapsed().as_secs_f64();
    if result.is_partial() {
        format!(
            "Scan interrupted after {:.3}s (probed {} of {} ports). Open ports: {}",
            secs,
            result.probed(),
            result.requested(),
            open
        )
    } else {
        format!("Scan finished in {:.3}s. Open ports: {}", secs, open)
    }
}

fn format_open_list(open: &[OpenPort]) -> String {
    let items: Vec<String> = open.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, ports: &str) {
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portprobe").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{} Target: {}", style("•").dim(), style(target).white().bold());
    eprintln!("{} Ports: {}", style("•").dim(), ports);
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message to stderr.
pub fn print_success(msg: &str) {
    let _ = write_success(&mut io::stderr(), msg);
}

fn write_success<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("✓").green().bold(), msg)
}
