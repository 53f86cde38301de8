//! Output formatting and persistence.
//!
//! Live console lines live in `plain`; `json_format` and `csv_format`
//! persist the open ports of a finished scan.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{read_csv, write_csv};
pub use json_format::{read_json, write_json};
pub use plain::{
    open_port_line, print_error, print_scan_header, print_success, print_warning, summary_line,
};

use crate::error::{OutputError, OutputResult};
use crate::scanner::ScanResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// File format for persisted results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON array of `{port, service}`
    #[default]
    Json,
    /// `port,service` header followed by one row per open port
    Csv,
}

impl OutputFormat {
    /// Pick a format: explicit choice, else a `.csv`/`.json` extension on
    /// `path`, else `fallback`.
    pub fn infer(explicit: Option<Self>, path: &Path, fallback: Self) -> Self {
        if let Some(format) = explicit {
            return format;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => fallback,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Write the open ports of `result` to `path`.
pub fn save_results(result: &ScanResult, path: &Path, format: OutputFormat) -> OutputResult<()> {
    let open = result.open_ports();
    let file = File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => write_json(writer, &open)?,
        OutputFormat::Csv => write_csv(writer, &open)?,
    }

    info!(path = %path.display(), %format, count = open.len(), "saved results");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_infer_format() {
        let csv = PathBuf::from("out/results.CSV");
        let json = PathBuf::from("results.json");
        let bare = PathBuf::from("results");

        let json_default = OutputFormat::default();

        assert_eq!(OutputFormat::infer(None, &csv, json_default), OutputFormat::Csv);
        assert_eq!(OutputFormat::infer(None, &json, json_default), OutputFormat::Json);
        assert_eq!(OutputFormat::infer(None, &bare, json_default), OutputFormat::Json);
        assert_eq!(
            OutputFormat::infer(None, &bare, OutputFormat::Csv),
            OutputFormat::Csv
        );
        assert_eq!(
            OutputFormat::infer(None, &json, OutputFormat::Csv),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::infer(Some(OutputFormat::Json), &csv, json_default),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::infer(Some(OutputFormat::Csv), &json, json_default),
            OutputFormat::Csv
        );
    }
}
