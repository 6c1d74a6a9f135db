//! Report output for benchmark runs.
//!
//! Two formats are produced:
//!
//! - a CSV table with one row per image, for spreadsheets and scripts
//! - a JSON [`RunReport`] bundling per-file metrics with the run statistics

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::eval::FileMetric;
use crate::stats::RunStatistics;

/// CSV column names, in output order.
pub const CSV_HEADER: [&str; 9] = [
    "image",
    "original_bytes",
    "final_bytes",
    "savings_bytes",
    "savings_pct",
    "encoding_time_ms",
    "passes",
    "status",
    "error",
];

/// Write one CSV row per metric. Absent values are left blank.
pub fn write_csv(path: &Path, metrics: &[FileMetric]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let wtr = csv::Writer::from_path(path)?;
    write_rows(wtr, metrics)
}

/// Write the CSV table to any writer.
pub fn write_csv_to<W: std::io::Write>(writer: W, metrics: &[FileMetric]) -> Result<()> {
    write_rows(csv::Writer::from_writer(writer), metrics)
}

fn write_rows<W: std::io::Write>(mut wtr: csv::Writer<W>, metrics: &[FileMetric]) -> Result<()> {
    wtr.write_record(CSV_HEADER)?;

    for m in metrics {
        wtr.write_record([
            m.name.clone(),
            m.original_bytes.to_string(),
            m.final_bytes.map_or(String::new(), |b| b.to_string()),
            m.savings_bytes.map_or(String::new(), |b| b.to_string()),
            m.savings_pct.map_or(String::new(), |p| format!("{:.2}", p)),
            m.encoding_time_ms.map_or(String::new(), |t| format!("{:.2}", t)),
            m.passes.map_or(String::new(), |p| p.to_string()),
            m.status.as_str().to_string(),
            m.error_message.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Complete machine-readable record of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the report was generated.
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Encoder identifier.
    pub encoder: String,

    /// Tolerance forwarded to the encoder.
    pub tolerance: Option<f64>,

    /// Directory the images were read from.
    pub input_dir: PathBuf,

    /// Aggregate statistics.
    pub statistics: RunStatistics,

    /// Per-file metrics in processing order.
    pub files: Vec<FileMetric>,
}

impl RunReport {
    /// Save as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| Error::Report(format!("Failed to write {}: {e}", path.display())))
    }

    /// Load a previously saved report.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
