//! Per-file measurement records.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoder::{EncodeOutcome, parse_passes};

/// Outcome class of one processed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// The encoder succeeded and produced an output file.
    Ok,
    /// The encoder succeeded but wrote no output file.
    NoOutput,
    /// The encoder failed to launch or exited unsuccessfully.
    Error,
}

impl FileStatus {
    /// String form used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NoOutput => "no-output",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurements for one processed image.
///
/// `status == Ok` exactly when `final_bytes` is present; savings are only
/// present when additionally `original_bytes > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetric {
    /// Image file name.
    pub name: String,

    /// Size of the input image, measured before encoding.
    pub original_bytes: u64,

    /// Size of the encoder output.
    pub final_bytes: Option<u64>,

    /// `original_bytes - final_bytes`, floored at zero.
    pub savings_bytes: Option<u64>,

    /// Savings as a percentage of `original_bytes`.
    pub savings_pct: Option<f64>,

    /// Wall-clock time of a successful invocation.
    pub encoding_time_ms: Option<f64>,

    /// Pass count reported by the encoder.
    pub passes: Option<u32>,

    /// Outcome class.
    pub status: FileStatus,

    /// Failure cause for `status == Error`.
    pub error_message: Option<String>,

    /// Raw diagnostic text, when non-empty.
    pub diagnostic_text: Option<String>,
}

impl FileMetric {
    /// Build a metric from an outcome, reading the output file's size from disk.
    ///
    /// A missing output path (or one that cannot be stat'ed) counts as no output.
    #[must_use]
    pub fn build(
        name: impl Into<String>,
        original_bytes: u64,
        outcome: &EncodeOutcome,
        output_path: &Path,
    ) -> Self {
        let output_bytes = if outcome.is_ok() {
            std::fs::metadata(output_path)
                .ok()
                .filter(|m| m.is_file())
                .map(|m| m.len())
        } else {
            None
        };
        Self::from_parts(name, original_bytes, outcome, output_bytes)
    }

    /// Build a metric from an outcome and the observed output size.
    ///
    /// `output_bytes` is ignored for failed invocations.
    #[must_use]
    pub fn from_parts(
        name: impl Into<String>,
        original_bytes: u64,
        outcome: &EncodeOutcome,
        output_bytes: Option<u64>,
    ) -> Self {
        let name = name.into();
        let diagnostic_text = non_empty(outcome.diagnostic_text());

        match outcome {
            EncodeOutcome::Failed { error_detail, .. } => Self {
                name,
                original_bytes,
                final_bytes: None,
                savings_bytes: None,
                savings_pct: None,
                encoding_time_ms: None,
                passes: None,
                status: FileStatus::Error,
                error_message: Some(error_detail.clone()),
                diagnostic_text,
            },
            EncodeOutcome::Ok { diagnostic_text: text, .. } => {
                let (savings_bytes, savings_pct) = match output_bytes {
                    Some(final_bytes) if original_bytes > 0 => {
                        let saved = original_bytes.saturating_sub(final_bytes);
                        (Some(saved), Some(100.0 * saved as f64 / original_bytes as f64))
                    }
                    _ => (None, None),
                };
                let status = if output_bytes.is_some() {
                    FileStatus::Ok
                } else {
                    FileStatus::NoOutput
                };

                Self {
                    name,
                    original_bytes,
                    final_bytes: output_bytes,
                    savings_bytes,
                    savings_pct,
                    encoding_time_ms: outcome.elapsed_ms(),
                    passes: parse_passes(text),
                    status,
                    error_message: None,
                    diagnostic_text,
                }
            }
        }
    }

    /// Output size relative to input size, for ok records with a non-empty input.
    #[must_use]
    pub fn compression_ratio(&self) -> Option<f64> {
        match (self.status, self.final_bytes) {
            (FileStatus::Ok, Some(final_bytes)) if self.original_bytes > 0 => {
                Some(final_bytes as f64 / self.original_bytes as f64)
            }
            _ => None,
        }
    }

    /// Whether the image was encoded and produced output.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == FileStatus::Ok
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
