//! Run-level aggregation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Summary, geometric_mean};
use crate::eval::{FileMetric, FileStatus};

/// Number of files per outcome class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// All processed files.
    pub total: usize,
    /// Files with `status == ok`.
    pub ok: usize,
    /// Files with `status == no-output`.
    pub no_output: usize,
    /// Files with `status == error`.
    pub error: usize,
}

impl StatusCounts {
    fn tally(metrics: &[FileMetric]) -> Self {
        let mut counts = Self {
            total: metrics.len(),
            ..Self::default()
        };
        for m in metrics {
            match m.status {
                FileStatus::Ok => counts.ok += 1,
                FileStatus::NoOutput => counts.no_output += 1,
                FileStatus::Error => counts.error += 1,
            }
        }
        counts
    }
}

/// Aggregate statistics for one benchmark run.
///
/// Byte totals, throughput, timing and pass statistics only consider
/// `ok` records, so failed or skipped files cannot skew them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Files per outcome class.
    pub counts: StatusCounts,

    /// Wall-clock duration of the whole run, in seconds.
    pub wall_elapsed_s: f64,

    /// Successfully encoded images per wall-clock second.
    pub images_per_sec: f64,

    /// Input bytes of ok images per wall-clock second.
    pub input_bytes_per_sec: f64,

    /// Output bytes per wall-clock second.
    pub output_bytes_per_sec: f64,

    /// Sum of input sizes over ok records.
    pub original_total_bytes: u64,

    /// Sum of output sizes over ok records.
    pub final_total_bytes: u64,

    /// `original_total_bytes - final_total_bytes`, floored at zero.
    pub savings_total_bytes: u64,

    /// Size-weighted savings: `savings_total_bytes / original_total_bytes` as a percentage.
    pub pct_saved_overall: f64,

    /// Geometric mean of per-file `final / original` ratios.
    ///
    /// Ok records with a zero-byte output have no logarithm and are left out;
    /// `geomean_excluded` counts them. `None` when no ratio remains.
    pub geomean_ratio: Option<f64>,

    /// Ok records left out of `geomean_ratio` because their output was empty.
    #[serde(default)]
    pub geomean_excluded: usize,

    /// Savings implied by `geomean_ratio`, as a percentage.
    pub geomean_savings_pct: Option<f64>,

    /// Encoding time distribution in milliseconds.
    pub encoding_time_ms: Summary,

    /// Pass count distribution.
    pub passes: Summary,
}

impl RunStatistics {
    /// Fold per-file metrics into run statistics.
    ///
    /// `wall_elapsed` is the duration of the whole run, measured independently
    /// of per-file encoding times.
    #[must_use]
    pub fn compute(metrics: &[FileMetric], wall_elapsed: Duration) -> Self {
        let counts = StatusCounts::tally(metrics);
        let ok: Vec<&FileMetric> = metrics.iter().filter(|m| m.is_ok()).collect();

        let original_total_bytes: u64 = ok.iter().map(|m| m.original_bytes).sum();
        let final_total_bytes: u64 = ok.iter().filter_map(|m| m.final_bytes).sum();
        let savings_total_bytes = original_total_bytes.saturating_sub(final_total_bytes);
        let pct_saved_overall = if original_total_bytes > 0 {
            100.0 * savings_total_bytes as f64 / original_total_bytes as f64
        } else {
            0.0
        };

        let all_ratios: Vec<f64> = ok.iter().filter_map(|m| m.compression_ratio()).collect();
        let ratios: Vec<f64> = all_ratios.iter().copied().filter(|r| *r > 0.0).collect();
        let geomean_excluded = all_ratios.len() - ratios.len();
        let geomean_ratio = geometric_mean(&ratios);
        let geomean_savings_pct = geomean_ratio.map(|r| 100.0 * (1.0 - r));

        let times: Vec<f64> = ok.iter().filter_map(|m| m.encoding_time_ms).collect();
        let passes: Vec<f64> = ok.iter().filter_map(|m| m.passes.map(f64::from)).collect();

        let wall_elapsed_s = wall_elapsed.as_secs_f64();
        let per_sec = |quantity: f64| {
            if wall_elapsed_s > 0.0 {
                quantity / wall_elapsed_s
            } else {
                0.0
            }
        };

        Self {
            counts,
            wall_elapsed_s,
            images_per_sec: per_sec(counts.ok as f64),
            input_bytes_per_sec: per_sec(original_total_bytes as f64),
            output_bytes_per_sec: per_sec(final_total_bytes as f64),
            original_total_bytes,
            final_total_bytes,
            savings_total_bytes,
            pct_saved_overall,
            geomean_ratio,
            geomean_excluded,
            geomean_savings_pct,
            encoding_time_ms: Summary::compute(&times),
            passes: Summary::compute(&passes),
        }
    }
}
