//! Statistical aggregation of benchmark results.
//!
//! ## Core Statistics
//!
//! - [`Summary`]: Descriptive statistics (mean, median, std_dev, min, max)
//! - [`median`], [`mean`], [`std_dev`]: Basic statistical functions
//! - [`geometric_mean`]: Mean of ratios, undefined for empty input
//!
//! ## Run Statistics
//!
//! - [`RunStatistics`]: Run-level snapshot computed from per-file metrics

mod run;

pub use run::{RunStatistics, StatusCounts};

use serde::{Deserialize, Serialize};

/// Descriptive statistics for a set of measurements.
///
/// All fields are zero for an empty sample, and `std_dev` is zero when
/// fewer than two values are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values.
    pub count: usize,
    /// Mean value.
    pub mean: f64,
    /// Median value.
    pub median: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Summary {
    /// Compute summary statistics for a slice of values.
    #[must_use]
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            count: sorted.len(),
            mean: mean(&sorted),
            median: median_sorted(&sorted),
            std_dev: std_dev(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        }
    }

    /// Whether no values were summarized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

//=============================================================================
// Core Statistical Functions
//=============================================================================

/// Compute median of a slice.
///
/// For even-length slices, returns the average of the two middle values.
///
/// # Example
///
/// ```
/// use encode_bench::stats::median;
///
/// assert_eq!(median(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0);
/// assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    median_sorted(&sorted)
}

fn median_sorted(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Compute arithmetic mean.
///
/// # Example
///
/// ```
/// use encode_bench::stats::mean;
///
/// assert!((mean(&[1.0, 2.0, 3.0, 4.0, 5.0]) - 3.0).abs() < 0.001);
/// ```
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute sample standard deviation.
///
/// Uses Bessel's correction (N-1 denominator). Returns 0 for fewer than two values.
///
/// # Example
///
/// ```
/// use encode_bench::stats::std_dev;
///
/// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((std_dev(&values) - 2.138).abs() < 0.001);
/// assert_eq!(std_dev(&[42.0]), 0.0);
/// ```
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Compute the geometric mean of strictly positive values.
///
/// Returns `None` for an empty slice or if any value is not positive,
/// since the logarithm is undefined there.
///
/// # Example
///
/// ```
/// use encode_bench::stats::geometric_mean;
///
/// assert!((geometric_mean(&[0.5, 0.5, 0.5]).unwrap() - 0.5).abs() < 1e-12);
/// assert!((geometric_mean(&[1.0, 4.0]).unwrap() - 2.0).abs() < 1e-12);
/// assert_eq!(geometric_mean(&[]), None);
/// ```
#[must_use]
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| *v <= 0.0 || !v.is_finite()) {
        return None;
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    Some((log_sum / values.len() as f64).exp())
}
