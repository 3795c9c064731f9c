//! Descriptive statistics.
//!
//! Quantiles interpolate linearly between order statistics, which matches
//! the default `summary()` output of common statistics packages.

use serde::Serialize;

/// Five-number summary plus mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub mean: f64,
    pub q3: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Column headers in table order.
    pub const COLUMNS: [&'static str; 6] = ["Min.", "1st Qu.", "Median", "Mean", "3rd Qu.", "Max."];

    /// Summarize a series. Returns `None` for an empty series.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

        Some(Self {
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            mean,
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }

    /// Values in `COLUMNS` order.
    pub fn as_row(&self) -> [f64; 6] {
        [self.min, self.q1, self.median, self.mean, self.q3, self.max]
    }
}

/// Quantile of an already sorted, non-empty slice.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
