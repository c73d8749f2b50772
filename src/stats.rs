//! Descriptive statistics over timing samples.

use crate::error::{BenchError, Result};
use crate::schema::StatsSummary;

/// Decimal places kept in every reported statistic.
pub const REPORT_DECIMALS: i32 = 6;

/// Round to [`REPORT_DECIMALS`] places.
pub fn round6(value: f64) -> f64 {
    let scale = 10f64.powi(REPORT_DECIMALS);
    (value * scale).round() / scale
}

fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let len = sorted.len();
    if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    } else {
        sorted[len / 2]
    }
}

impl StatsSummary {
    /// Summarise `samples` (milliseconds).
    ///
    /// Uses the sample standard deviation (denominator `n - 1`), so at least
    /// two samples are required. `cv` is `stddev / mean`, reported as `0.0`
    /// when the mean is exactly zero.
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        let n = samples.len();
        if n < 2 {
            return Err(BenchError::InsufficientSamples { samples: n });
        }

        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples
            .iter()
            .map(|&s| {
                let diff = s - mean;
                diff * diff
            })
            .sum::<f64>()
            / (n - 1) as f64;
        let stddev = variance.sqrt();
        let cv = if mean == 0.0 { 0.0 } else { stddev / mean };

        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);

        Ok(Self {
            mean: round6(mean),
            median: round6(median(samples)),
            max: round6(max),
            min: round6(min),
            stddev: round6(stddev),
            cv: round6(cv),
        })
    }
}
