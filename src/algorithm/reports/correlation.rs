//! Pairwise correlation between numeric indicators
//!
//! Pearson's r is computed over the records where both values are present.
//! Like the other accumulators, the running sums merge by addition so the
//! pass can be split across partitions.

use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;

use crate::algorithm::aggregation::metric::round_half_away;
use crate::config::ReportConfig;
use crate::models::patient::{NumericField, PatientRecord};

/// Title of the correlation report
pub const CORRELATION_REPORT: &str = "Numeric Correlations";

/// Decimal places for correlation coefficients
pub const CORRELATION_DECIMALS: i32 = 3;

/// Running sums for one pair of fields
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairAccumulator {
    pub n: u64,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_xx: f64,
    pub sum_yy: f64,
    pub sum_xy: f64,
}

impl PairAccumulator {
    pub fn observe(&mut self, x: f64, y: f64) {
        self.n += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xx += x * x;
        self.sum_yy += y * y;
        self.sum_xy += x * y;
    }

    pub fn merge(&mut self, other: &Self) {
        self.n += other.n;
        self.sum_x += other.sum_x;
        self.sum_y += other.sum_y;
        self.sum_xx += other.sum_xx;
        self.sum_yy += other.sum_yy;
        self.sum_xy += other.sum_xy;
    }

    /// Pearson's r; `None` with fewer than two pairs or zero variance
    #[must_use]
    pub fn coefficient(&self) -> Option<f64> {
        if self.n < 2 {
            return None;
        }
        let n = self.n as f64;
        let cov = n * self.sum_xy - self.sum_x * self.sum_y;
        let var_x = n * self.sum_xx - self.sum_x * self.sum_x;
        let var_y = n * self.sum_yy - self.sum_y * self.sum_y;
        if is_zero_variance(var_x, n * self.sum_xx, n)
            || is_zero_variance(var_y, n * self.sum_yy, n)
        {
            return None;
        }
        let r = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);
        Some(round_half_away(r, CORRELATION_DECIMALS))
    }
}

// `n * sum_sq - sum^2` cancels to a residue of a few ulps of `n * sum_sq` when
// every value is equal but not exactly representable (22.1, 0.1). Anything
// within that rounding envelope is a constant field.
fn is_zero_variance(variance: f64, scale: f64, n: f64) -> bool {
    variance <= 4.0 * n * f64::EPSILON * scale
}

/// One cell of the correlation report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRow {
    pub x: &'static str,
    pub y: &'static str,
    /// Records with both values present
    pub pairs: u64,
    pub r: Option<f64>,
}

/// Pearson sums for two numeric fields over a single pass
#[must_use]
pub fn pearson(records: &[PatientRecord], x: NumericField, y: NumericField) -> PairAccumulator {
    let mut acc = PairAccumulator::default();
    for record in records {
        if let (Some(a), Some(b)) = (x.value(record), y.value(record)) {
            acc.observe(a, b);
        }
    }
    acc
}

/// Pearson sums over fixed contiguous partitions, merged in partition order
#[must_use]
pub fn pearson_partitioned(
    records: &[PatientRecord],
    x: NumericField,
    y: NumericField,
    partitions: usize,
) -> PairAccumulator {
    let chunk_size = records.len().div_ceil(partitions.max(1)).max(1);
    let partials: Vec<PairAccumulator> = records
        .par_chunks(chunk_size)
        .map(|chunk| pearson(chunk, x, y))
        .collect();
    let mut acc = PairAccumulator::default();
    for partial in &partials {
        acc.merge(partial);
    }
    acc
}

/// Correlation for every unordered pair of the given fields, in field order
#[must_use]
pub fn correlation_report(
    records: &[PatientRecord],
    fields: &[NumericField],
    config: &ReportConfig,
) -> Vec<CorrelationRow> {
    let parallel = config.runs_parallel(records.len());
    fields
        .iter()
        .tuple_combinations()
        .map(|(&x, &y)| {
            let acc = if parallel {
                pearson_partitioned(records, x, y, config.partitions)
            } else {
                pearson(records, x, y)
            };
            CorrelationRow {
                x: x.column_name(),
                y: y.column_name(),
                pairs: acc.n,
                r: acc.coefficient(),
            }
        })
        .collect()
}
