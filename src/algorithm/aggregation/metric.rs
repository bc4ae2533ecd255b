//! Metric specifications and rounding
//!
//! A metric is derived per bucket after all records are folded. Rates are
//! computed exactly from integer counts; means are rounded from the final sum.

use crate::models::patient::{CategoricalField, FlagField, NumericField, PatientRecord};

/// Decimal places for rate metrics
pub const RATE_DECIMALS: i32 = 2;

/// Decimal places for mean metrics
pub const MEAN_DECIMALS: i32 = 1;

/// A condition over a single record
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// The flag is `true`; null does not match
    Flag(FlagField),
    /// The category equals the value (trimmed, case-insensitive)
    CategoryIs(CategoricalField, String),
    /// Any of the inner predicates matches
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    #[must_use]
    pub fn category(field: CategoricalField, value: impl Into<String>) -> Self {
        Self::CategoryIs(field, value.into())
    }

    #[must_use]
    pub fn matches(&self, record: &PatientRecord) -> bool {
        match self {
            Self::Flag(field) => field.value(record) == Some(true),
            Self::CategoryIs(field, expected) => field
                .value(record)
                .is_some_and(|v| v.eq_ignore_ascii_case(expected.trim())),
            Self::AnyOf(inner) => inner.iter().any(|p| p.matches(record)),
        }
    }
}

/// A derived per-bucket metric
#[derive(Debug, Clone, PartialEq)]
pub enum MetricSpec {
    /// Percentage of the bucket matching the predicate, two decimals
    Rate { name: String, predicate: Predicate },
    /// Mean of the non-null values of a numeric field, one decimal
    Mean { name: String, field: NumericField },
}

impl MetricSpec {
    #[must_use]
    pub fn rate(name: impl Into<String>, predicate: Predicate) -> Self {
        Self::Rate {
            name: name.into(),
            predicate,
        }
    }

    #[must_use]
    pub fn mean(name: impl Into<String>, field: NumericField) -> Self {
        Self::Mean {
            name: name.into(),
            field,
        }
    }

    /// Output column name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Rate { name, .. } | Self::Mean { name, .. } => name,
        }
    }
}

/// `100 * matched / total`, rounded half away from zero to two decimals
///
/// Returns `None` for an empty group so that "no data" stays distinct from a
/// zero rate. A single match in a group of more than 20,000 rounds to `0.0`.
#[must_use]
pub fn rate_percent(matched: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    // floor(10000 * m / n + 1/2) in integers
    let (m, n) = (u128::from(matched), u128::from(total));
    let scaled = (20_000 * m + n) / (2 * n);
    Some(scaled as f64 / 100.0)
}

/// Mean of `count` values summing to `sum`, rounded to one decimal
#[must_use]
pub fn mean_value(sum: f64, count: u64) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(round_half_away(sum / count as f64, MEAN_DECIMALS))
}

/// Round half away from zero to the given number of decimals
#[must_use]
pub fn round_half_away(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
