//! Bucket specifications
//!
//! A `BucketSpec` maps every record to exactly one bucket. Specifications are
//! validated when they are built, so a spec that exists is total: values that
//! match no declared bucket, nulls and `NaN` all land in the trailing
//! `Unknown` bucket.
//!
//! Numeric ranges are half-open `[low, high)`. A missing `low` is unbounded
//! below and a missing `high` is unbounded above.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::models::patient::{CategoricalField, FlagField, NumericField, PatientRecord};

/// Label of the fallback bucket
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Rank of the fallback bucket; it always sorts last
pub const UNKNOWN_RANK: u32 = u32::MAX;

/// A named category with its sort rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub rank: u32,
}

/// One numeric band `[low, high)`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBand {
    pub label: String,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl RangeBand {
    #[must_use]
    pub fn new(label: impl Into<String>, low: Option<f64>, high: Option<f64>) -> Self {
        Self {
            label: label.into(),
            low,
            high,
        }
    }

    fn contains(&self, value: f64) -> bool {
        self.low.is_none_or(|low| value >= low) && self.high.is_none_or(|high| value < high)
    }
}

impl fmt::Display for RangeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.low, self.high) {
            (Some(low), Some(high)) => write!(f, "{} [{low}, {high})", self.label),
            (Some(low), None) => write!(f, "{} [{low}, inf)", self.label),
            (None, Some(high)) => write!(f, "{} (-inf, {high})", self.label),
            (None, None) => write!(f, "{} (-inf, inf)", self.label),
        }
    }
}

#[derive(Debug, Clone)]
enum BucketRule {
    Range {
        field: NumericField,
        bands: Vec<RangeBand>,
    },
    Categorical {
        field: CategoricalField,
        // lowercase value -> bucket index
        lookup: FxHashMap<String, usize>,
    },
    Flag {
        field: FlagField,
    },
}

/// A total mapping from records to buckets
#[derive(Debug, Clone)]
pub struct BucketSpec {
    name: String,
    buckets: Vec<Bucket>,
    rule: BucketRule,
}

impl BucketSpec {
    /// Bucket a numeric field by half-open bands declared in ascending order
    ///
    /// Bands may leave gaps (values in a gap are out of range and fall into
    /// `Unknown`) but must not overlap.
    pub fn ranges(
        name: impl Into<String>,
        field: NumericField,
        bands: Vec<RangeBand>,
    ) -> Result<Self> {
        let name = name.into();
        validate_labels(&name, bands.iter().map(|b| b.label.as_str()))?;

        for band in &bands {
            let finite = band.low.is_none_or(f64::is_finite) && band.high.is_none_or(f64::is_finite);
            if !finite {
                return Err(Error::invalid_spec(
                    &name,
                    format!("band {band} has a non-finite bound"),
                ));
            }
            if let (Some(low), Some(high)) = (band.low, band.high) {
                if low >= high {
                    return Err(Error::invalid_spec(&name, format!("band {band} is empty")));
                }
            }
        }

        for pair in bands.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            match (prev.high, next.low) {
                (Some(high), Some(low)) if high <= low => {}
                _ => {
                    return Err(Error::invalid_spec(
                        &name,
                        format!("bands {prev} and {next} overlap or are out of order"),
                    ));
                }
            }
        }

        let buckets = with_unknown(bands.iter().map(|b| b.label.clone()));
        Ok(Self {
            name,
            buckets,
            rule: BucketRule::Range { field, bands },
        })
    }

    /// Bucket a categorical field by exact value
    ///
    /// Each entry is a label and the raw values that map to it. Matching is
    /// case-insensitive on trimmed values; unlisted values fall into `Unknown`.
    pub fn categories(
        name: impl Into<String>,
        field: CategoricalField,
        entries: &[(&str, &[&str])],
    ) -> Result<Self> {
        let name = name.into();
        validate_labels(&name, entries.iter().map(|(label, _)| *label))?;

        let mut lookup = FxHashMap::default();
        for (index, (label, values)) in entries.iter().enumerate() {
            if values.is_empty() {
                return Err(Error::invalid_spec(
                    &name,
                    format!("category '{label}' matches no values"),
                ));
            }
            for value in *values {
                let key = value.trim().to_lowercase();
                if lookup.insert(key, index).is_some() {
                    return Err(Error::invalid_spec(
                        &name,
                        format!("value '{value}' is assigned to more than one category"),
                    ));
                }
            }
        }

        let buckets = with_unknown(entries.iter().map(|(label, _)| (*label).to_string()));
        Ok(Self {
            name,
            buckets,
            rule: BucketRule::Categorical { field, lookup },
        })
    }

    /// Identity bucketing: each listed value is its own category
    pub fn identity(
        name: impl Into<String>,
        field: CategoricalField,
        values: &[&str],
    ) -> Result<Self> {
        let entries: Vec<(&str, &[&str])> = values
            .iter()
            .map(|value| (*value, std::slice::from_ref(value)))
            .collect();
        Self::categories(name, field, &entries)
    }

    /// Bucket a boolean field into two labels
    pub fn flag(
        name: impl Into<String>,
        field: FlagField,
        true_label: &str,
        false_label: &str,
    ) -> Result<Self> {
        let name = name.into();
        validate_labels(&name, [true_label, false_label])?;
        Ok(Self {
            name,
            buckets: with_unknown([true_label.to_string(), false_label.to_string()]),
            rule: BucketRule::Flag { field },
        })
    }

    /// Specification name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every bucket, declared ones first and `Unknown` last
    #[must_use]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Index of the `Unknown` bucket
    #[must_use]
    pub fn unknown_index(&self) -> usize {
        self.buckets.len() - 1
    }

    /// Name of the column this spec reads
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match &self.rule {
            BucketRule::Range { field, .. } => field.column_name(),
            BucketRule::Categorical { field, .. } => field.column_name(),
            BucketRule::Flag { field } => field.column_name(),
        }
    }

    /// Index of the bucket a record belongs to
    #[must_use]
    pub fn classify(&self, record: &PatientRecord) -> usize {
        let unknown = self.unknown_index();
        match &self.rule {
            BucketRule::Range { field, bands } => field
                .value(record)
                .and_then(|v| bands.iter().position(|band| band.contains(v)))
                .unwrap_or(unknown),
            BucketRule::Categorical { field, lookup } => field
                .value(record)
                .and_then(|v| lookup.get(&v.to_lowercase()).copied())
                .unwrap_or(unknown),
            BucketRule::Flag { field } => match field.value(record) {
                Some(true) => 0,
                Some(false) => 1,
                None => unknown,
            },
        }
    }

    /// Label of the bucket a record belongs to
    #[must_use]
    pub fn label_for(&self, record: &PatientRecord) -> &str {
        &self.buckets[self.classify(record)].label
    }
}

fn with_unknown(labels: impl IntoIterator<Item = String>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = labels
        .into_iter()
        .zip(0u32..)
        .map(|(label, rank)| Bucket { label, rank })
        .collect();
    buckets.push(Bucket {
        label: UNKNOWN_LABEL.to_string(),
        rank: UNKNOWN_RANK,
    });
    buckets
}

fn validate_labels<'a>(spec: &str, labels: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = rustc_hash::FxHashSet::default();
    let mut any = false;
    for label in labels {
        any = true;
        if label.trim().is_empty() {
            return Err(Error::invalid_spec(spec, "bucket labels must not be blank"));
        }
        if label.eq_ignore_ascii_case(UNKNOWN_LABEL) {
            return Err(Error::invalid_spec(
                spec,
                format!("'{UNKNOWN_LABEL}' is reserved for the fallback bucket"),
            ));
        }
        if !seen.insert(label) {
            return Err(Error::invalid_spec(spec, format!("duplicate label '{label}'")));
        }
    }
    if !any {
        return Err(Error::invalid_spec(spec, "at least one bucket is required"));
    }
    Ok(())
}
