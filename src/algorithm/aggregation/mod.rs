//! Generic aggregation engine
//!
//! `aggregate` buckets every record once through a [`BucketSpec`], keeps
//! per-bucket running sums for each [`MetricSpec`], and returns one
//! [`SummaryRow`] per occupied bucket ordered by the bucket's declared rank.
//! The computation is a pure fold: the same input always yields the same rows.

pub mod accumulator;
pub mod bucket;
pub mod metric;
pub mod parallel;

use std::cmp::Ordering;

use log::debug;
use rustc_hash::FxHashSet;

use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::models::patient::PatientRecord;
use crate::models::summary::{Report, SummaryRow};

pub use accumulator::{AccumulatorTable, BucketAccumulator, MetricAccumulator};
pub use bucket::{Bucket, BucketSpec, RangeBand, UNKNOWN_LABEL, UNKNOWN_RANK};
pub use metric::{MetricSpec, Predicate};

/// Output ordering for summary rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Declared bucket rank, ties by first-seen record
    #[default]
    BucketRank,
    /// Metric at this index, descending, nulls last, ties by bucket rank
    MetricDesc(usize),
}

/// Aggregate records sequentially, ordered by bucket rank
#[must_use]
pub fn aggregate(
    records: &[PatientRecord],
    spec: &BucketSpec,
    metrics: &[MetricSpec],
) -> Vec<SummaryRow> {
    AccumulatorTable::fold(records, 0, spec, metrics).into_rows(spec, metrics)
}

/// Aggregate records, partitioning the pass once the input is large enough
#[must_use]
pub fn aggregate_with_config(
    records: &[PatientRecord],
    spec: &BucketSpec,
    metrics: &[MetricSpec],
    config: &ReportConfig,
) -> Vec<SummaryRow> {
    let table = if config.runs_parallel(records.len()) {
        parallel::fold_partitioned(records, spec, metrics, config.partitions)
    } else {
        AccumulatorTable::fold(records, 0, spec, metrics)
    };
    table.into_rows(spec, metrics)
}

/// Reorder rows in place
///
/// Rows arrive in rank order; `MetricDesc` is a stable sort on top of that.
pub fn order_rows(rows: &mut [SummaryRow], order: RowOrder) {
    match order {
        RowOrder::BucketRank => {}
        RowOrder::MetricDesc(index) => rows.sort_by(|a, b| {
            let value = |row: &SummaryRow| row.metrics.get(index).and_then(|m| m.value);
            compare_desc_nulls_last(value(a), value(b)).then(a.rank.cmp(&b.rank))
        }),
    }
}

pub(crate) fn compare_desc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A named cohort breakdown: one bucket spec, its metrics, and an ordering
#[derive(Debug, Clone)]
pub struct ReportDefinition {
    name: String,
    bucket_spec: BucketSpec,
    metrics: Vec<MetricSpec>,
    order: RowOrder,
}

impl ReportDefinition {
    /// Build and validate a report definition
    pub fn new(
        name: impl Into<String>,
        bucket_spec: BucketSpec,
        metrics: Vec<MetricSpec>,
        order: RowOrder,
    ) -> Result<Self> {
        let name = name.into();
        let mut names = FxHashSet::default();
        for metric in &metrics {
            let column = metric.name();
            if column == "label" || column == "count" || !names.insert(column) {
                return Err(Error::config(format!(
                    "report '{name}' has a duplicate or reserved metric column '{column}'"
                )));
            }
        }
        if let RowOrder::MetricDesc(index) = order {
            if index >= metrics.len() {
                return Err(Error::config(format!(
                    "report '{name}' orders by metric {index} but has {} metrics",
                    metrics.len()
                )));
            }
        }
        Ok(Self {
            name,
            bucket_spec,
            metrics,
            order,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bucket_spec(&self) -> &BucketSpec {
        &self.bucket_spec
    }

    #[must_use]
    pub fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    /// Run the report over a record set
    #[must_use]
    pub fn run(&self, records: &[PatientRecord], config: &ReportConfig) -> Report {
        let mut rows = aggregate_with_config(records, &self.bucket_spec, &self.metrics, config);
        order_rows(&mut rows, self.order);
        debug!("Report '{}' produced {} rows", self.name, rows.len());
        Report {
            name: self.name.clone(),
            total_records: records.len() as u64,
            rows,
        }
    }
}
