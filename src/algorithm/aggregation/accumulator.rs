//! Per-bucket accumulators
//!
//! Accumulators only hold counts and sums. Merging two accumulators for the
//! same bucket is associative and commutative; rates and means are derived
//! once, after the last merge.

use smallvec::SmallVec;

use crate::algorithm::aggregation::bucket::{Bucket, BucketSpec};
use crate::algorithm::aggregation::metric::{MetricSpec, mean_value, rate_percent};
use crate::models::patient::PatientRecord;
use crate::models::summary::{MetricValue, SummaryRow};

/// Running state for one metric within one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricAccumulator {
    /// Predicate matches (rate) or non-null values (mean)
    pub hits: u64,
    /// Sum of non-null values (mean only)
    pub sum: f64,
}

impl MetricAccumulator {
    fn observe(&mut self, spec: &MetricSpec, record: &PatientRecord) {
        match spec {
            MetricSpec::Rate { predicate, .. } => {
                if predicate.matches(record) {
                    self.hits += 1;
                }
            }
            MetricSpec::Mean { field, .. } => {
                if let Some(value) = field.value(record) {
                    self.hits += 1;
                    self.sum += value;
                }
            }
        }
    }

    fn merge(&mut self, other: &Self) {
        self.hits += other.hits;
        self.sum += other.sum;
    }

    fn finish(&self, spec: &MetricSpec, group_count: u64) -> Option<f64> {
        match spec {
            MetricSpec::Rate { .. } => rate_percent(self.hits, group_count),
            MetricSpec::Mean { .. } => mean_value(self.sum, self.hits),
        }
    }
}

/// Running state for one bucket
#[derive(Debug, Clone, PartialEq)]
pub struct BucketAccumulator {
    /// Records assigned to the bucket
    pub count: u64,
    /// Absolute index of the first record assigned to the bucket
    pub first_seen: usize,
    /// One accumulator per requested metric
    pub metrics: SmallVec<[MetricAccumulator; 4]>,
}

impl BucketAccumulator {
    #[must_use]
    pub fn new(metric_count: usize, first_seen: usize) -> Self {
        Self {
            count: 0,
            first_seen,
            metrics: SmallVec::from_elem(MetricAccumulator::default(), metric_count),
        }
    }

    pub fn observe(&mut self, record: &PatientRecord, metrics: &[MetricSpec]) {
        self.count += 1;
        for (acc, spec) in self.metrics.iter_mut().zip(metrics) {
            acc.observe(spec, record);
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.first_seen = self.first_seen.min(other.first_seen);
        for (acc, theirs) in self.metrics.iter_mut().zip(&other.metrics) {
            acc.merge(theirs);
        }
    }

    #[must_use]
    pub fn finish(&self, bucket: &Bucket, metrics: &[MetricSpec]) -> SummaryRow {
        SummaryRow {
            label: bucket.label.clone(),
            rank: bucket.rank,
            count: self.count,
            metrics: self
                .metrics
                .iter()
                .zip(metrics)
                .map(|(acc, spec)| MetricValue {
                    name: spec.name().to_string(),
                    value: acc.finish(spec, self.count),
                })
                .collect(),
        }
    }
}

/// Accumulators keyed by bucket index; `None` for buckets with no records yet
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatorTable {
    slots: Vec<Option<BucketAccumulator>>,
}

impl AccumulatorTable {
    #[must_use]
    pub fn new(bucket_count: usize) -> Self {
        Self {
            slots: vec![None; bucket_count],
        }
    }

    /// Fold a run of records that starts at absolute position `offset`
    #[must_use]
    pub fn fold(
        records: &[PatientRecord],
        offset: usize,
        spec: &BucketSpec,
        metrics: &[MetricSpec],
    ) -> Self {
        let mut table = Self::new(spec.buckets().len());
        for (i, record) in records.iter().enumerate() {
            let bucket = spec.classify(record);
            table.slots[bucket]
                .get_or_insert_with(|| BucketAccumulator::new(metrics.len(), offset + i))
                .observe(record, metrics);
        }
        table
    }

    /// Merge another table into this one, bucket by bucket
    pub fn merge(&mut self, other: &Self) {
        for (mine, theirs) in self.slots.iter_mut().zip(&other.slots) {
            match (mine.as_mut(), theirs) {
                (Some(acc), Some(other_acc)) => acc.merge(other_acc),
                (None, Some(other_acc)) => *mine = Some(other_acc.clone()),
                (_, None) => {}
            }
        }
    }

    /// Total records across all buckets
    #[must_use]
    pub fn total(&self) -> u64 {
        self.slots.iter().flatten().map(|acc| acc.count).sum()
    }

    /// Derive summary rows for occupied buckets, ordered by rank then first-seen
    #[must_use]
    pub fn into_rows(self, spec: &BucketSpec, metrics: &[MetricSpec]) -> Vec<SummaryRow> {
        let mut occupied: Vec<(&Bucket, BucketAccumulator)> = spec
            .buckets()
            .iter()
            .zip(self.slots)
            .filter_map(|(bucket, slot)| slot.map(|acc| (bucket, acc)))
            .collect();
        occupied.sort_by_key(|(bucket, acc)| (bucket.rank, acc.first_seen));
        occupied
            .iter()
            .map(|(bucket, acc)| acc.finish(bucket, metrics))
            .collect()
    }
}
