//! Partitioned grouping pass
//!
//! Large inputs are split into contiguous partitions which are folded in
//! parallel using Rayon. Partial tables are merged in partition order and
//! metrics are derived only from the merged table.

use log::debug;
use rayon::prelude::*;

use crate::algorithm::aggregation::accumulator::AccumulatorTable;
use crate::algorithm::aggregation::bucket::BucketSpec;
use crate::algorithm::aggregation::metric::MetricSpec;
use crate::models::patient::PatientRecord;

/// Fold records into one accumulator table using `partitions` parallel chunks
#[must_use]
pub fn fold_partitioned(
    records: &[PatientRecord],
    spec: &BucketSpec,
    metrics: &[MetricSpec],
    partitions: usize,
) -> AccumulatorTable {
    let partitions = partitions.max(1);
    let chunk_size = records.len().div_ceil(partitions).max(1);
    debug!(
        "Folding {} records for '{}' in chunks of {chunk_size} on {} threads",
        records.len(),
        spec.name(),
        rayon::current_num_threads()
    );

    let partials: Vec<AccumulatorTable> = records
        .par_chunks(chunk_size)
        .enumerate()
        .map(|(i, chunk)| AccumulatorTable::fold(chunk, i * chunk_size, spec, metrics))
        .collect();

    let mut merged = AccumulatorTable::new(spec.buckets().len());
    for partial in &partials {
        merged.merge(partial);
    }
    merged
}
