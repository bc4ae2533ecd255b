//! Aggregated output rows and reports

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A named metric on one summary row; `None` means undefined (empty group)
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub name: String,
    pub value: Option<f64>,
}

/// One row of aggregated output
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// Bucket label
    pub label: String,
    /// Declared sort rank of the bucket
    pub rank: u32,
    /// Population count of the bucket (case count for prevalence rows)
    pub count: u64,
    /// Derived metrics in the order they were requested
    pub metrics: Vec<MetricValue>,
}

impl SummaryRow {
    /// Look up a metric by name
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.value)
    }
}

// Rows serialize as ordered maps: label, count, then each metric column.
impl Serialize for SummaryRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.metrics.len()))?;
        map.serialize_entry("label", &self.label)?;
        map.serialize_entry("count", &self.count)?;
        for metric in &self.metrics {
            map.serialize_entry(&metric.name, &metric.value)?;
        }
        map.end()
    }
}

/// A named, ordered result table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Report title
    pub name: String,
    /// Number of input records the report was computed over
    pub total_records: u64,
    /// Output rows in report order
    pub rows: Vec<SummaryRow>,
}

impl Report {
    /// Sum of row counts
    #[must_use]
    pub fn population_sum(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Find a row by bucket label
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Metric column names, taken from the first row
    #[must_use]
    pub fn metric_names(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|r| r.metrics.iter().map(|m| m.name.as_str()).collect())
            .unwrap_or_default()
    }
}
