//! A Rust library for computing reproducible population-health summaries:
//! disease prevalence, cohort breakdowns and correlations over a flat table
//! of patient records.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{OutputFormat, ReportConfig};
pub use error::{Error, Result};
pub use models::{PatientRecord, Report, SummaryRow};

// Aggregation engine
pub use algorithm::aggregation::{
    BucketSpec, MetricSpec, Predicate, RangeBand, ReportDefinition, RowOrder, aggregate,
    aggregate_with_config,
};

// Report suite
pub use algorithm::reports::{ReportSuite, SuiteOutput, prevalence_report};

// Loading
pub use loader::{LoadOutcome, read_records, read_records_async, read_records_from_reader};
