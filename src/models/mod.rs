//! Domain models for population-health summaries
//!
//! `patient` holds the input row shape and typed field selectors,
//! `summary` holds the aggregated output shapes.

pub mod patient;
pub mod summary;

// Re-export commonly used types
pub use patient::{CategoricalField, FlagField, NumericField, PatientRecord};
pub use summary::{MetricValue, Report, SummaryRow};
