//! Aggregation algorithms for population-health summaries
//!
//! `aggregation` is the generic bucket-and-fold engine; `reports` composes
//! it into the prevalence, cohort and correlation reports.

pub mod aggregation;
pub mod reports;
