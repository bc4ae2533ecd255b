//! Report suite
//!
//! The suite runs a fixed sequence of reports over one record set: disease
//! prevalence, the six canonical cohort breakdowns, and optionally the
//! supplemental breakdowns and the correlation table.

pub mod cohort;
pub mod correlation;
pub mod prevalence;

use std::time::Instant;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::algorithm::aggregation::ReportDefinition;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::models::patient::{NumericField, PatientRecord};
use crate::models::summary::Report;
use crate::utils::logging::{finish_progress_bar, log_report_complete, suite_progress_bar};

use correlation::{CORRELATION_REPORT, CorrelationRow, correlation_report};
use prevalence::PrevalenceDefinition;

pub use prevalence::{DiseaseSpec, default_diseases, prevalence_report};

/// Correlation table with its title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationTable {
    pub name: String,
    pub rows: Vec<CorrelationRow>,
}

/// Everything produced by one suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteOutput {
    pub generated_at: DateTime<Utc>,
    pub total_records: u64,
    pub reports: Vec<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlations: Option<CorrelationTable>,
}

impl SuiteOutput {
    /// Find a report by name
    #[must_use]
    pub fn report(&self, name: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.name == name)
    }

    /// Pretty-printed JSON document of the whole run
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The fixed sequence of reports
#[derive(Debug, Clone)]
pub struct ReportSuite {
    prevalence: PrevalenceDefinition,
    cohorts: Vec<ReportDefinition>,
    correlation_fields: Vec<NumericField>,
}

impl ReportSuite {
    /// Prevalence plus the canonical cohort reports, and the supplemental
    /// reports when the config asks for them
    pub fn standard(config: &ReportConfig) -> Result<Self> {
        config.validate()?;
        let mut cohorts = cohort::canonical_reports()?;
        let correlation_fields = if config.include_supplemental {
            cohorts.extend(cohort::supplemental_reports()?);
            NumericField::ALL.to_vec()
        } else {
            Vec::new()
        };
        Ok(Self {
            prevalence: PrevalenceDefinition::default(),
            cohorts,
            correlation_fields,
        })
    }

    /// Build a suite from explicit parts
    #[must_use]
    pub fn new(
        prevalence: PrevalenceDefinition,
        cohorts: Vec<ReportDefinition>,
        correlation_fields: Vec<NumericField>,
    ) -> Self {
        Self {
            prevalence,
            cohorts,
            correlation_fields,
        }
    }

    /// Names of the tabular reports in run order
    #[must_use]
    pub fn report_names(&self) -> Vec<&str> {
        std::iter::once(prevalence::PREVALENCE_REPORT)
            .chain(self.cohorts.iter().map(ReportDefinition::name))
            .collect()
    }

    /// Run every report in order
    #[must_use]
    pub fn run(&self, records: &[PatientRecord], config: &ReportConfig) -> SuiteOutput {
        let start = Instant::now();
        let with_correlations = self.correlation_fields.len() >= 2;
        let steps = 1 + self.cohorts.len() + usize::from(with_correlations);
        let pb = suite_progress_bar(steps as u64, config.show_progress);

        let mut reports = Vec::with_capacity(1 + self.cohorts.len());

        let step = Instant::now();
        let prevalence = self.prevalence.run(records, config);
        log_report_complete(&prevalence.name, prevalence.rows.len(), step.elapsed());
        reports.push(prevalence);
        pb.inc(1);

        for definition in &self.cohorts {
            pb.set_message(definition.name().to_string());
            let step = Instant::now();
            let report = definition.run(records, config);
            log_report_complete(&report.name, report.rows.len(), step.elapsed());
            reports.push(report);
            pb.inc(1);
        }

        let correlations = with_correlations.then(|| {
            pb.set_message(CORRELATION_REPORT);
            let table = CorrelationTable {
                name: CORRELATION_REPORT.to_string(),
                rows: correlation_report(records, &self.correlation_fields, config),
            };
            pb.inc(1);
            table
        });

        finish_progress_bar(&pb, Some("Reports complete"));
        info!(
            "Ran {} reports over {} records in {:?}",
            steps,
            records.len(),
            start.elapsed()
        );

        SuiteOutput {
            generated_at: Utc::now(),
            total_records: records.len() as u64,
            reports,
            correlations,
        }
    }
}
