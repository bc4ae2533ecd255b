//! Disease prevalence report
//!
//! Disease categories overlap (a patient can have both asthma and kidney
//! disease), so this report is not a partition of the records. Each disease is
//! counted independently over the whole population and the per-disease rows
//! are concatenated, then ordered by rate.

use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::algorithm::aggregation::metric::{Predicate, rate_percent};
use crate::algorithm::aggregation::{RowOrder, order_rows};
use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::models::patient::{CategoricalField, FlagField, PatientRecord};
use crate::models::summary::{MetricValue, Report, SummaryRow};

/// Title of the prevalence report
pub const PREVALENCE_REPORT: &str = "Disease Prevalence";

/// Name of the rate column
pub const RATE_COLUMN: &str = "rate";

/// A named disease criterion
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseSpec {
    pub name: String,
    pub predicate: Predicate,
}

impl DiseaseSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

/// The diseases reported by default, in declared order
#[must_use]
pub fn default_diseases() -> Vec<DiseaseSpec> {
    vec![
        DiseaseSpec::new("Heart Disease", Predicate::Flag(FlagField::HeartDisease)),
        DiseaseSpec::new("Stroke", Predicate::Flag(FlagField::Stroke)),
        DiseaseSpec::new(
            "Diabetes",
            Predicate::category(CategoricalField::DiabeticStatus, "Yes"),
        ),
        DiseaseSpec::new("Asthma", Predicate::Flag(FlagField::Asthma)),
        DiseaseSpec::new("Kidney Disease", Predicate::Flag(FlagField::KidneyDisease)),
        DiseaseSpec::new("Skin Cancer", Predicate::Flag(FlagField::SkinCancer)),
        DiseaseSpec::new("Difficulty Walking", Predicate::Flag(FlagField::DiffWalking)),
    ]
}

/// A validated list of disease criteria
#[derive(Debug, Clone)]
pub struct PrevalenceDefinition {
    diseases: Vec<DiseaseSpec>,
}

impl Default for PrevalenceDefinition {
    fn default() -> Self {
        Self {
            diseases: default_diseases(),
        }
    }
}

impl PrevalenceDefinition {
    /// Build a definition; disease names must be non-blank and unique
    pub fn new(diseases: Vec<DiseaseSpec>) -> Result<Self> {
        if diseases.is_empty() {
            return Err(Error::config("prevalence report needs at least one disease"));
        }
        let mut seen = FxHashSet::default();
        for disease in &diseases {
            if disease.name.trim().is_empty() || !seen.insert(disease.name.as_str()) {
                return Err(Error::config(format!(
                    "disease name '{}' is blank or duplicated",
                    disease.name
                )));
            }
        }
        Ok(Self { diseases })
    }

    #[must_use]
    pub fn diseases(&self) -> &[DiseaseSpec] {
        &self.diseases
    }

    /// Count each disease independently and order rows by rate, descending
    #[must_use]
    pub fn run(&self, records: &[PatientRecord], config: &ReportConfig) -> Report {
        let total = records.len() as u64;
        let parallel = config.runs_parallel(records.len());

        let mut rows: Vec<SummaryRow> = if records.is_empty() {
            Vec::new()
        } else {
            self.diseases
                .iter()
                .zip(0u32..)
                .map(|(disease, rank)| {
                    let cases = count_matching(records, &disease.predicate, parallel);
                    SummaryRow {
                        label: disease.name.clone(),
                        rank,
                        count: cases,
                        metrics: vec![MetricValue {
                            name: RATE_COLUMN.to_string(),
                            value: rate_percent(cases, total),
                        }],
                    }
                })
                .collect()
        };
        order_rows(&mut rows, RowOrder::MetricDesc(0));
        debug!("Prevalence computed for {} diseases over {total} records", rows.len());

        Report {
            name: PREVALENCE_REPORT.to_string(),
            total_records: total,
            rows,
        }
    }
}

fn count_matching(records: &[PatientRecord], predicate: &Predicate, parallel: bool) -> u64 {
    let count = if parallel {
        records.par_iter().filter(|r| predicate.matches(r)).count()
    } else {
        records.iter().filter(|r| predicate.matches(r)).count()
    };
    count as u64
}

/// Prevalence of the default diseases
#[must_use]
pub fn prevalence_report(records: &[PatientRecord], config: &ReportConfig) -> Report {
    PrevalenceDefinition::default().run(records, config)
}
