//! CSV loading of patient records
//!
//! The loader sits outside the aggregation core: it turns a headed CSV into
//! `PatientRecord`s. Cell parsing is lenient. A cell that cannot be parsed is
//! nulled and counted, never fatal; only structural CSV failures are errors.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::models::patient::PatientRecord;
use crate::utils::logging::{log_load_complete, log_load_start};

/// Markers read as an explicit null rather than a malformed value
const NULL_MARKERS: [&str; 5] = ["na", "n/a", "null", "none", "?"];

/// Records read from a source plus parse diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOutcome {
    pub records: Vec<PatientRecord>,
    /// Cells that were present but unparseable, now null
    pub malformed_cells: usize,
    /// Records whose id repeats an earlier record's id
    pub duplicate_ids: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPatientRow {
    #[serde(alias = "id", alias = "PatientId")]
    patient_id: Option<String>,
    #[serde(alias = "Age")]
    age: Option<String>,
    #[serde(alias = "BMI")]
    bmi: Option<String>,
    #[serde(alias = "SleepTime")]
    sleep_time: Option<String>,
    #[serde(alias = "MentalHealth")]
    mental_health_days: Option<String>,
    #[serde(alias = "PhysicalHealth")]
    physical_health_days: Option<String>,
    #[serde(alias = "Sex")]
    gender: Option<String>,
    smoking_status: Option<String>,
    #[serde(alias = "Diabetic")]
    diabetic_status: Option<String>,
    #[serde(alias = "Race")]
    race: Option<String>,
    #[serde(alias = "GenHealth")]
    general_health: Option<String>,
    #[serde(alias = "Stroke")]
    stroke: Option<String>,
    #[serde(alias = "PhysicalActivity")]
    physical_activity: Option<String>,
    #[serde(alias = "DiffWalking")]
    diff_walking: Option<String>,
    #[serde(alias = "Asthma")]
    asthma: Option<String>,
    #[serde(alias = "KidneyDisease")]
    kidney_disease: Option<String>,
    #[serde(alias = "SkinCancer")]
    skin_cancer: Option<String>,
    #[serde(alias = "HeartDisease")]
    heart_disease: Option<String>,
    #[serde(alias = "AlcoholDrinking")]
    alcohol_drinking: Option<String>,
}

/// Per-row parsing state that counts malformed cells
#[derive(Debug, Default)]
struct CellParser {
    malformed: usize,
}

impl CellParser {
    fn present(cell: Option<&str>) -> Option<&str> {
        cell.map(str::trim)
            .filter(|c| !c.is_empty() && !NULL_MARKERS.contains(&c.to_ascii_lowercase().as_str()))
    }

    fn number(&mut self, cell: Option<&str>) -> Option<f64> {
        let cell = Self::present(cell)?;
        match cell.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                self.malformed += 1;
                None
            }
        }
    }

    fn flag(&mut self, cell: Option<&str>) -> Option<bool> {
        let cell = Self::present(cell)?;
        match cell.to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "t" | "1" => Some(true),
            "no" | "n" | "false" | "f" | "0" => Some(false),
            _ => {
                self.malformed += 1;
                None
            }
        }
    }

    fn category(cell: Option<String>) -> Option<String> {
        Self::present(cell.as_deref()).map(str::to_string)
    }

    fn record(&mut self, raw: RawPatientRow, row_number: usize) -> PatientRecord {
        let patient_id = Self::present(raw.patient_id.as_deref())
            .map_or_else(|| format!("row-{row_number}"), str::to_string);
        PatientRecord {
            patient_id,
            age: self.number(raw.age.as_deref()),
            bmi: self.number(raw.bmi.as_deref()),
            sleep_time: self.number(raw.sleep_time.as_deref()),
            mental_health_days: self.number(raw.mental_health_days.as_deref()),
            physical_health_days: self.number(raw.physical_health_days.as_deref()),
            gender: Self::category(raw.gender),
            smoking_status: Self::category(raw.smoking_status),
            diabetic_status: Self::category(raw.diabetic_status),
            race: Self::category(raw.race),
            general_health: Self::category(raw.general_health),
            stroke: self.flag(raw.stroke.as_deref()),
            physical_activity: self.flag(raw.physical_activity.as_deref()),
            diff_walking: self.flag(raw.diff_walking.as_deref()),
            asthma: self.flag(raw.asthma.as_deref()),
            kidney_disease: self.flag(raw.kidney_disease.as_deref()),
            skin_cancer: self.flag(raw.skin_cancer.as_deref()),
            heart_disease: self.flag(raw.heart_disease.as_deref()),
            alcohol_drinking: self.flag(raw.alcohol_drinking.as_deref()),
        }
    }
}

/// Read records from any CSV source with a header row
pub fn read_records_from_reader<R: Read>(reader: R) -> Result<LoadOutcome> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(false)
        .from_reader(reader);

    let mut parser = CellParser::default();
    let mut seen_ids = FxHashSet::default();
    let mut outcome = LoadOutcome::default();

    for (i, row) in csv_reader.deserialize::<RawPatientRow>().enumerate() {
        let record = parser.record(row?, i + 1);
        if !seen_ids.insert(record.patient_id.clone()) {
            outcome.duplicate_ids += 1;
        }
        outcome.records.push(record);
    }

    outcome.malformed_cells = parser.malformed;
    if outcome.duplicate_ids > 0 {
        log::warn!("{} records repeat an earlier patient_id", outcome.duplicate_ids);
    }
    Ok(outcome)
}

/// Read records from a CSV file
pub fn read_records(path: &Path) -> Result<LoadOutcome> {
    let start = Instant::now();
    log_load_start(path);
    let file = safe_open_file(path, "reading patient records")?;
    let outcome = read_records_from_reader(std::io::BufReader::new(file))?;
    log_load_complete(
        path,
        outcome.records.len(),
        outcome.malformed_cells,
        start.elapsed(),
    );
    Ok(outcome)
}

/// Read records from a CSV file on tokio's blocking pool
pub async fn read_records_async(path: PathBuf) -> Result<LoadOutcome> {
    tokio::task::spawn_blocking(move || read_records(&path))
        .await
        .map_err(|e| Error::Task(format!("record loading task failed: {e}")))?
}
