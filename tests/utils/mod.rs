use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Header row in the loader's snake_case column names
pub const CSV_HEADER: &str = "patient_id,age,bmi,sleep_time,mental_health_days,physical_health_days,gender,smoking_status,diabetic_status,race,general_health,stroke,physical_activity,diff_walking,asthma,kidney_disease,skin_cancer,heart_disease,alcohol_drinking";

/// A CSV file in the system temp directory, removed on drop
pub struct TempCsv {
    pub path: PathBuf,
}

impl TempCsv {
    /// Write `contents` to a fresh file unique to this process and call
    pub fn new(contents: &str) -> Self {
        let n = FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "cohort-stats-test-{}-{n}.csv",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("failed to write temp csv");
        Self { path }
    }
}

impl Drop for TempCsv {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Build a CSV body from the standard header plus the given data lines
#[must_use]
pub fn csv_with_rows(rows: &[&str]) -> String {
    let mut body = String::from(CSV_HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    body
}
