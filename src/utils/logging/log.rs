//! Logging utilities
//!
//! Consistent log lines for loading records and running reports.

use std::path::Path;
use std::time::Duration;

/// Log the start of reading a record source
pub fn log_load_start(path: &Path) {
    log::info!("Loading patient records from {}", path.display());
}

/// Log a finished load, warning when cells had to be nulled
///
/// # Arguments
/// * `path` - Source that was read
/// * `records` - Number of records produced
/// * `malformed_cells` - Cells that failed to parse and were treated as null
/// * `elapsed` - Time spent reading
pub fn log_load_complete(path: &Path, records: usize, malformed_cells: usize, elapsed: Duration) {
    log::info!(
        "Loaded {records} records from {} in {elapsed:?}",
        path.display()
    );
    if malformed_cells > 0 {
        log::warn!(
            "{malformed_cells} malformed cells in {} were treated as null",
            path.display()
        );
    }
}

/// Log a finished report
pub fn log_report_complete(name: &str, rows: usize, elapsed: Duration) {
    log::debug!("{name}: {rows} rows in {elapsed:?}");
}
